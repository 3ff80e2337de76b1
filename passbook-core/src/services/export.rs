//! Delimited-text export of normalized transactions
//!
//! Layout: the seven normalized fields, any extra source columns in source
//! order, then `counterparty`. Dates are ISO, amounts plain decimals, and
//! "no value" is an empty field.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::result::{Error, Result};
use crate::domain::{StatementColumn, StatementTable, Transaction};
use crate::services::classifier;

const COUNTERPARTY_FIELD: &str = "counterparty";
const ISO_DATE: &str = "%Y-%m-%d";

/// Export settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportOptions {
    pub delimiter: u8,
    pub include_extra_columns: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            include_extra_columns: true,
        }
    }
}

/// Write the table as delimited text
pub fn write_export<W: Write>(table: &StatementTable, writer: W, options: &ExportOptions) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    let mut header: Vec<&str> = StatementColumn::ALL.iter().map(|c| c.field_name()).collect();
    if options.include_extra_columns {
        header.extend(table.extra_columns().iter().map(String::as_str));
    }
    header.push(COUNTERPARTY_FIELD);
    wtr.write_record(&header)?;

    for tx in table.transactions() {
        let mut record = vec![
            tx.date.format(ISO_DATE).to_string(),
            tx.narration.clone(),
            tx.reference.clone().unwrap_or_default(),
            tx.value_date.format(ISO_DATE).to_string(),
            decimal_field(tx.withdrawal_amount),
            decimal_field(tx.deposit_amount),
            decimal_field(tx.closing_balance),
        ];
        if options.include_extra_columns {
            record.extend(tx.extra.iter().map(|v| v.clone().unwrap_or_default()));
        }
        record.push(tx.counterparty.clone().unwrap_or_default());
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the export to a file, replacing it if present
pub fn export_to_path(table: &StatementTable, path: &Path, options: &ExportOptions) -> Result<()> {
    let file = File::create(path)?;
    write_export(table, file, options)?;
    info!(path = %path.display(), rows = table.len(), "wrote statement export");
    Ok(())
}

/// Parse an export back into a statement table
///
/// An empty counterparty field is derived from the narration again, so
/// exports written by other tools still classify. An export written with
/// `include_extra_columns` off carries no extra columns, so the re-read
/// table has none and its transactions have an empty `extra`; every other
/// field matches the table that was exported.
pub fn read_export<R: Read>(reader: R, delimiter: u8) -> Result<StatementTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let fixed = StatementColumn::ALL.len();
    let leading_ok = headers.len() > fixed
        && StatementColumn::ALL
            .iter()
            .zip(headers.iter())
            .all(|(c, h)| c.field_name() == h);
    if !leading_ok || headers.get(headers.len() - 1) != Some(COUNTERPARTY_FIELD) {
        return Err(Error::export(format!(
            "Unexpected export header: {}",
            headers.iter().collect::<Vec<_>>().join(",")
        )));
    }
    let extra_columns: Vec<String> = headers
        .iter()
        .skip(fixed)
        .take(headers.len() - fixed - 1)
        .map(str::to_string)
        .collect();

    let mut transactions = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Line 1 is the header
        let line = i + 2;
        let field = |idx: usize| record.get(idx).unwrap_or("");

        let mut tx = Transaction::new(
            export_date(field(0), line, StatementColumn::Date)?,
            export_date(field(3), line, StatementColumn::ValueDate)?,
        );
        tx.narration = field(1).to_string();
        tx.reference = optional(field(2));
        tx.withdrawal_amount = export_decimal(field(4), line, StatementColumn::WithdrawalAmount)?;
        tx.deposit_amount = export_decimal(field(5), line, StatementColumn::DepositAmount)?;
        tx.closing_balance = export_decimal(field(6), line, StatementColumn::ClosingBalance)?;
        tx.extra = (fixed..fixed + extra_columns.len())
            .map(|idx| optional(field(idx)))
            .collect();
        tx.counterparty =
            optional(field(fixed + extra_columns.len())).or_else(|| classifier::classify(&tx.narration));
        transactions.push(tx);
    }

    Ok(StatementTable::new(extra_columns, transactions))
}

/// Read an export file
pub fn read_export_path(path: &Path, delimiter: u8) -> Result<StatementTable> {
    read_export(File::open(path)?, delimiter)
}

fn decimal_field(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn export_date(value: &str, line: usize, column: StatementColumn) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, ISO_DATE).map_err(|_| {
        Error::export(format!(
            "line {}, field '{}': {:?} is not an ISO date",
            line,
            column.field_name(),
            value
        ))
    })
}

fn export_decimal(value: &str, line: usize, column: StatementColumn) -> Result<Option<Decimal>> {
    if value.is_empty() {
        return Ok(None);
    }
    Decimal::from_str(value).map(Some).map_err(|_| {
        Error::export(format!(
            "line {}, field '{}': {:?} is not a decimal",
            line,
            column.field_name(),
            value
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> StatementTable {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let mut a = Transaction::new(date, NaiveDate::from_ymd_opt(2024, 3, 6).unwrap());
        a.narration = "UPI-JOHNDOE-1234567890-paytm".to_string();
        a.reference = Some("0000412345678901".to_string());
        a.withdrawal_amount = Some(Decimal::new(123456, 2));
        a.closing_balance = Some(Decimal::new(-5000, 2));
        a.extra = vec![Some("Andheri, Mumbai".to_string())];
        a.counterparty = Some("JOHNDOE".to_string());

        let mut b = Transaction::new(date, date);
        b.narration = "NEFT CR \"ACME\"".to_string();
        b.deposit_amount = Some(Decimal::new(1000000, 2));
        b.extra = vec![None];

        StatementTable::new(vec!["Branch".to_string()], vec![a, b])
    }

    fn export_string(table: &StatementTable, options: &ExportOptions) -> String {
        let mut buf = Vec::new();
        write_export(table, &mut buf, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_export_layout() {
        let text = export_string(&sample_table(), &ExportOptions::default());
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,narration,reference,value_date,withdrawal_amount,deposit_amount,closing_balance,Branch,counterparty"
        );
        assert_eq!(
            lines.next().unwrap(),
            "2024-03-05,UPI-JOHNDOE-1234567890-paytm,0000412345678901,2024-03-06,1234.56,,-50.00,\"Andheri, Mumbai\",JOHNDOE"
        );
    }

    #[test]
    fn test_export_without_extra_columns() {
        let options = ExportOptions {
            delimiter: b';',
            include_extra_columns: false,
        };
        let text = export_string(&sample_table(), &options);
        assert!(text.starts_with("date;narration;reference;value_date;withdrawal_amount;deposit_amount;closing_balance;counterparty\n"));
    }

    #[test]
    fn test_round_trip() {
        let table = sample_table();
        let text = export_string(&table, &ExportOptions::default());
        let parsed = read_export(text.as_bytes(), b',').unwrap();
        assert_eq!(parsed.extra_columns(), table.extra_columns());
        assert_eq!(parsed.transactions(), table.transactions());
        assert_eq!(parsed.summary(), table.summary());
    }

    #[test]
    fn test_round_trip_without_extra_columns_drops_only_extras() {
        let table = sample_table();
        let options = ExportOptions {
            delimiter: b',',
            include_extra_columns: false,
        };
        let parsed = read_export(export_string(&table, &options).as_bytes(), b',').unwrap();

        assert!(parsed.extra_columns().is_empty());
        for (read, original) in parsed.transactions().iter().zip(table.transactions()) {
            assert!(read.extra.is_empty());
            let mut expected = original.clone();
            expected.extra.clear();
            assert_eq!(read, &expected);
        }
        assert_eq!(parsed.summary(), table.summary());
    }

    #[test]
    fn test_read_derives_missing_counterparty() {
        let text = "date,narration,reference,value_date,withdrawal_amount,deposit_amount,closing_balance,counterparty\n\
                    2024-01-01,UPI-BOB-99-okaxis,,2024-01-01,5,,95,\n";
        let table = read_export(text.as_bytes(), b',').unwrap();
        assert_eq!(table.transactions()[0].counterparty.as_deref(), Some("BOB"));
    }

    #[test]
    fn test_read_rejects_foreign_header() {
        let err = read_export("Date,Amount\n2024-01-01,5\n".as_bytes(), b',').unwrap_err();
        assert!(matches!(err, Error::Export(_)));
    }

    #[test]
    fn test_read_rejects_bad_amount() {
        let text = "date,narration,reference,value_date,withdrawal_amount,deposit_amount,closing_balance,counterparty\n\
                    2024-01-01,x,,2024-01-01,abc,,,\n";
        let err = read_export(text.as_bytes(), b',').unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }
}
