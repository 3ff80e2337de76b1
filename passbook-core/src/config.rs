//! Configuration management
//!
//! Settings live in `settings.json` inside the passbook directory:
//! ```json
//! {
//!   "export": { "delimiter": ",", "includeExtraColumns": true },
//!   "display": { "transactionLimit": 20, "topCounterparties": 10 },
//!   "stagingDir": "/tmp/passbook"
//! }
//! ```

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::result::Error;
use crate::services::export::ExportOptions;

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    export: ExportSettings,
    #[serde(default)]
    display: DisplaySettings,
    #[serde(default)]
    staging_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportSettings {
    #[serde(default = "default_delimiter")]
    delimiter: String,
    #[serde(default = "default_true")]
    include_extra_columns: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            include_extra_columns: true,
        }
    }
}

/// Presentation defaults for front ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    #[serde(default = "default_transaction_limit")]
    pub transaction_limit: usize,
    #[serde(default = "default_top_counterparties")]
    pub top_counterparties: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            transaction_limit: default_transaction_limit(),
            top_counterparties: default_top_counterparties(),
        }
    }
}

fn default_delimiter() -> String {
    ",".to_string()
}

fn default_true() -> bool {
    true
}

fn default_transaction_limit() -> usize {
    20
}

fn default_top_counterparties() -> usize {
    10
}

/// Passbook configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub export: ExportOptions,
    pub display: DisplaySettings,
    /// Directory for temporary upload copies (OS temp dir when unset)
    pub staging_dir: Option<PathBuf>,
}

impl Config {
    /// Load config from the passbook directory
    ///
    /// The export delimiter can be overridden with PASSBOOK_EXPORT_DELIMITER.
    pub fn load(passbook_dir: &Path) -> Result<Self> {
        let settings_path = passbook_dir.join("settings.json");

        let raw: SettingsFile = std::fs::read_to_string(&settings_path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default();

        let delimiter = std::env::var("PASSBOOK_EXPORT_DELIMITER")
            .ok()
            .unwrap_or(raw.export.delimiter);

        Ok(Self {
            export: ExportOptions {
                delimiter: parse_delimiter(&delimiter)?,
                include_extra_columns: raw.export.include_extra_columns,
            },
            display: raw.display,
            staging_dir: raw.staging_dir,
        })
    }
}

/// Delimiters must be a single ASCII character
fn parse_delimiter(value: &str) -> std::result::Result<u8, Error> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        (Some('\\'), Some('t')) if value.len() == 2 => Ok(b'\t'),
        _ => Err(Error::config(format!(
            "export delimiter must be a single ASCII character, got {:?}",
            value
        ))),
    }
}

/// Passbook directory from PASSBOOK_DIR, else ~/.passbook
pub fn default_passbook_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("PASSBOOK_DIR") {
        return Some(PathBuf::from(dir));
    }
    dirs::home_dir().map(|home| home.join(".passbook"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_settings_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.display, DisplaySettings::default());
        assert!(config.export.include_extra_columns);
        assert_eq!(config.staging_dir, None);
    }

    #[test]
    fn test_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("settings.json"),
            r#"{"export": {"includeExtraColumns": false}, "display": {"topCounterparties": 3}, "stagingDir": "/var/tmp/pb"}"#,
        )
        .unwrap();

        let config = Config::load(temp_dir.path()).unwrap();
        assert!(!config.export.include_extra_columns);
        assert_eq!(config.display.top_counterparties, 3);
        assert_eq!(config.display.transaction_limit, 20);
        assert_eq!(config.staging_dir, Some(PathBuf::from("/var/tmp/pb")));
    }

    #[test]
    fn test_unreadable_json_falls_back() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), "{ not json").unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.display, DisplaySettings::default());
    }

    #[test]
    fn test_non_utf8_settings_fall_back() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(temp_dir.path().join("settings.json"), [0xff, 0xfe, b'{', 0x80]).unwrap();
        let config = Config::load(temp_dir.path()).unwrap();
        assert_eq!(config.display, DisplaySettings::default());
        assert!(config.export.include_extra_columns);
    }

    #[test]
    fn test_parse_delimiter() {
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert!(parse_delimiter("").is_err());
        assert!(parse_delimiter("ab").is_err());
        assert!(parse_delimiter("₹").is_err());
    }
}
