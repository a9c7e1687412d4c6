use std::path::Path;

use chardiff_core::{TextDiffer, DEFAULT_SEPARATOR};
use serde::{Deserialize, Serialize};

use crate::error::{BatchError, BatchResult};

/// Name of the appended result column when none is configured.
pub const DEFAULT_OUTPUT_COLUMN: &str = "差異字元";

/// Configuration for a batch comparison run.
///
/// Every field has a default, so a TOML file only needs the keys it
/// changes. Column names are usually supplied on the command line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Column holding the left-hand (original) values.
    pub left_column: Option<String>,
    /// Column holding the right-hand (modified) values.
    pub right_column: Option<String>,
    /// Column the differing characters are written to.
    pub output_column: String,
    /// Optional column for the similarity ratio of each row.
    pub ratio_column: Option<String>,
    /// Joins the differing characters of one row.
    pub separator: String,
    /// Enable the popular-character heuristic for long values.
    pub auto_junk: bool,
    /// Characters that never anchor an alignment (e.g. `" "`).
    pub junk_chars: String,
    /// Trim whitespace around header names and requested column names.
    pub trim_headers: bool,
    /// Compare rows on the rayon pool.
    pub parallel: bool,
    /// Worker count for a dedicated pool; the global pool when unset.
    pub threads: Option<usize>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            left_column: None,
            right_column: None,
            output_column: DEFAULT_OUTPUT_COLUMN.to_string(),
            ratio_column: None,
            separator: DEFAULT_SEPARATOR.to_string(),
            auto_junk: false,
            junk_chars: String::new(),
            trim_headers: true,
            parallel: true,
            threads: None,
        }
    }
}

impl BatchConfig {
    /// A configuration comparing `left` against `right` with defaults.
    pub fn for_columns(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self {
            left_column: Some(left.into()),
            right_column: Some(right.into()),
            ..Default::default()
        }
    }

    pub fn from_toml_str(text: &str) -> BatchResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> BatchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| BatchError::io(path, e))?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded batch config");
        Ok(config)
    }

    /// The differ described by the junk and separator settings.
    pub fn differ(&self) -> TextDiffer {
        TextDiffer::new()
            .with_junk_chars(self.junk_chars.chars())
            .with_auto_junk(self.auto_junk)
            .with_separator(self.separator.clone())
    }

    /// Both column names, or the first one missing.
    pub fn columns(&self) -> BatchResult<(&str, &str)> {
        let left = self
            .left_column
            .as_deref()
            .ok_or(BatchError::MissingSetting("left_column"))?;
        let right = self
            .right_column
            .as_deref()
            .ok_or(BatchError::MissingSetting("right_column"))?;
        Ok((left, right))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let c = BatchConfig::default();
        assert_eq!(c.output_column, "差異字元");
        assert_eq!(c.separator, ", ");
        assert!(!c.auto_junk);
        assert!(c.junk_chars.is_empty());
        assert!(c.trim_headers);
        assert!(c.parallel);
        assert!(c.threads.is_none());
        assert!(c.ratio_column.is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let c = BatchConfig::from_toml_str(
            r#"
            left_column = "lyrics-original"
            right_column = "lyrics-edited"
            auto_junk = true
            threads = 2
            "#,
        )
        .unwrap();
        assert_eq!(c.columns().unwrap(), ("lyrics-original", "lyrics-edited"));
        assert!(c.auto_junk);
        assert_eq!(c.threads, Some(2));
        assert_eq!(c.output_column, DEFAULT_OUTPUT_COLUMN);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = BatchConfig::from_toml_str("threads = \"many\"").unwrap_err();
        assert!(matches!(err, BatchError::Config(_)));
    }

    #[test]
    fn missing_columns_reported() {
        let err = BatchConfig::default().columns().unwrap_err();
        assert_eq!(err, BatchError::MissingSetting("left_column"));

        let mut c = BatchConfig::default();
        c.left_column = Some("a".into());
        assert_eq!(c.columns().unwrap_err(), BatchError::MissingSetting("right_column"));
    }

    #[test]
    fn differ_follows_settings() {
        let mut c = BatchConfig::for_columns("a", "b");
        c.separator = "/".into();
        c.junk_chars = " ".into();
        let differ = c.differ();
        assert_eq!(differ.junk_chars, vec![' ']);
        assert_eq!(differ.diff("ab", "ac"), "b/c");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chardiff.toml");
        std::fs::write(&path, "output_column = \"diff\"\nparallel = false\n").unwrap();
        let c = BatchConfig::load(&path).unwrap();
        assert_eq!(c.output_column, "diff");
        assert!(!c.parallel);
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let err = BatchConfig::load("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, BatchError::Io { .. }));
    }
}
