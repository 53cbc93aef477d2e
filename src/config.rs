//! JSON run configuration.
//!
//! Every key is optional:
//!
//! ```json
//! { "filter_column": 2, "filter_value": "k", "log_file": "analyze.log", "quiet": false }
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::pipeline::{
    AnalysisObserver, AnalysisOptions, CompositeObserver, FileObserver, StdErrObserver,
    DEFAULT_FILTER_COLUMN,
};

/// Serializable form of [`AnalysisOptions`] plus logging sinks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Field position to match; defaults to [`DEFAULT_FILTER_COLUMN`].
    pub filter_column: Option<usize>,
    /// Text identifying the filter row. Empty means no filtering.
    pub filter_value: Option<String>,
    /// Append run events to this file.
    pub log_file: Option<PathBuf>,
    /// Do not log run events to stderr.
    pub quiet: bool,
}

impl AnalysisConfig {
    pub fn from_json_str(s: &str) -> AnalysisResult<Self> {
        let config: Self = serde_json::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> AnalysisResult<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Reject settings that can never select a row.
    ///
    /// The tokenizer splits on whitespace, so a filter value containing any can never equal a
    /// field.
    pub fn validate(&self) -> AnalysisResult<()> {
        if let Some(value) = &self.filter_value {
            if value.chars().any(|c| matches!(c, ' ' | '\t' | '\r' | '\n' | '\0')) {
                return Err(AnalysisError::InvalidConfig {
                    message: format!("filter value {value:?} contains a field delimiter"),
                });
            }
        }
        Ok(())
    }

    /// Build run options, wiring a stderr observer (unless `quiet`) and a file observer.
    pub fn to_options(&self) -> AnalysisOptions {
        let mut observers: Vec<Arc<dyn AnalysisObserver>> = Vec::new();
        if !self.quiet {
            observers.push(Arc::new(StdErrObserver));
        }
        if let Some(path) = &self.log_file {
            observers.push(Arc::new(FileObserver::new(path)));
        }

        let observer = match observers.len() {
            0 => None,
            1 => observers.pop(),
            _ => Some(Arc::new(CompositeObserver::new(observers)) as Arc<dyn AnalysisObserver>),
        };

        AnalysisOptions {
            filter_column: self.filter_column.unwrap_or(DEFAULT_FILTER_COLUMN),
            filter_value: self.filter_value.clone().filter(|v| !v.is_empty()),
            observer,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = AnalysisConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());

        let options = config.to_options();
        assert_eq!(options.filter_column, DEFAULT_FILTER_COLUMN);
        assert_eq!(options.filter_value, None);
        assert!(options.observer.is_some());
    }

    #[test]
    fn parses_all_keys() {
        let config = AnalysisConfig::from_json_str(
            r#"{"filter_column": 2, "filter_value": "k", "log_file": "run.log", "quiet": true}"#,
        )
        .unwrap();
        assert_eq!(config.filter_column, Some(2));
        assert_eq!(config.filter_value.as_deref(), Some("k"));
        assert_eq!(config.log_file, Some(PathBuf::from("run.log")));
        assert!(config.quiet);

        let options = config.to_options();
        assert_eq!(options.filter_column, 2);
        assert_eq!(options.filter_value.as_deref(), Some("k"));
        assert!(options.observer.is_some());
    }

    #[test]
    fn quiet_without_log_file_has_no_observer() {
        let config = AnalysisConfig {
            quiet: true,
            filter_value: Some(String::new()),
            ..Default::default()
        };
        let options = config.to_options();
        assert!(options.observer.is_none());
        assert_eq!(options.filter_value, None);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = AnalysisConfig::from_json_str(r#"{"filter": "k"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Json(_)));
    }

    #[test]
    fn whitespace_in_filter_value_is_invalid() {
        let err = AnalysisConfig::from_json_str(r#"{"filter_value": "a b"}"#).unwrap_err();
        assert!(err.to_string().contains("invalid config"));
    }

    #[test]
    fn missing_config_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = AnalysisConfig::from_json_path(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
