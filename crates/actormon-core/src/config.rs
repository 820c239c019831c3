//! Monitor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::metrics::CustomMetrics;

/// Default category label.
pub const DEFAULT_CATEGORY: &str = "Akka";

/// Construction-time configuration for a monitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Category every definition is registered under.
    pub category: String,

    /// Names tracked in addition to the built-in counters.
    pub custom_metrics: Option<CustomMetrics>,
}

impl MonitorConfig {
    /// Create a configuration for the given category.
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            custom_metrics: None,
        }
    }

    /// Set the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the extension metric names.
    pub fn with_custom_metrics(mut self, metrics: CustomMetrics) -> Self {
        self.custom_metrics = Some(metrics);
        self
    }

    /// Load a configuration from a JSON file.
    ///
    /// Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.category.trim().is_empty() {
            return Err(Error::Config("category label must not be empty".to_string()));
        }
        Ok(())
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_CATEGORY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert_eq!(config.category, "Akka");
        assert!(config.custom_metrics.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = MonitorConfig::default()
            .with_category("Cluster")
            .with_custom_metrics(CustomMetrics::new().with_gauge("MailboxDepth"));
        assert_eq!(config.category, "Cluster");
        assert!(config
            .custom_metrics
            .as_ref()
            .is_some_and(|m| m.gauges.contains("MailboxDepth")));
    }

    #[test]
    fn test_empty_category_rejected() {
        let config = MonitorConfig::new("  ");
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"category": "Remote", "custom_metrics": {{"timers": ["ProcessingTime"]}}}}"#
        )
        .unwrap();

        let config = MonitorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.category, "Remote");
        let metrics = config.custom_metrics.unwrap();
        assert!(metrics.timers.contains("ProcessingTime"));
        assert!(metrics.counters.is_empty());
    }

    #[test]
    fn test_from_json_file_defaults_and_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{}}").unwrap();
        let config = MonitorConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config, MonitorConfig::default());

        let mut bad = tempfile::NamedTempFile::new().unwrap();
        write!(bad, "not json").unwrap();
        assert!(matches!(
            MonitorConfig::from_json_file(bad.path()),
            Err(Error::Json(_))
        ));

        assert!(matches!(
            MonitorConfig::from_json_file("/nonexistent/actormon.json"),
            Err(Error::Io(_))
        ));
    }
}
