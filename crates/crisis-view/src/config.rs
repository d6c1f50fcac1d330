//! Dashboard settings loaded from YAML.

use crisis_model::LineFilter;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Year shown when nothing else was requested.
pub const DEFAULT_YEAR: i32 = 1492;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config yaml: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Pixel size of the price chart canvas.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
}

impl Default for ChartSize {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 400.0,
        }
    }
}

/// Example:
///   default_year: 1929
///   default_filter: stock
///   line_chart: { width: 1024, height: 480 }
///   output_dir: out
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    pub default_year: i32,
    pub default_filter: LineFilter,
    pub line_chart: ChartSize,
    pub output_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            default_year: DEFAULT_YEAR,
            default_filter: LineFilter::All,
            line_chart: ChartSize::default(),
            output_dir: PathBuf::from("out"),
        }
    }
}

impl DashboardConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let cfg: DashboardConfig = serde_yaml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg = Self::from_yaml_str(&text)?;
        info!(path = %path.display(), year = cfg.default_year, filter = %cfg.default_filter, "config loaded");
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ChartSize { width, height } = self.line_chart;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "line_chart size must be positive, got {width}x{height}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let cfg = DashboardConfig::from_yaml_str("{}").unwrap();
        assert_eq!(cfg, DashboardConfig::default());
        assert_eq!(cfg.default_year, 1492);
    }

    #[test]
    fn partial_override() {
        let cfg = DashboardConfig::from_yaml_str(
            "default_year: 2008\ndefault_filter: gold\nline_chart: { width: 640, height: 320 }\n",
        )
        .unwrap();
        assert_eq!(cfg.default_year, 2008);
        assert_eq!(cfg.default_filter, LineFilter::Gold);
        assert_eq!(cfg.line_chart.width, 640.0);
        assert_eq!(cfg.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn rejects_non_positive_size() {
        let err = DashboardConfig::from_yaml_str("line_chart: { width: 0, height: 400 }").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn rejects_unknown_filter_and_fields() {
        assert!(matches!(
            DashboardConfig::from_yaml_str("default_filter: bonds"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            DashboardConfig::from_yaml_str("theme: dark"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = DashboardConfig::load(Path::new("/nonexistent/dashboard.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dashboard.yaml"));
    }
}
