#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::time::Duration;
use toml_config::FileConfig;

pub const DEFAULT_DATA_URL: &str =
    "https://raw.githubusercontent.com/factorialmap/hitoshi_kume_database/refs/heads/main/data_104_np.csv";
pub const DEFAULT_OUTPUT_PATH: &str = "np_control_chart.png";
pub const DEFAULT_TITLE: &str = "np Control Chart - Number of Defective Units";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_WIDTH: u32 = 1400;
pub const DEFAULT_HEIGHT: u32 = 700;

const MIN_DIMENSION: u32 = 200;
const MAX_DIMENSION: u32 = 10_000;

/// Fully resolved settings: defaults, then the TOML file, then CLI flags.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSettings {
    pub data_url: String,
    pub timeout_seconds: u64,
    pub output_path: String,
    pub width: u32,
    pub height: u32,
    pub title: String,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl ChartSettings {
    /// Overlays every value the file sets.
    pub fn apply_file(&mut self, file: &FileConfig) {
        if let Some(url) = &file.source.url {
            self.data_url = url.clone();
        }
        if let Some(timeout) = file.source.timeout_seconds {
            self.timeout_seconds = timeout;
        }
        if let Some(path) = &file.output.path {
            self.output_path = path.clone();
        }
        if let Some(width) = file.output.width {
            self.width = width;
        }
        if let Some(height) = file.output.height {
            self.height = height;
        }
        if let Some(title) = &file.chart.title {
            self.title = title.clone();
        }
    }
}

impl Validate for ChartSettings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("source.url", &self.data_url)?;
        validation::validate_positive_number("source.timeout_seconds", self.timeout_seconds, 1)?;
        validation::validate_path("output.path", &self.output_path)?;
        validation::validate_range("output.width", self.width, MIN_DIMENSION, MAX_DIMENSION)?;
        validation::validate_range("output.height", self.height, MIN_DIMENSION, MAX_DIMENSION)?;
        validation::validate_non_empty_string("chart.title", &self.title)?;
        Ok(())
    }
}

impl ConfigProvider for ChartSettings {
    fn data_url(&self) -> &str {
        &self.data_url
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn title(&self) -> &str {
        &self.title
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = ChartSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.output_path(), "np_control_chart.png");
        assert_eq!(settings.dimensions(), (1400, 700));
        assert_eq!(settings.request_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_apply_file_overrides_only_set_values() {
        let file = FileConfig::from_toml_str(
            r#"
            [output]
            path = "charts/line_3.svg"
            width = 1000

            [chart]
            title = "Line 3 rejects"
            "#,
        )
        .unwrap();

        let mut settings = ChartSettings::default();
        settings.apply_file(&file);

        assert_eq!(settings.output_path, "charts/line_3.svg");
        assert_eq!(settings.width, 1000);
        assert_eq!(settings.height, DEFAULT_HEIGHT);
        assert_eq!(settings.title, "Line 3 rejects");
        assert_eq!(settings.data_url, DEFAULT_DATA_URL);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut settings = ChartSettings {
            width: 50,
            ..Default::default()
        };
        assert!(settings.validate().is_err());

        settings.width = DEFAULT_WIDTH;
        settings.data_url = "file:///tmp/data.csv".to_string();
        assert!(settings.validate().is_err());

        settings.data_url = DEFAULT_DATA_URL.to_string();
        settings.timeout_seconds = 0;
        assert!(settings.validate().is_err());

        settings.timeout_seconds = 5;
        settings.title = " ".to_string();
        assert!(settings.validate().is_err());
    }
}
