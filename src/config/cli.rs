use crate::config::toml_config::FileConfig;
use crate::config::ChartSettings;
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

/// Running with no flags charts the default dataset into `np_control_chart.png`.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "np-chart")]
#[command(about = "Compute np control limits for a subgroup dataset and render the chart")]
pub struct CliConfig {
    /// TOML settings file; flags override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// CSV source URL
    #[arg(long)]
    pub url: Option<String>,

    /// Image path; `.svg` writes SVG, anything else PNG
    #[arg(short, long)]
    pub output: Option<String>,

    #[arg(long)]
    pub width: Option<u32>,

    #[arg(long)]
    pub height: Option<u32>,

    #[arg(long)]
    pub title: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn settings(&self) -> Result<ChartSettings> {
        let mut settings = ChartSettings::default();

        if let Some(path) = &self.config {
            tracing::info!("Loading configuration from: {}", path.display());
            settings.apply_file(&FileConfig::from_file(path)?);
        }

        if let Some(url) = &self.url {
            settings.data_url = url.clone();
        }
        if let Some(output) = &self.output {
            settings.output_path = output.clone();
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }
        if let Some(title) = &self.title {
            settings.title = title.clone();
        }
        if let Some(timeout) = self.timeout {
            settings.timeout_seconds = timeout;
        }

        Ok(settings)
    }
}
