pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::cli::CliConfig;

pub use crate::config::ChartSettings;
pub use crate::core::{chart::NpChartEngine, loader::HttpLoader, render::PlottersRenderer};
pub use crate::domain::model::{ChartReport, ControlLimits, SubgroupRecord, SubgroupSize};
pub use crate::utils::error::{NpChartError, Result};
