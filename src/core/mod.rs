pub mod chart;
pub mod loader;
pub mod render;
pub mod stats;

pub use crate::domain::model::{ChartReport, ControlLimits, SubgroupRecord, SubgroupSize};
pub use crate::domain::ports::{ChartRenderer, ConfigProvider, DataSource};
pub use crate::utils::error::Result;
