use crate::domain::model::{ControlLimits, SubgroupRecord};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait ConfigProvider: Send + Sync {
    fn data_url(&self) -> &str;
    fn request_timeout(&self) -> Duration;
    fn output_path(&self) -> &str;
    fn dimensions(&self) -> (u32, u32);
    fn title(&self) -> &str;
}

#[async_trait]
pub trait DataSource: Send + Sync {
    async fn load(&self) -> Result<Vec<SubgroupRecord>>;
}

pub trait ChartRenderer: Send + Sync {
    /// Draws the chart and returns the path of the written image.
    fn render(&self, records: &[SubgroupRecord], limits: &ControlLimits) -> Result<String>;
}
