use crate::core::stats::{compute_limits, find_outliers};
use crate::core::{ChartRenderer, ChartReport, DataSource};
use crate::utils::error::Result;

/// Runs load, compute and render once, in that order.
pub struct NpChartEngine<L: DataSource, R: ChartRenderer> {
    loader: L,
    renderer: R,
}

impl<L: DataSource, R: ChartRenderer> NpChartEngine<L, R> {
    pub fn new(loader: L, renderer: R) -> Self {
        Self { loader, renderer }
    }

    pub async fn run(&self) -> Result<ChartReport> {
        tracing::info!("Loading subgroup data...");
        let records = self.loader.load().await?;
        tracing::info!("Loaded {} subgroups", records.len());

        tracing::info!("Computing control limits...");
        let limits = compute_limits(&records)?;
        tracing::info!(
            "p_bar = {:.4}, CL = {:.4}, UCL = {:.4}, LCL = {:.4}",
            limits.p_bar,
            limits.cl,
            limits.ucl,
            limits.lcl
        );

        let outliers = find_outliers(&records, &limits);
        for outlier in &outliers {
            tracing::warn!(
                "Subgroup {} out of control: {} defective units",
                outlier.subgroup,
                outlier.defective
            );
        }

        tracing::info!("Rendering chart...");
        let output_path = self.renderer.render(&records, &limits)?;
        tracing::info!("Chart saved to: {}", output_path);

        Ok(ChartReport {
            records: records.len(),
            limits,
            outliers,
            output_path,
        })
    }
}
