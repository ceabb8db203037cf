use anyhow::Context;
use clap::Parser;
use np_chart::utils::{logger, validation::Validate};
use np_chart::{ChartReport, CliConfig, HttpLoader, NpChartEngine, NpChartError, PlottersRenderer};

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting np-chart");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the async runtime")?;

    if let Err(e) = runtime.block_on(run(&cli)) {
        tracing::error!(
            "np chart failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(cli: &CliConfig) -> Result<(), NpChartError> {
    let settings = cli.settings()?;
    settings.validate()?;

    println!("Downloading data from: {}", settings.data_url);
    let loader = HttpLoader::from_config(&settings)?;
    let renderer = PlottersRenderer::from_config(&settings);

    let report = NpChartEngine::new(loader, renderer).run().await?;
    print_summary(&report);
    Ok(())
}

fn print_summary(report: &ChartReport) {
    let limits = &report.limits;
    println!("Loaded {} subgroups", report.records);
    println!();
    println!("Control limits:");
    println!("  n                        = {}", limits.n);
    println!("  Mean proportion (p_bar)  = {:.4}", limits.p_bar);
    println!("  Center line (CL)         = {:.4}", limits.cl);
    println!("  Upper limit (UCL)        = {:.4}", limits.ucl);
    println!("  Lower limit (LCL)        = {:.4}", limits.lcl);

    if report.outliers.is_empty() {
        println!("\nAll subgroups are within the control limits.");
    } else {
        println!("\nOut of control subgroups:");
        for record in &report.outliers {
            println!("  subgroup {}: {} defective", record.subgroup, record.defective);
        }
    }

    println!("\n✅ Chart saved as: {}", report.output_path);
}
