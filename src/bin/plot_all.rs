use anyhow::{Context, Result};
use clap::Parser;
use solver_benchmark_rs::aggregate::AggregatedView;
use solver_benchmark_rs::pipeline::{ChartKind, Pipeline};
use solver_benchmark_rs::render::PlottersRenderer;
use solver_benchmark_rs::results::loader::load_records;
use solver_benchmark_rs::results::RunSummary;
use solver_benchmark_rs::style::PlotStyle;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Renders every cost-time chart from one results file.
#[derive(Debug, Parser)]
#[command(name = "plot_all", version)]
struct Args {
    #[arg(default_value = "results/cost-time-results.txt")]
    input: PathBuf,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    #[arg(long)]
    style: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let args = Args::parse();
    let mut style = match &args.style {
        Some(path) => PlotStyle::load(path).with_context(|| format!("Failed to load style {}", path.display()))?,
        None => PlotStyle::default(),
    };
    if let Some(dir) = args.output_dir {
        style = style.with_output_dir(dir);
    }

    let records = load_records::<RunSummary, _>(&args.input)
        .with_context(|| format!("Failed to load {}", args.input.display()))?;
    let view = AggregatedView::from_records(records);
    info!(instance_sizes = view.instance_sizes().count(), "aggregated results");

    let renderer = PlottersRenderer::new(style.clone());
    let pipeline = Pipeline::new(style, &renderer);
    for kind in ChartKind::cost_time_suite() {
        let written = pipeline
            .render_cost_time(&kind, &view)
            .with_context(|| format!("Failed to render {}", kind))?;
        for path in written {
            println!("{}", path.display());
        }
    }

    Ok(())
}
