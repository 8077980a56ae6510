use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use solver_benchmark_rs::aggregate::AggregatedView;
use solver_benchmark_rs::analysis::{self, FunctionFilter};
use solver_benchmark_rs::metrics::DistanceMode;
use solver_benchmark_rs::pipeline::{ChartKind, Pipeline};
use solver_benchmark_rs::render::PlottersRenderer;
use solver_benchmark_rs::report;
use solver_benchmark_rs::results::loader::load_records;
use solver_benchmark_rs::results::{InitialVsFinal, Measure, RunSummary, Trace};
use solver_benchmark_rs::style::PlotStyle;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "plot", version, about = "Charts and summaries of optimization benchmark results")]
struct Cli {
    /// Directory the images are written to (overrides the style file)
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    /// JSON style file with colors, font and figure sizes
    #[arg(long, global = true)]
    style: Option<PathBuf>,

    /// Use |cost - optimal| / optimal instead of the signed distance
    #[arg(long, global = true)]
    absolute: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Average scaled distance to the optimum per instance size
    AverageDistance {
        input: PathBuf,
        #[arg(long)]
        search_only: bool,
    },
    /// Average time, iterations or evaluations per instance size
    AverageMeasure {
        input: PathBuf,
        #[arg(long, default_value = "time")]
        measure: Measure,
        #[arg(long)]
        log: bool,
    },
    /// Scaled distance against a measure, one panel per instance size
    DistanceVs {
        input: PathBuf,
        #[arg(long, default_value = "time")]
        measure: Measure,
        #[arg(long)]
        search_only: bool,
    },
    /// Convergence curves of improvement traces
    CostOverTime {
        input: PathBuf,
        #[arg(long, default_value = "time")]
        measure: Measure,
    },
    /// Initial against final cost of local search runs
    InitialVsFinal { input: PathBuf },
    /// Similarity to the optimal permutation against scaled distance
    FitnessDistance { input: PathBuf },
    /// Print summary tables without drawing
    Summary {
        input: PathBuf,
        #[arg(long, value_enum, default_value_t = ExperimentArg::CostTime)]
        experiment: ExperimentArg,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExperimentArg {
    CostTime,
    Burnout,
    InitialFinal,
}

fn filter(search_only: bool) -> FunctionFilter {
    if search_only {
        FunctionFilter::SearchOnly
    } else {
        FunctionFilter::All
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
}

fn print_summary(input: &Path, experiment: ExperimentArg, mode: DistanceMode) -> Result<()> {
    match experiment {
        ExperimentArg::CostTime => {
            let view = AggregatedView::from_records(load_records::<RunSummary, _>(input)?);
            let distances = analysis::distance_by_instance(&view, FunctionFilter::All, mode)?;
            report::print_table("Average scaled distance", &report::summary_table(&distances, "Mean Distance"));
            for measure in Measure::ALL {
                let values = analysis::average_measure(&view, measure, FunctionFilter::All)?;
                let header = format!("Mean {}", measure.title());
                report::print_table(&format!("Average {}", measure), &report::summary_table(&values, &header));
            }
        }
        ExperimentArg::Burnout => {
            let view = AggregatedView::from_records(load_records::<Trace, _>(input)?);
            report::print_table("Average best score", &report::final_cost_table(&analysis::final_costs(&view)?));
        }
        ExperimentArg::InitialFinal => {
            let view = AggregatedView::from_records(load_records::<InitialVsFinal, _>(input)?);
            let scatters = analysis::initial_vs_final(&view);
            report::print_table(
                "Initial vs final cost correlation",
                &report::correlation_table(&scatters, "Initial Cost", "Final Cost"),
            );
            let fitness = analysis::fitness_distance(&view, mode)?;
            report::print_table(
                "Fitness-distance correlation",
                &report::correlation_table(&fitness, "Similarity", "Scaled Distance"),
            );
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut style = match &cli.style {
        Some(path) => PlotStyle::load(path).with_context(|| format!("Failed to load style {}", path.display()))?,
        None => PlotStyle::default(),
    };
    if let Some(dir) = cli.output_dir {
        style = style.with_output_dir(dir);
    }
    let mode = if cli.absolute { DistanceMode::Absolute } else { DistanceMode::Signed };

    let (kind, input) = match cli.command {
        Command::AverageDistance { input, search_only } => {
            (ChartKind::AverageDistance { filter: filter(search_only) }, input)
        }
        Command::AverageMeasure { input, measure, log } => {
            (ChartKind::AverageMeasure { measure, log_scale: log }, input)
        }
        Command::DistanceVs { input, measure, search_only } => {
            (ChartKind::DistanceVsMeasure { measure, filter: filter(search_only) }, input)
        }
        Command::CostOverTime { input, measure } => (ChartKind::CostOverTime { measure }, input),
        Command::InitialVsFinal { input } => (ChartKind::InitialVsFinal, input),
        Command::FitnessDistance { input } => (ChartKind::FitnessDistance, input),
        Command::Summary { input, experiment } => {
            return print_summary(&input, experiment, mode)
                .with_context(|| format!("Failed to summarise {}", input.display()));
        }
    };

    let renderer = PlottersRenderer::new(style.clone());
    let pipeline = Pipeline::new(style, &renderer).distance_mode(mode);
    let written = pipeline
        .run(&kind, &input)
        .with_context(|| format!("Failed to render {} from {}", kind, input.display()))?;

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
