//! Loader, aggregator, analysis and renderer wired into one parameterized
//! pipeline. The chart kind selects which results file shape is expected
//! and which figures are drawn.

pub mod figures;

use crate::aggregate::AggregatedView;
use crate::analysis::{self, FunctionFilter};
use crate::error::{PlotError, Result};
use crate::metrics::DistanceMode;
use crate::render::{ChartRenderer, Figure};
use crate::report;
use crate::results::loader::load_records;
use crate::results::{InitialVsFinal, Measure, RunSummary, Trace};
use crate::style::PlotStyle;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Shape of the results file a chart is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Experiment {
    /// One final cost and its counters per run.
    CostTime,
    /// One improvement trace per run.
    Burnout,
    /// Starting and final solution per run.
    InitialFinal,
}

impl Experiment {
    pub fn name(&self) -> &'static str {
        match self {
            Experiment::CostTime => "cost-time",
            Experiment::Burnout => "burnout",
            Experiment::InitialFinal => "initial-final",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    AverageDistance { filter: FunctionFilter },
    AverageMeasure { measure: Measure, log_scale: bool },
    DistanceVsMeasure { measure: Measure, filter: FunctionFilter },
    CostOverTime { measure: Measure },
    InitialVsFinal,
    FitnessDistance,
}

impl ChartKind {
    pub fn experiment(&self) -> Experiment {
        match self {
            ChartKind::AverageDistance { .. }
            | ChartKind::AverageMeasure { .. }
            | ChartKind::DistanceVsMeasure { .. } => Experiment::CostTime,
            ChartKind::CostOverTime { .. } => Experiment::Burnout,
            ChartKind::InitialVsFinal | ChartKind::FitnessDistance => Experiment::InitialFinal,
        }
    }

    /// File name without extension; per-instance charts append the size.
    pub fn file_stem(&self) -> String {
        match self {
            ChartKind::AverageDistance { filter: FunctionFilter::All } => "average-fitness".to_string(),
            ChartKind::AverageDistance { filter: FunctionFilter::SearchOnly } => {
                "average-fitness-only-search".to_string()
            }
            ChartKind::AverageMeasure { measure, log_scale } => {
                format!("average-{}{}", measure, if *log_scale { "-log" } else { "" })
            }
            ChartKind::DistanceVsMeasure { measure, filter } => format!(
                "fitness-vs-{}{}",
                measure,
                if *filter == FunctionFilter::SearchOnly { "-search" } else { "" }
            ),
            ChartKind::CostOverTime { measure } => format!("cost-over-{}", measure),
            ChartKind::InitialVsFinal => "initial-vs-final".to_string(),
            ChartKind::FitnessDistance => "fitness-distance".to_string(),
        }
    }

    /// Every chart the cost-time experiment supports.
    pub fn cost_time_suite() -> Vec<ChartKind> {
        let mut kinds = vec![
            ChartKind::AverageDistance { filter: FunctionFilter::All },
            ChartKind::AverageDistance { filter: FunctionFilter::SearchOnly },
        ];
        for log_scale in [false, true] {
            kinds.extend(Measure::ALL.iter().map(|&measure| ChartKind::AverageMeasure { measure, log_scale }));
        }
        kinds.extend(
            Measure::ALL
                .iter()
                .map(|&measure| ChartKind::DistanceVsMeasure { measure, filter: FunctionFilter::All }),
        );
        kinds.push(ChartKind::DistanceVsMeasure { measure: Measure::Time, filter: FunctionFilter::SearchOnly });
        kinds
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_stem())
    }
}

/// Builder over the style, renderer and distance convention used by every chart.
pub struct Pipeline<'r> {
    style: PlotStyle,
    renderer: &'r dyn ChartRenderer,
    distance_mode: DistanceMode,
    print_summaries: bool,
}

impl<'r> Pipeline<'r> {
    pub fn new(style: PlotStyle, renderer: &'r dyn ChartRenderer) -> Self {
        Pipeline { style, renderer, distance_mode: DistanceMode::Signed, print_summaries: true }
    }

    pub fn distance_mode(mut self, mode: DistanceMode) -> Self {
        self.distance_mode = mode;
        self
    }

    pub fn print_summaries(mut self, enabled: bool) -> Self {
        self.print_summaries = enabled;
        self
    }

    pub fn style(&self) -> &PlotStyle {
        &self.style
    }

    /// Loads `input` with the shape `kind` expects and renders it.
    ///
    /// Returns the paths of the written images.
    pub fn run(&self, kind: &ChartKind, input: &Path) -> Result<Vec<PathBuf>> {
        info!(chart = %kind, input = %input.display(), "rendering chart");

        // Load the records with the shape this chart expects, then group them
        match kind.experiment() {
            Experiment::CostTime => {
                let view = AggregatedView::from_records(load_records::<RunSummary, _>(input)?);
                self.render_cost_time(kind, &view)
            }
            Experiment::Burnout => {
                let view = AggregatedView::from_records(load_records::<Trace, _>(input)?);
                self.render_burnout(kind, &view)
            }
            Experiment::InitialFinal => {
                let view = AggregatedView::from_records(load_records::<InitialVsFinal, _>(input)?);
                self.render_initial_final(kind, &view)
            }
        }
    }

    pub fn render_cost_time(&self, kind: &ChartKind, view: &AggregatedView<RunSummary>) -> Result<Vec<PathBuf>> {
        let figure = match *kind {
            ChartKind::AverageDistance { filter } => {
                let by_function = analysis::distance_by_instance(view, filter, self.distance_mode)?;
                self.report("Average scaled distance", || {
                    report::summary_table(&by_function, "Mean Distance")
                });
                figures::average_distance(&by_function, &self.style)
            }
            ChartKind::AverageMeasure { measure, log_scale } => {
                let by_function = analysis::average_measure(view, measure, FunctionFilter::All)?;
                self.report(&format!("Average {}", measure), || {
                    report::summary_table(&by_function, &format!("Mean {}", measure.title()))
                });
                let sizes: Vec<u64> = view.instance_sizes().collect();
                figures::average_measure(&by_function, &sizes, measure, log_scale, &self.style)
            }
            ChartKind::DistanceVsMeasure { measure, filter } => {
                let by_size = analysis::distance_vs_measure(view, measure, filter, self.distance_mode)?;
                figures::distance_vs_measure(&by_size, measure, &self.style)
            }
            _ => return Err(wrong_experiment(kind, Experiment::CostTime)),
        };

        let path = self.output_path(&kind.file_stem());
        self.renderer.render(&figure, &path)?;
        Ok(vec![path])
    }

    pub fn render_burnout(&self, kind: &ChartKind, view: &AggregatedView<Trace>) -> Result<Vec<PathBuf>> {
        let ChartKind::CostOverTime { measure } = *kind else {
            return Err(wrong_experiment(kind, Experiment::Burnout));
        };

        // Print the average best score before drawing
        let final_costs = analysis::final_costs(view)?;
        self.report("Average best score", || report::final_cost_table(&final_costs));

        // One convergence chart per instance size
        let convergences = analysis::cost_over_time(view, measure)?;
        let figures: Vec<(u64, Figure)> = convergences
            .iter()
            .map(|convergence| (convergence.instance_size, figures::cost_over_time(convergence, measure, &self.style)))
            .collect();
        self.render_per_size(kind, figures)
    }

    pub fn render_initial_final(
        &self,
        kind: &ChartKind,
        view: &AggregatedView<InitialVsFinal>,
    ) -> Result<Vec<PathBuf>> {
        // Compute the scatter points and pick the labels for this chart
        let (scatters, title, x_label, y_label) = match kind {
            ChartKind::InitialVsFinal => {
                (analysis::initial_vs_final(view), "Initial vs Final Cost", "Initial Cost", "Final Cost")
            }
            ChartKind::FitnessDistance => (
                analysis::fitness_distance(view, self.distance_mode)?,
                "Fitness-Distance",
                "Similarity to Optimal Permutation",
                "Scaled Distance to Optimal Solution",
            ),
            _ => return Err(wrong_experiment(kind, Experiment::InitialFinal)),
        };

        // Print correlations, then draw one chart per instance size
        self.report(&format!("{} correlation", title), || report::correlation_table(&scatters, x_label, y_label));

        let figures: Vec<(u64, Figure)> = scatters
            .iter()
            .map(|(&size, by_function)| {
                let figure_title = format!("{} (Instance Size: {})", title, size);
                (size, figures::scatter(figure_title, x_label, y_label, by_function, &self.style))
            })
            .collect();
        self.render_per_size(kind, figures)
    }

    fn render_per_size(&self, kind: &ChartKind, figures: Vec<(u64, Figure)>) -> Result<Vec<PathBuf>> {
        figures
            .into_iter()
            .map(|(size, figure)| {
                let path = self.output_path(&format!("{}-{}", kind.file_stem(), size));
                self.renderer.render(&figure, &path)?;
                Ok(path)
            })
            .collect()
    }

    fn output_path(&self, stem: &str) -> PathBuf {
        self.style.output_dir.join(format!("{}.png", stem))
    }

    fn report<F: FnOnce() -> prettytable::Table>(&self, title: &str, table: F) {
        if self.print_summaries {
            report::print_table(title, &table());
        }
    }
}

fn wrong_experiment(kind: &ChartKind, experiment: Experiment) -> PlotError {
    PlotError::WrongExperiment { chart: kind.to_string(), experiment: experiment.name() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_stems_are_deterministic() {
        let stems: Vec<String> = ChartKind::cost_time_suite().iter().map(ChartKind::file_stem).collect();
        assert_eq!(
            stems,
            vec![
                "average-fitness",
                "average-fitness-only-search",
                "average-time",
                "average-iterations",
                "average-evaluations",
                "average-time-log",
                "average-iterations-log",
                "average-evaluations-log",
                "fitness-vs-time",
                "fitness-vs-iterations",
                "fitness-vs-evaluations",
                "fitness-vs-time-search",
            ]
        );
    }

    #[test]
    fn experiments_match_kinds() {
        assert_eq!(ChartKind::CostOverTime { measure: Measure::Time }.experiment(), Experiment::Burnout);
        assert_eq!(ChartKind::FitnessDistance.experiment(), Experiment::InitialFinal);
    }
}
