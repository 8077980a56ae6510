//! Chart-ready series derived from an aggregated view.
//!
//! Every function here is pure: it reads the view and returns new values.
//! Instance sizes without a recorded optimum are skipped with a notice
//! wherever a distance to the optimum is needed.

use crate::aggregate::AggregatedView;
use crate::error::{PlotError, Result};
use crate::metrics::{pearson, permutation_similarity, scaled_distance, DistanceMode, Envelope, Summary};
use crate::results::{trace_samples, InitialVsFinal, Measure, Measured, Trace};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Algorithms that only serve as baselines for the search methods.
pub const BASELINE_FUNCTIONS: [&str; 3] = ["randomWalk", "randomSearch", "heuristic"];

/// Which algorithms a chart includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FunctionFilter {
    #[default]
    All,
    SearchOnly,
}

impl FunctionFilter {
    pub fn accepts(&self, function_name: &str) -> bool {
        match self {
            FunctionFilter::All => true,
            FunctionFilter::SearchOnly => !BASELINE_FUNCTIONS.contains(&function_name),
        }
    }
}

/// Statistics of one algorithm on one instance size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeSummary {
    pub instance_size: u64,
    pub summary: Summary,
}

/// Scatter points of one algorithm, with their correlation when it is defined.
#[derive(Debug, Clone, PartialEq)]
pub struct Scatter {
    pub points: Vec<(f64, f64)>,
    pub correlation: Option<f64>,
}

impl Scatter {
    fn new(points: Vec<(f64, f64)>) -> Self {
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().copied().unzip();
        let correlation = pearson(&xs, &ys).ok();
        Scatter { points, correlation }
    }
}

/// Mean cost curve and min–max band of one algorithm.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub horizon: u64,
    pub envelope: Envelope,
}

/// All convergence curves of one instance size.
#[derive(Debug, Clone, PartialEq)]
pub struct Convergence {
    pub instance_size: u64,
    pub optimal_cost: Option<f64>,
    pub curves: BTreeMap<String, Curve>,
}

pub type BySize<T> = BTreeMap<u64, BTreeMap<String, T>>;

/// Scaled distance of every run's final cost, summarised per algorithm and
/// instance size.
pub fn distance_by_instance<R: Measured>(
    view: &AggregatedView<R>,
    filter: FunctionFilter,
    mode: DistanceMode,
) -> Result<BTreeMap<String, Vec<SizeSummary>>> {
    let mut by_function: BTreeMap<String, Vec<SizeSummary>> = BTreeMap::new();

    for size in view.instance_sizes() {
        let Some(optimal) = view.optimal_or_skip(size) else {
            continue;
        };

        for (name, _) in view.functions(size).filter(|(name, _)| filter.accepts(name)) {
            // Scale every final cost against the optimum
            let distances = view
                .runs(size, name)
                .map(|run| scaled_distance(run.cost(), optimal.cost, mode))
                .collect::<Result<Vec<f64>>>()?;
            let summary = Summary::of(&distances)?;

            by_function
                .entry(name.to_string())
                .or_default()
                .push(SizeSummary { instance_size: size, summary });
        }
    }

    Ok(by_function)
}

/// Time, iteration or evaluation counts summarised per algorithm and
/// instance size.
pub fn average_measure<R: Measured>(
    view: &AggregatedView<R>,
    measure: Measure,
    filter: FunctionFilter,
) -> Result<BTreeMap<String, Vec<SizeSummary>>> {
    let mut by_function: BTreeMap<String, Vec<SizeSummary>> = BTreeMap::new();

    for size in view.instance_sizes() {
        for (name, _) in view.functions(size).filter(|(name, _)| filter.accepts(name)) {
            let values: Vec<f64> = view.runs(size, name).map(|run| run.measure(measure) as f64).collect();
            let summary = Summary::of(&values)?;

            by_function
                .entry(name.to_string())
                .or_default()
                .push(SizeSummary { instance_size: size, summary });
        }
    }

    Ok(by_function)
}

/// `(measure, scaled distance)` points for every run, per instance size.
pub fn distance_vs_measure<R: Measured>(
    view: &AggregatedView<R>,
    measure: Measure,
    filter: FunctionFilter,
    mode: DistanceMode,
) -> Result<BySize<Vec<(f64, f64)>>> {
    let mut by_size = BySize::new();

    for size in view.instance_sizes() {
        let Some(optimal) = view.optimal_or_skip(size) else {
            continue;
        };

        let mut by_function = BTreeMap::new();
        for (name, _) in view.functions(size).filter(|(name, _)| filter.accepts(name)) {
            let points = view
                .runs(size, name)
                .map(|run| -> Result<(f64, f64)> {
                    Ok((run.measure(measure) as f64, scaled_distance(run.cost(), optimal.cost, mode)?))
                })
                .collect::<Result<Vec<_>>>()?;
            by_function.insert(name.to_string(), points);
        }
        by_size.insert(size, by_function);
    }

    Ok(by_size)
}

/// Step-held cost curves of every algorithm, per instance size.
///
/// Each algorithm's runs are held up to the largest measure any of them
/// reached, then combined into a mean curve with a min–max band.
pub fn cost_over_time(view: &AggregatedView<Trace>, measure: Measure) -> Result<Vec<Convergence>> {
    view.instance_sizes()
        .map(|size| -> Result<Convergence> {
            let mut curves = BTreeMap::new();
            for (name, _) in view.functions(size) {
                // Project every trace onto the requested measure
                let traces: Vec<Vec<(u64, f64)>> =
                    view.runs(size, name).map(|trace| trace_samples(trace, measure)).collect();

                // Hold each run up to the common horizon and combine them
                let (horizon, envelope) = Envelope::from_traces(&traces)?;
                debug!(instance_size = size, function = name, horizon, runs = traces.len(), "interpolated runs");
                curves.insert(name.to_string(), Curve { horizon, envelope });
            }

            Ok(Convergence { instance_size: size, optimal_cost: view.optimal_cost(size), curves })
        })
        .collect()
}

/// Cost of the last improvement of every run ("best score"), summarised per
/// instance size and algorithm.
pub fn final_costs(view: &AggregatedView<Trace>) -> Result<BySize<Summary>> {
    let mut by_size = BySize::new();

    for size in view.instance_sizes() {
        let mut by_function = BTreeMap::new();
        for (name, _) in view.functions(size) {
            let costs = view
                .runs(size, name)
                .map(|trace| trace.last().map(|entry| entry.cost()).ok_or(PlotError::EmptyInput("trace")))
                .collect::<Result<Vec<f64>>>()?;
            by_function.insert(name.to_string(), Summary::of(&costs)?);
        }
        by_size.insert(size, by_function);
    }

    Ok(by_size)
}

/// `(initial cost, final cost)` points of every local search run.
pub fn initial_vs_final(view: &AggregatedView<InitialVsFinal>) -> BySize<Scatter> {
    view.instance_sizes()
        .map(|size| {
            let by_function = view
                .functions(size)
                .map(|(name, _)| {
                    let points = view
                        .runs(size, name)
                        .map(|run| (run.initial_solution.cost, run.final_solution.cost))
                        .collect();
                    (name.to_string(), Scatter::new(points))
                })
                .collect();
            (size, by_function)
        })
        .collect()
}

/// `(similarity to the optimal permutation, scaled distance)` points of every
/// final solution.
///
/// Instance sizes whose optimum carries no permutation are skipped with a
/// notice, as are individual solutions without one.
pub fn fitness_distance(view: &AggregatedView<InitialVsFinal>, mode: DistanceMode) -> Result<BySize<Scatter>> {
    let mut by_size = BySize::new();

    for size in view.instance_sizes() {
        // Distances and similarities both need the optimum of this size
        let Some(optimal) = view.optimal_or_skip(size) else {
            continue;
        };
        let Some(optimal_permutation) = optimal.permutation.as_deref() else {
            info!(instance_size = size, "skipping instance size {}: optimal solution has no permutation", size);
            continue;
        };

        let mut by_function = BTreeMap::new();
        for (name, _) in view.functions(size) {
            // Keep only final solutions that carry a permutation
            let points = view
                .runs(size, name)
                .filter_map(|run| {
                    let permutation = run.final_solution.permutation.as_deref()?;
                    Some((permutation, run.final_solution.cost))
                })
                .map(|(permutation, cost)| -> Result<(f64, f64)> {
                    Ok((
                        permutation_similarity(permutation, optimal_permutation)?,
                        scaled_distance(cost, optimal.cost, mode)?,
                    ))
                })
                .collect::<Result<Vec<_>>>()?;

            // Store the points along with their correlation
            by_function.insert(name.to_string(), Scatter::new(points));
        }
        by_size.insert(size, by_function);
    }

    Ok(by_size)
}
