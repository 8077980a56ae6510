pub mod loader;

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A candidate solution as reported by the benchmark harness.
///
/// The harness serialises more than this (the instance matrices among
/// others); everything except the cost and the permutation is ignored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Solution {
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permutation: Option<Vec<u32>>,
}

impl Solution {
    pub fn with_cost(cost: f64) -> Self {
        Solution { cost, permutation: None }
    }
}

/// Final result of one run in the cost-time experiment.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub cost: f64,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub iterations: u64,
    #[serde(default)]
    pub evaluations: u64,
}

/// One improvement recorded while a run was in progress.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TraceEntry {
    pub solution: Solution,
    #[serde(default)]
    pub time: u64,
    #[serde(default)]
    pub iterations: u64,
    #[serde(default)]
    pub evaluations: u64,
}

/// All improvements of one run, in recording order.
pub type Trace = Vec<TraceEntry>;

/// Starting point and local optimum of one local search run.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InitialVsFinal {
    pub initial_solution: Solution,
    pub final_solution: Solution,
}

/// One line of a results file: a batch of runs of one algorithm on one
/// instance size.
///
/// `R` is the per-run payload, which differs between experiment types. The
/// harness writes it under `bestSolutions`, except for the initial-vs-final
/// experiment which uses `initialVsFinals`. An element of that list may also
/// be a nested list of runs; nested lists are flattened in order.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase", bound(deserialize = "R: Deserialize<'de>"))]
pub struct BenchmarkRecord<R> {
    pub instance_size: u64,
    pub function_name: String,
    #[serde(default)]
    pub optimal_solution: Option<Solution>,
    #[serde(rename = "bestSolutions", alias = "initialVsFinals", deserialize_with = "flatten_runs")]
    pub runs: Vec<R>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_runs: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time_milliseconds: Option<u64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RunGroup<R> {
    One(R),
    Many(Vec<R>),
}

fn flatten_runs<'de, D, R>(deserializer: D) -> Result<Vec<R>, D::Error>
where
    D: Deserializer<'de>,
    R: Deserialize<'de>,
{
    let groups = Vec::<RunGroup<R>>::deserialize(deserializer)?;
    let mut runs = Vec::with_capacity(groups.len());
    for group in groups {
        match group {
            RunGroup::One(run) => runs.push(run),
            RunGroup::Many(nested) => runs.extend(nested),
        }
    }
    Ok(runs)
}

pub type CostTimeRecord = BenchmarkRecord<RunSummary>;
pub type BurnoutRecord = BenchmarkRecord<Trace>;
pub type InitialFinalRecord = BenchmarkRecord<InitialVsFinal>;

/// The sampling axis a run was measured on.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Measure {
    Time,
    Iterations,
    Evaluations,
}

impl Measure {
    pub const ALL: [Measure; 3] = [Measure::Time, Measure::Iterations, Measure::Evaluations];

    pub fn name(&self) -> &'static str {
        match self {
            Measure::Time => "time",
            Measure::Iterations => "iterations",
            Measure::Evaluations => "evaluations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Measure::Time => "Time",
            Measure::Iterations => "Iterations",
            Measure::Evaluations => "Evaluations",
        }
    }

    /// Axis label, with the unit where one exists.
    pub fn label(&self) -> &'static str {
        match self {
            Measure::Time => "Time (ms)",
            Measure::Iterations => "Iterations",
            Measure::Evaluations => "Evaluations",
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Measure {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "time" => Ok(Measure::Time),
            "iterations" => Ok(Measure::Iterations),
            "evaluations" => Ok(Measure::Evaluations),
            other => Err(format!(
                "unknown measure '{}', expected one of: time, iterations, evaluations",
                other
            )),
        }
    }
}

/// Anything that carries a cost and the three run counters.
pub trait Measured {
    fn cost(&self) -> f64;
    fn measure(&self, measure: Measure) -> u64;
}

impl Measured for RunSummary {
    fn cost(&self) -> f64 {
        self.cost
    }

    fn measure(&self, measure: Measure) -> u64 {
        match measure {
            Measure::Time => self.time,
            Measure::Iterations => self.iterations,
            Measure::Evaluations => self.evaluations,
        }
    }
}

impl Measured for TraceEntry {
    fn cost(&self) -> f64 {
        self.solution.cost
    }

    fn measure(&self, measure: Measure) -> u64 {
        match measure {
            Measure::Time => self.time,
            Measure::Iterations => self.iterations,
            Measure::Evaluations => self.evaluations,
        }
    }
}

/// Projects a trace onto `(measure, cost)` samples.
pub fn trace_samples(trace: &[TraceEntry], measure: Measure) -> Vec<(u64, f64)> {
    trace.iter().map(|entry| (entry.measure(measure), entry.cost())).collect()
}
