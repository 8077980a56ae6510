use crate::results::{BenchmarkRecord, Solution};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// Benchmark runs grouped by instance size, then by algorithm name.
///
/// Each leaf keeps one entry per loaded record, in input order, and each
/// entry holds that record's runs. Keys iterate in ascending order.
#[derive(Debug, Clone)]
pub struct AggregatedView<R> {
    groups: BTreeMap<u64, BTreeMap<String, Vec<Vec<R>>>>,
    optimal: BTreeMap<u64, Solution>,
}

impl<R> Default for AggregatedView<R> {
    fn default() -> Self {
        AggregatedView { groups: BTreeMap::new(), optimal: BTreeMap::new() }
    }
}

impl<R> AggregatedView<R> {
    /// Groups records by `(instance_size, function_name)`.
    ///
    /// Records for the same pair append. When several records declare an
    /// optimal solution for one instance size, the last one wins.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = BenchmarkRecord<R>>,
    {
        let mut view = AggregatedView::default();
        for record in records {
            view.groups
                .entry(record.instance_size)
                .or_default()
                .entry(record.function_name)
                .or_default()
                .push(record.runs);

            if let Some(optimal) = record.optimal_solution {
                view.optimal.insert(record.instance_size, optimal);
            }
        }
        view
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn instance_sizes(&self) -> impl Iterator<Item = u64> + '_ {
        self.groups.keys().copied()
    }

    /// Algorithms benchmarked on `size` with their per-record run lists.
    pub fn functions(&self, size: u64) -> impl Iterator<Item = (&str, &[Vec<R>])> + '_ {
        self.groups
            .get(&size)
            .into_iter()
            .flat_map(|functions| functions.iter().map(|(name, runs)| (name.as_str(), runs.as_slice())))
    }

    /// Every run of `name` on `size`, across all of its records.
    pub fn runs(&self, size: u64, name: &str) -> impl Iterator<Item = &R> + '_ {
        self.groups
            .get(&size)
            .and_then(|functions| functions.get(name))
            .into_iter()
            .flatten()
            .flatten()
    }

    /// Union of algorithm names over all instance sizes, sorted.
    pub fn function_names(&self) -> Vec<&str> {
        let names: BTreeSet<&str> = self
            .groups
            .values()
            .flat_map(|functions| functions.keys().map(String::as_str))
            .collect();
        names.into_iter().collect()
    }

    pub fn optimal(&self, size: u64) -> Option<&Solution> {
        self.optimal.get(&size)
    }

    pub fn optimal_cost(&self, size: u64) -> Option<f64> {
        self.optimal(size).map(|solution| solution.cost)
    }

    /// Looks up the optimal solution of `size`, logging a notice when the
    /// instance has to be skipped because none was recorded.
    pub fn optimal_or_skip(&self, size: u64) -> Option<&Solution> {
        let optimal = self.optimal(size);
        if optimal.is_none() {
            info!(instance_size = size, "skipping instance size {}: no optimal solution", size);
        }
        optimal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::RunSummary;

    fn record(size: u64, name: &str, costs: &[f64], optimal: Option<f64>) -> BenchmarkRecord<RunSummary> {
        BenchmarkRecord {
            instance_size: size,
            function_name: name.to_string(),
            optimal_solution: optimal.map(Solution::with_cost),
            runs: costs
                .iter()
                .map(|&cost| RunSummary { cost, time: 0, iterations: 0, evaluations: 0 })
                .collect(),
            total_runs: None,
            total_time_milliseconds: None,
        }
    }

    #[test]
    fn groups_by_size_then_function() {
        let view = AggregatedView::from_records(vec![
            record(20, "tabuSearch", &[1.0], None),
            record(10, "heuristic", &[2.0], Some(2.0)),
            record(10, "tabuSearch", &[3.0], None),
        ]);

        assert_eq!(view.instance_sizes().collect::<Vec<_>>(), vec![10, 20]);
        let names: Vec<&str> = view.functions(10).map(|(name, _)| name).collect();
        assert_eq!(names, vec!["heuristic", "tabuSearch"]);
        assert_eq!(view.function_names(), vec!["heuristic", "tabuSearch"]);
        assert_eq!(view.optimal_cost(10), Some(2.0));
        assert_eq!(view.optimal_cost(20), None);
    }

    #[test]
    fn repeated_records_append_in_order() {
        let view = AggregatedView::from_records(vec![
            record(10, "randomWalk", &[5.0, 6.0], None),
            record(10, "randomWalk", &[7.0], None),
        ]);

        let costs: Vec<f64> = view.runs(10, "randomWalk").map(|run| run.cost).collect();
        assert_eq!(costs, vec![5.0, 6.0, 7.0]);
        assert_eq!(view.functions(10).next().unwrap().1.len(), 2);
    }

    #[test]
    fn later_optimal_wins() {
        let view = AggregatedView::from_records(vec![
            record(10, "a", &[1.0], Some(4.0)),
            record(10, "b", &[1.0], Some(3.0)),
            record(10, "c", &[1.0], None),
        ]);
        assert_eq!(view.optimal_cost(10), Some(3.0));
    }

    #[test]
    fn unknown_keys_yield_nothing() {
        let view = AggregatedView::from_records(vec![record(10, "a", &[1.0], None)]);
        assert_eq!(view.runs(11, "a").count(), 0);
        assert_eq!(view.runs(10, "b").count(), 0);
        assert_eq!(view.functions(99).count(), 0);
        assert!(view.optimal_or_skip(10).is_none());
    }
}
