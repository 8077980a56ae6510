use crate::analysis::{BySize, Scatter, SizeSummary};
use crate::metrics::Summary;
use prettytable::{row, Table};
use std::collections::BTreeMap;

/// One row per (algorithm, instance size), with an overall average row per algorithm.
pub fn summary_table(by_function: &BTreeMap<String, Vec<SizeSummary>>, value_header: &str) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Function", "Instance Size", "Runs", value_header, "Std Dev", "Min", "Max"]);

    for (function_name, summaries) in by_function {
        for entry in summaries {
            let s = &entry.summary;
            table.add_row(row![
                function_name,
                entry.instance_size,
                s.count,
                format!("{:.4}", s.mean),
                format!("{:.4}", s.std_dev),
                format!("{:.4}", s.min),
                format!("{:.4}", s.max),
            ]);
        }

        // Overall average of the per-size means for this function
        if !summaries.is_empty() {
            let overall = summaries.iter().map(|entry| entry.summary.mean).sum::<f64>() / summaries.len() as f64;
            table.add_row(row![function_name, "AVERAGE", "", format!("{:.4}", overall), "", "", ""]);
        }
    }

    table
}

/// Average best score of every algorithm, grouped by instance size.
pub fn final_cost_table(final_costs: &BySize<Summary>) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Instance Size", "Function", "Runs", "Average Best Score", "Std Dev", "Best", "Worst"]);

    for (instance_size, by_function) in final_costs {
        for (function_name, s) in by_function {
            table.add_row(row![
                instance_size,
                function_name,
                s.count,
                format!("{:.2}", s.mean),
                format!("{:.2}", s.std_dev),
                format!("{:.2}", s.min),
                format!("{:.2}", s.max),
            ]);
        }
    }

    table
}

/// Correlation coefficient of every scatter, `n/a` where it is undefined.
pub fn correlation_table(scatters: &BySize<Scatter>, x_header: &str, y_header: &str) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Instance Size", "Function", "Points", format!("corr({}, {})", x_header, y_header)]);

    for (instance_size, by_function) in scatters {
        for (function_name, scatter) in by_function {
            let correlation = scatter
                .correlation
                .map(|r| format!("{:.4}", r))
                .unwrap_or_else(|| "n/a".to_string());
            table.add_row(row![instance_size, function_name, scatter.points.len(), correlation]);
        }
    }

    table
}

pub fn print_table(title: &str, table: &Table) {
    println!("\n{}", title);
    table.printstd();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(mean: f64) -> Summary {
        Summary { count: 2, mean, std_dev: 0.0, min: mean, max: mean }
    }

    #[test]
    fn summary_table_adds_average_rows() {
        let mut by_function = BTreeMap::new();
        by_function.insert(
            "tabuSearch".to_string(),
            vec![
                SizeSummary { instance_size: 10, summary: summary(0.1) },
                SizeSummary { instance_size: 20, summary: summary(0.3) },
            ],
        );

        let table = summary_table(&by_function, "Mean");
        // header + two sizes + average
        assert_eq!(table.len(), 4);
        assert_eq!(table.get_row(3).unwrap().get_cell(3).unwrap().get_content(), "0.2000");
    }

    #[test]
    fn correlation_table_marks_undefined() {
        let mut scatters = BySize::new();
        scatters.entry(10).or_insert_with(BTreeMap::new).insert(
            "localSearchGreedy".to_string(),
            Scatter { points: vec![(1.0, 1.0)], correlation: None },
        );

        let table = correlation_table(&scatters, "initial", "final");
        assert_eq!(table.len(), 2);
        assert_eq!(table.get_row(1).unwrap().get_cell(3).unwrap().get_content(), "n/a");
    }
}
