use crate::analysis::{BySize, Convergence, Scatter, SizeSummary};
use crate::jitter::Jitter;
use crate::render::{Figure, Panel, Series, SeriesKind};
use crate::results::Measure;
use crate::style::PlotStyle;
use std::collections::BTreeMap;
use tracing::warn;

const DISTANCE_LABEL: &str = "Scaled Distance to Optimal Solution";

/// Error-bar lines of the average scaled distance against instance size.
pub fn average_distance(by_function: &BTreeMap<String, Vec<SizeSummary>>, style: &PlotStyle) -> Figure {
    let mut panel = Panel::new(
        "Average Scaled Distance by Instance Size",
        "Instance Size",
        "Average Scaled Distance (with Std Dev)",
    );
    panel.series = by_function
        .iter()
        .map(|(name, summaries)| {
            let points = summaries.iter().map(|s| (s.instance_size as f64, s.summary.mean)).collect();
            let std_dev = summaries.iter().map(|s| s.summary.std_dev).collect();
            Series::new(name.as_str(), style.color_of(name), points, SeriesKind::ErrorBars { std_dev })
        })
        .collect();

    Figure::single(style.single_size, panel)
}

/// Error-bar lines of a measure against instance size, one evenly spaced
/// category per instance size.
pub fn average_measure(
    by_function: &BTreeMap<String, Vec<SizeSummary>>,
    instance_sizes: &[u64],
    measure: Measure,
    log_scale: bool,
    style: &PlotStyle,
) -> Figure {
    let y_label = if log_scale {
        format!("Average {} (log scale)", measure.label())
    } else {
        format!("Average {}", measure.label())
    };
    let mut panel = Panel::new(format!("Average {} by Instance Size", measure.title()), "Instance Size".to_string(), y_label);
    panel.log_y = log_scale;
    panel.x_categories = instance_sizes.iter().map(|size| size.to_string()).collect();

    let category = |size: u64| instance_sizes.iter().position(|&s| s == size).unwrap_or(0) as f64;
    panel.series = by_function
        .iter()
        .map(|(name, summaries)| {
            let points = summaries.iter().map(|s| (category(s.instance_size), s.summary.mean)).collect();
            let std_dev = summaries.iter().map(|s| s.summary.std_dev).collect();
            Series::new(name.as_str(), style.color_of(name), points, SeriesKind::ErrorBars { std_dev })
        })
        .collect();

    Figure::single(style.single_size, panel)
}

/// Grid of jittered scatter panels, one per instance size.
///
/// Instance sizes beyond the grid capacity are left out with a warning.
pub fn distance_vs_measure(by_size: &BySize<Vec<(f64, f64)>>, measure: Measure, style: &PlotStyle) -> Figure {
    let capacity = style.grid_capacity();
    if by_size.len() > capacity {
        warn!(instance_sizes = by_size.len(), capacity, "too many instance sizes for one grid, dropping the largest");
    }

    let mut jitter = Jitter::new(&style.jitter);
    let panels = by_size
        .iter()
        .take(capacity)
        .map(|(size, by_function)| {
            let mut panel = Panel::new(format!("Instance Size: {}", size), measure.title(), DISTANCE_LABEL);
            panel.series = by_function
                .iter()
                .map(|(name, points)| {
                    Series::new(name.as_str(), style.color_of(name), jitter.apply(points), SeriesKind::Scatter)
                })
                .collect();
            panel
        })
        .collect();

    Figure::grid(style.grid_size, style.grid_rows, style.grid_columns, panels)
}

/// Mean cost curve with its min–max band for every algorithm, plus the
/// optimal cost as a reference line when it is known.
pub fn cost_over_time(convergence: &Convergence, measure: Measure, style: &PlotStyle) -> Figure {
    let mut panel = Panel::new(
        format!("Cost Over {} by Function (Instance Size: {})", measure.title(), convergence.instance_size),
        measure.label(),
        "Cost",
    );

    for (name, curve) in &convergence.curves {
        let color = style.color_of(name);
        let xs = (0..=curve.horizon).map(|x| x as f64);
        let mean: Vec<(f64, f64)> = xs.zip(curve.envelope.mean.iter().copied()).collect();

        panel.series.push(Series::new(
            format!("{} (min-max)", name),
            color,
            mean.clone(),
            SeriesKind::Band { lower: curve.envelope.min.clone(), upper: curve.envelope.max.clone() },
        ));
        panel.series.push(Series::new(name.as_str(), color, mean, SeriesKind::Line));
    }

    if let Some(cost) = convergence.optimal_cost {
        panel.series.push(Series::new(
            format!("Optimal Solution (Cost: {})", cost),
            style.optimal_color,
            Vec::new(),
            SeriesKind::HorizontalLine { y: cost },
        ));
    }

    Figure::single(style.burnout_size, panel)
}

/// One scatter panel of an instance size, legend entries carrying the correlation.
pub fn scatter(
    title: String,
    x_label: &str,
    y_label: &str,
    by_function: &BTreeMap<String, Scatter>,
    style: &PlotStyle,
) -> Figure {
    let mut panel = Panel::new(title, x_label, y_label);
    panel.series = by_function
        .iter()
        .map(|(name, scatter)| {
            let label = match scatter.correlation {
                Some(r) => format!("{} (r = {:.3})", name, r),
                None => name.clone(),
            };
            Series::new(label, style.color_of(name), scatter.points.clone(), SeriesKind::Scatter)
        })
        .collect();

    Figure::single(style.single_size, panel)
}
