//! End-to-end runs of the pipeline over results files on disk.

use solver_benchmark_rs::analysis::FunctionFilter;
use solver_benchmark_rs::pipeline::{ChartKind, Pipeline};
use solver_benchmark_rs::render::{RecordingRenderer, SeriesKind};
use solver_benchmark_rs::results::Measure;
use solver_benchmark_rs::style::PlotStyle;
use solver_benchmark_rs::PlotError;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const COST_TIME: &str = r#"{"functionName":"tabuSearch","instanceSize":10,"optimalSolution":{"cost":50},"bestSolutions":[{"cost":50,"time":4,"iterations":10,"evaluations":100},{"cost":55,"time":6,"iterations":12,"evaluations":120}]}
{"functionName":"heuristic","instanceSize":10,"optimalSolution":{"cost":50},"bestSolutions":[{"cost":70,"time":0,"iterations":0,"evaluations":1}]}
{"functionName":"tabuSearch","instanceSize":20,"optimalSolution":null,"bestSolutions":[{"cost":90,"time":9,"iterations":20,"evaluations":400}]}
"#;

const BURNOUT: &str = r#"{"functionName":"randomWalk","totalRuns":2,"totalTimeMilliseconds":9,"bestSolutions":[[{"solution":{"cost":100},"time":0,"iterations":0},{"solution":{"cost":80},"time":3,"iterations":5}],[{"solution":{"cost":90},"time":0,"iterations":0},{"solution":{"cost":85},"time":2,"iterations":2}]],"instanceSize":12,"optimalSolution":{"cost":60}}
{"functionName":"localSearchGreedy","totalRuns":1,"totalTimeMilliseconds":1,"bestSolutions":[[{"solution":{"cost":95},"time":0},{"solution":{"cost":70},"time":1}]],"instanceSize":12,"optimalSolution":{"cost":60}}
"#;

const INITIAL_FINAL: &str = r#"{"functionName":"localSearchGreedy","initialVsFinals":[{"initialSolution":{"cost":120,"permutation":[3,2,1,0]},"finalSolution":{"cost":110,"permutation":[0,2,1,3]}},{"initialSolution":{"cost":130,"permutation":[1,0,3,2]},"finalSolution":{"cost":100,"permutation":[0,1,2,3]}}],"instanceSize":4,"optimalSolution":{"cost":100,"permutation":[0,1,2,3]}}
"#;

fn write_input(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn style_in(dir: &Path) -> PlotStyle {
    PlotStyle::default().with_output_dir(dir.join("plots"))
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths.iter().map(|p| p.file_name().unwrap().to_string_lossy().into_owned()).collect()
}

#[test]
fn average_distance_skips_instance_without_optimum() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "cost-time-results.txt", COST_TIME);
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    let written = pipeline.run(&ChartKind::AverageDistance { filter: FunctionFilter::All }, &input).unwrap();
    assert_eq!(file_names(&written), vec!["average-fitness.png"]);
    assert!(written[0].starts_with(dir.path().join("plots")));

    let figure = renderer.figure("average-fitness.png").unwrap();
    let tabu = figure.panels[0].series.iter().find(|s| s.name == "tabuSearch").unwrap();
    // only size 10 has an optimum
    assert_eq!(tabu.points.len(), 1);
    assert_eq!(tabu.points[0].0, 10.0);
    assert!((tabu.points[0].1 - 0.05).abs() < 1e-12);
    match &tabu.kind {
        SeriesKind::ErrorBars { std_dev } => assert!((std_dev[0] - 0.05).abs() < 1e-12),
        other => panic!("unexpected series kind {:?}", other),
    }
}

#[test]
fn search_only_drops_baselines() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.txt", COST_TIME);
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    pipeline.run(&ChartKind::AverageDistance { filter: FunctionFilter::SearchOnly }, &input).unwrap();
    let figure = renderer.figure("average-fitness-only-search.png").unwrap();
    let names: Vec<&str> = figure.panels[0].series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["tabuSearch"]);
}

#[test]
fn average_measure_uses_instance_size_categories() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.txt", COST_TIME);
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    let kind = ChartKind::AverageMeasure { measure: Measure::Evaluations, log_scale: true };
    pipeline.run(&kind, &input).unwrap();

    let panel = &renderer.figure("average-evaluations-log.png").unwrap().panels[0];
    assert!(panel.log_y);
    assert_eq!(panel.x_categories, vec!["10", "20"]);
    let tabu = panel.series.iter().find(|s| s.name == "tabuSearch").unwrap();
    assert_eq!(tabu.points, vec![(0.0, 110.0), (1.0, 400.0)]);
}

#[test]
fn distance_vs_measure_draws_one_panel_per_size_with_optimum() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.txt", COST_TIME);
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    let kind = ChartKind::DistanceVsMeasure { measure: Measure::Time, filter: FunctionFilter::All };
    pipeline.run(&kind, &input).unwrap();

    let figure = renderer.figure("fitness-vs-time.png").unwrap();
    assert_eq!(figure.panels.len(), 1);
    assert_eq!(figure.panels[0].title, "Instance Size: 10");
    let tabu = figure.panels[0].series.iter().find(|s| s.name == "tabuSearch").unwrap();
    for &(x, _) in &tabu.points {
        assert!((x - 4.0).abs() <= 0.1 || (x - 6.0).abs() <= 0.1);
    }
}

#[test]
fn cost_over_time_writes_one_chart_per_size() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "burnout-results.txt", BURNOUT);
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    let written = pipeline.run(&ChartKind::CostOverTime { measure: Measure::Time }, &input).unwrap();
    assert_eq!(file_names(&written), vec!["cost-over-time-12.png"]);

    let panel = &renderer.figure("cost-over-time-12.png").unwrap().panels[0];
    let walk = panel.series.iter().find(|s| s.name == "randomWalk").unwrap();
    assert_eq!(walk.points, vec![(0.0, 95.0), (1.0, 95.0), (2.0, 92.5), (3.0, 82.5)]);
    assert!(panel
        .series
        .iter()
        .any(|s| matches!(s.kind, SeriesKind::HorizontalLine { y } if y == 60.0)));
}

#[test]
fn initial_final_charts() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "initial-final.txt", INITIAL_FINAL);
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    pipeline.run(&ChartKind::InitialVsFinal, &input).unwrap();
    pipeline.run(&ChartKind::FitnessDistance, &input).unwrap();
    assert_eq!(file_names(&renderer.paths()), vec!["initial-vs-final-4.png", "fitness-distance-4.png"]);

    let panel = &renderer.figure("fitness-distance-4.png").unwrap().panels[0];
    assert_eq!(panel.series[0].points, vec![(0.5, 0.1), (1.0, 0.0)]);
}

#[test]
fn wrong_results_shape_for_chart_is_rejected() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.txt", COST_TIME);
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    // cost-time runs are not traces
    let err = pipeline.run(&ChartKind::CostOverTime { measure: Measure::Time }, &input).unwrap_err();
    assert!(matches!(err, PlotError::Parse { line: 1, .. }));
}

#[test]
fn malformed_line_aborts_the_whole_run() {
    let dir = TempDir::new().unwrap();
    let input = write_input(&dir, "results.txt", &format!("{}not json\n", COST_TIME));
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    let err = pipeline.run(&ChartKind::AverageDistance { filter: FunctionFilter::All }, &input).unwrap_err();
    assert!(matches!(err, PlotError::Parse { line: 4, .. }));
    assert!(renderer.paths().is_empty());
}

#[test]
fn missing_input_is_not_found() {
    let dir = TempDir::new().unwrap();
    let renderer = RecordingRenderer::new();
    let pipeline = Pipeline::new(style_in(dir.path()), &renderer).print_summaries(false);

    let err = pipeline.run(&ChartKind::InitialVsFinal, &dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, PlotError::NotFound(_)));
}
