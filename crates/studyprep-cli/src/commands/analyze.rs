//! The `studyprep analyze` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyprep_core::config::load_config_from;
use studyprep_core::report::{analyze_performance, PerformanceReport};
use studyprep_report::write_html_report;

pub fn execute(format: String, output: Option<PathBuf>, config_path: Option<PathBuf>) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json" | "html" | "all"),
        "unknown format '{format}' (expected text, json, html, or all)"
    );

    let config = load_config_from(config_path.as_deref())?;
    let paths = config.paths();
    let output_dir = output.unwrap_or_else(|| paths.root.clone());
    let json_path = output_dir.join("performance_report.json");

    let report = analyze_performance(&paths.readiness(), &json_path)?;

    if matches!(format.as_str(), "html" | "all") {
        let html_path = output_dir.join("performance_report.html");
        write_html_report(&report, &html_path)?;
        eprintln!("HTML report: {}", html_path.display());
    }

    match format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        "text" | "all" => print_summary(&report),
        _ => {}
    }
    eprintln!("JSON report: {}", json_path.display());

    Ok(())
}

fn print_summary(report: &PerformanceReport) {
    let metrics = &report.metrics;
    let week_or_dash = |w: &Option<String>| w.clone().unwrap_or_else(|| "-".to_string());

    let mut table = Table::new();
    table.set_header(vec!["Metric", "Value"]);
    table.add_row(vec![
        Cell::new("Weeks"),
        Cell::new(report.total_weeks),
    ]);
    table.add_row(vec![
        Cell::new("Average score"),
        Cell::new(format!("{:.2}", metrics.average_score)),
    ]);
    table.add_row(vec![
        Cell::new("Best week"),
        Cell::new(week_or_dash(&metrics.best_week)),
    ]);
    table.add_row(vec![
        Cell::new("Worst week"),
        Cell::new(week_or_dash(&metrics.worst_week)),
    ]);
    table.add_row(vec![
        Cell::new("Exam readiness"),
        Cell::new(format!("{:.2}", metrics.exam_readiness)),
    ]);
    println!("{table}");

    if !metrics.week_trend.is_empty() {
        let trend: Vec<String> = metrics
            .sorted_trend()
            .iter()
            .map(|(week, score)| format!("W{week} {score:.2}"))
            .collect();
        println!("Trend: {}", trend.join(" | "));
    }
    println!("{}", metrics.tier().message());
}
