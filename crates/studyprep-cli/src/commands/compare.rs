//! The `studyprep compare` command.

use std::path::PathBuf;

use anyhow::Result;

use studyprep_core::config::load_config_from;
use studyprep_core::report::PerformanceReport;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    threshold: Option<f64>,
    fail_on_regression: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let threshold = match threshold {
        Some(t) => t,
        None => load_config_from(config_path.as_deref())?.regression_threshold,
    };
    anyhow::ensure!(threshold >= 0.0, "threshold must not be negative");

    let baseline = PerformanceReport::load_json(&baseline_path)?;
    let current = PerformanceReport::load_json(&current_path)?;

    let report = current.compare(&baseline, threshold);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", report.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!(
                "Comparison: {} regressions, {} improvements, {} unchanged",
                report.regressions.len(),
                report.improvements.len(),
                report.unchanged
            );

            if !report.regressions.is_empty() {
                println!("\nRegressions:");
                for r in &report.regressions {
                    println!(
                        "  Week {} {:.2} -> {:.2} ({:+.2})",
                        r.week, r.baseline_score, r.current_score, r.delta
                    );
                }
            }

            if !report.improvements.is_empty() {
                println!("\nImprovements:");
                for i in &report.improvements {
                    println!(
                        "  Week {} {:.2} -> {:.2} ({:+.2})",
                        i.week, i.baseline_score, i.current_score, i.delta
                    );
                }
            }

            if !report.new_weeks.is_empty() {
                println!("\nNew week(s): {}", report.new_weeks.join(", "));
            }
            if !report.dropped_weeks.is_empty() {
                println!("Dropped week(s): {}", report.dropped_weeks.join(", "));
            }
            println!("\nExam readiness: {:+.2}", report.readiness_delta);
        }
    }

    if fail_on_regression && report.has_regressions() {
        std::process::exit(1);
    }

    Ok(())
}
