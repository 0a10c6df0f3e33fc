//! HTML readiness report generator.
//!
//! Produces a self-contained HTML file with all CSS inlined and the trend
//! chart drawn as inline SVG.

use anyhow::Result;
use std::path::Path;

use studyprep_core::report::PerformanceReport;
use studyprep_core::statistics::ReadinessTier;

/// Escape a string for safe HTML insertion.
fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

/// Generate an HTML report from a performance report.
pub fn generate_html(report: &PerformanceReport) -> String {
    let metrics = &report.metrics;
    let tier = metrics.tier();
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    html.push_str("<title>studyprep readiness report</title>\n");
    html.push_str("<style>\n");
    html.push_str(CSS);
    html.push_str("</style>\n");
    html.push_str("</head>\n<body>\n");

    // Header
    html.push_str("<header>\n");
    html.push_str("<h1>Performance Summary</h1>\n");
    html.push_str(&format!(
        "<p class=\"meta\">{} weeks | generated {}</p>\n",
        report.total_weeks,
        report.timestamp.format("%Y-%m-%d %H:%M:%S")
    ));
    html.push_str("</header>\n");

    // Metrics
    html.push_str("<section class=\"dashboard\">\n");
    html.push_str("<table class=\"summary\">\n<tbody>\n");
    let week_cell = |w: &Option<String>| {
        w.as_deref()
            .map(html_escape)
            .unwrap_or_else(|| "-".to_string())
    };
    html.push_str(&format!(
        "<tr><th>Average score</th><td>{:.2}</td></tr>\n",
        metrics.average_score
    ));
    html.push_str(&format!(
        "<tr><th>Best week</th><td>{}</td></tr>\n",
        week_cell(&metrics.best_week)
    ));
    html.push_str(&format!(
        "<tr><th>Worst week</th><td>{}</td></tr>\n",
        week_cell(&metrics.worst_week)
    ));
    html.push_str(&format!(
        "<tr><th>Exam readiness</th><td>{:.2}</td></tr>\n",
        metrics.exam_readiness
    ));
    html.push_str("</tbody></table>\n");
    html.push_str(&format!(
        "<p class=\"tier {}\">{}</p>\n",
        tier_class(tier),
        html_escape(tier.message())
    ));
    html.push_str("</section>\n");

    // Trend
    html.push_str("<section class=\"trend\">\n");
    html.push_str("<h2>Readiness Trend</h2>\n");
    let points = metrics.sorted_trend();
    if points.is_empty() {
        html.push_str("<p class=\"meta\">No scored weeks yet.</p>\n");
    } else {
        html.push_str(&generate_trend_chart(&points));
    }
    html.push_str("</section>\n");

    // Raw JSON
    html.push_str("<section class=\"raw-data\">\n");
    html.push_str("<details>\n<summary>Raw JSON Data</summary>\n");
    html.push_str("<pre><code>");
    html.push_str(&html_escape(
        &serde_json::to_string_pretty(report).unwrap_or_default(),
    ));
    html.push_str("</code></pre>\n");
    html.push_str("</details>\n</section>\n");

    html.push_str("</body>\n</html>");
    html
}

/// Write an HTML report to a file.
pub fn write_html_report(report: &PerformanceReport, path: &Path) -> Result<()> {
    let html = generate_html(report);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, html)?;
    Ok(())
}

fn tier_class(tier: ReadinessTier) -> &'static str {
    match tier {
        ReadinessTier::Ready => "ready",
        ReadinessTier::OnTrack => "on-track",
        ReadinessTier::NeedsImprovement => "needs-improvement",
    }
}

/// Line chart of week scores on a fixed 0–100 scale.
fn generate_trend_chart(points: &[(&str, f64)]) -> String {
    let width = 600.0;
    let height = 240.0;
    let pad = 40.0;
    let plot_w = width - 2.0 * pad;
    let plot_h = height - 2.0 * pad;

    let step = if points.len() > 1 {
        plot_w / (points.len() - 1) as f64
    } else {
        0.0
    };
    let coords: Vec<(f64, f64)> = points
        .iter()
        .enumerate()
        .map(|(i, (_, score))| {
            let x = pad + step * i as f64;
            let y = pad + plot_h * (1.0 - score.clamp(0.0, 100.0) / 100.0);
            (x, y)
        })
        .collect();

    let mut svg = format!(
        "<svg width=\"{width}\" height=\"{height}\" xmlns=\"http://www.w3.org/2000/svg\">\n"
    );

    // Axes and gridlines at 0, 50, 100
    for level in [0.0, 50.0, 100.0] {
        let y = pad + plot_h * (1.0 - level / 100.0);
        svg.push_str(&format!(
            "  <line x1=\"{pad}\" y1=\"{y}\" x2=\"{}\" y2=\"{y}\" stroke=\"#9ca3af\" stroke-width=\"0.5\"/>\n",
            pad + plot_w
        ));
        svg.push_str(&format!(
            "  <text x=\"{}\" y=\"{y}\" font-size=\"11\" fill=\"currentColor\" text-anchor=\"end\" dominant-baseline=\"middle\">{level}</text>\n",
            pad - 6.0
        ));
    }

    let polyline: Vec<String> = coords.iter().map(|(x, y)| format!("{x:.1},{y:.1}")).collect();
    svg.push_str(&format!(
        "  <polyline points=\"{}\" fill=\"none\" stroke=\"#3b82f6\" stroke-width=\"2\"/>\n",
        polyline.join(" ")
    ));

    for ((week, score), (x, y)) in points.iter().zip(&coords) {
        svg.push_str(&format!(
            "  <circle cx=\"{x:.1}\" cy=\"{y:.1}\" r=\"4\" fill=\"#3b82f6\"><title>{:.2}</title></circle>\n",
            score
        ));
        svg.push_str(&format!(
            "  <text x=\"{x:.1}\" y=\"{}\" font-size=\"12\" fill=\"currentColor\" text-anchor=\"middle\">W{}</text>\n",
            height - pad / 2.0,
            html_escape(week)
        ));
    }

    svg.push_str("</svg>\n");
    svg
}

const CSS: &str = r#"
:root { --bg: #fff; --fg: #1a1a1a; --border: #e5e7eb; --ready: #dcfce7; --on-track: #fef9c3; --needs: #fde2e2; }
@media (prefers-color-scheme: dark) {
  :root { --bg: #111827; --fg: #f9fafb; --border: #374151; --ready: #064e3b; --on-track: #713f12; --needs: #7f1d1d; }
}
body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', sans-serif; margin: 0; padding: 2rem; background: var(--bg); color: var(--fg); }
h1, h2 { margin-top: 2rem; }
.meta { color: #6b7280; }
table { border-collapse: collapse; margin: 1rem 0; }
th, td { border: 1px solid var(--border); padding: 0.5rem 1rem; text-align: left; }
th { background: var(--border); }
.tier { padding: 0.75rem 1rem; border-radius: 8px; font-style: italic; }
.ready { background: var(--ready); }
.on-track { background: var(--on-track); }
.needs-improvement { background: var(--needs); }
pre { overflow-x: auto; padding: 1rem; background: var(--border); border-radius: 8px; }
code { font-family: 'JetBrains Mono', 'Fira Code', monospace; font-size: 0.85rem; }
details { margin: 1rem 0; }
summary { cursor: pointer; font-weight: bold; }
svg { margin: 1rem 0; }
"#;
