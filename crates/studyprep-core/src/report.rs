//! Performance report types with JSON persistence and week-over-week comparison.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::model::timestamp;
use crate::statistics::{analyze, numeric_scores, ReadinessMetrics};

/// A timestamped readiness analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReport {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the report was generated.
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    /// Number of entries in the raw week mapping, including unusable ones.
    pub total_weeks: usize,
    /// Metrics computed from the usable scores.
    pub metrics: ReadinessMetrics,
    /// The raw week mapping the metrics were computed from.
    pub raw_data: IndexMap<String, Value>,
}

impl PerformanceReport {
    /// Analyze a raw week → score mapping.
    pub fn generate(raw: IndexMap<String, Value>) -> Self {
        let scores = numeric_scores(&raw);
        let metrics = analyze(&scores);
        tracing::info!(
            total_weeks = raw.len(),
            scored_weeks = scores.len(),
            exam_readiness = metrics.exam_readiness,
            "generated performance report"
        );
        Self {
            id: Uuid::new_v4(),
            timestamp: timestamp::now(),
            total_weeks: raw.len(),
            metrics,
            raw_data: raw,
        }
    }

    /// Save the report as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize report")?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, json)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        Ok(())
    }

    /// Load a report from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read report from {}", path.display()))?;
        let report: PerformanceReport =
            serde_json::from_str(&content).context("failed to parse report JSON")?;
        Ok(report)
    }

    /// Compare this report against a baseline, week by week.
    ///
    /// Score changes within `threshold` points count as unchanged.
    pub fn compare(&self, baseline: &PerformanceReport, threshold: f64) -> ProgressComparison {
        let current = &self.metrics.week_trend;
        let previous = &baseline.metrics.week_trend;

        let mut improvements = Vec::new();
        let mut regressions = Vec::new();
        let mut unchanged = 0usize;
        let mut new_weeks = Vec::new();

        for (week, &score) in current {
            match previous.get(week) {
                Some(&before) => {
                    let delta = WeekDelta {
                        week: week.clone(),
                        baseline_score: before,
                        current_score: score,
                        delta: score - before,
                    };
                    if delta.delta > threshold {
                        improvements.push(delta);
                    } else if delta.delta < -threshold {
                        regressions.push(delta);
                    } else {
                        unchanged += 1;
                    }
                }
                None => new_weeks.push(week.clone()),
            }
        }

        let dropped_weeks = previous
            .keys()
            .filter(|w| !current.contains_key(*w))
            .cloned()
            .collect();

        ProgressComparison {
            improvements,
            regressions,
            unchanged,
            new_weeks,
            dropped_weeks,
            readiness_delta: self.metrics.exam_readiness - baseline.metrics.exam_readiness,
        }
    }
}

/// Read a raw week → score mapping from a readiness document.
///
/// Accepts the readiness store document (`{"week_scores": {...}}`) or a bare
/// mapping. A missing or unreadable document is "no data": it yields an
/// empty mapping and a warning rather than an error.
pub fn load_raw_scores(path: &Path) -> IndexMap<String, Value> {
    if !path.exists() {
        tracing::warn!("no readiness data at {}", path.display());
        return IndexMap::new();
    }
    let parsed = std::fs::read_to_string(path)
        .map_err(anyhow::Error::from)
        .and_then(|c| serde_json::from_str::<Value>(&c).map_err(anyhow::Error::from));
    match parsed {
        Ok(value) => raw_scores_from_value(value),
        Err(e) => {
            tracing::warn!("unreadable readiness data at {}: {e}", path.display());
            IndexMap::new()
        }
    }
}

fn raw_scores_from_value(value: Value) -> IndexMap<String, Value> {
    match value {
        Value::Object(mut map) => match map.remove("week_scores") {
            Some(Value::Object(scores)) => scores.into_iter().collect(),
            Some(_) => IndexMap::new(),
            None => map.into_iter().collect(),
        },
        _ => IndexMap::new(),
    }
}

/// Load readiness data, analyze it, and write the report next to it.
pub fn analyze_performance(readiness_path: &Path, report_path: &Path) -> Result<PerformanceReport> {
    let report = PerformanceReport::generate(load_raw_scores(readiness_path));
    report.save_json(report_path)?;
    Ok(report)
}

/// Result of comparing two performance reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressComparison {
    /// Weeks whose score went up.
    pub improvements: Vec<WeekDelta>,
    /// Weeks whose score went down.
    pub regressions: Vec<WeekDelta>,
    /// Weeks with no significant change.
    pub unchanged: usize,
    /// Weeks scored now but not in the baseline.
    pub new_weeks: Vec<String>,
    /// Weeks in the baseline but not scored now.
    pub dropped_weeks: Vec<String>,
    /// Change in exam readiness.
    pub readiness_delta: f64,
}

/// A per-week score change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekDelta {
    pub week: String,
    pub baseline_score: f64,
    pub current_score: f64,
    pub delta: f64,
}

impl ProgressComparison {
    /// Format the comparison as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} improved, {} regressed, {} unchanged, exam readiness {:+.2}\n\n",
            self.improvements.len(),
            self.regressions.len(),
            self.unchanged,
            self.readiness_delta
        ));

        for (title, rows) in [
            ("Improvements", &self.improvements),
            ("Regressions", &self.regressions),
        ] {
            if rows.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Week | Baseline | Current | Delta |\n");
            md.push_str("|------|----------|---------|-------|\n");
            for d in rows {
                md.push_str(&format!(
                    "| {} | {:.2} | {:.2} | {:+.2} |\n",
                    d.week, d.baseline_score, d.current_score, d.delta
                ));
            }
            md.push('\n');
        }

        if !self.new_weeks.is_empty() {
            md.push_str(&format!("New weeks: {}\n", self.new_weeks.join(", ")));
        }
        if !self.dropped_weeks.is_empty() {
            md.push_str(&format!("Dropped weeks: {}\n", self.dropped_weeks.join(", ")));
        }

        md
    }

    /// Returns true if any week regressed.
    pub fn has_regressions(&self) -> bool {
        !self.regressions.is_empty()
    }
}
