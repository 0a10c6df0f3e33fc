//! Aggregate readiness statistics over weekly scores.
//!
//! `analyze` is recomputed from scratch every time; nothing here is
//! maintained incrementally.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::scoring::round2;

/// Weight of the best week in the exam readiness blend.
const PEAK_WEIGHT: f64 = 0.1;

/// Summary metrics derived from a week → score mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessMetrics {
    /// Mean of all week scores, rounded to two decimals.
    pub average_score: f64,
    /// Week with the highest score (first in iteration order on ties).
    pub best_week: Option<String>,
    /// Week with the lowest score (first in iteration order on ties).
    pub worst_week: Option<String>,
    /// `(mean + 0.1 * max) / 1.1`, rounded to two decimals.
    pub exam_readiness: f64,
    /// The input mapping, unmodified.
    pub week_trend: IndexMap<String, f64>,
}

impl ReadinessMetrics {
    /// Metrics for a student with no scored weeks.
    pub fn empty() -> Self {
        Self {
            average_score: 0.0,
            best_week: None,
            worst_week: None,
            exam_readiness: 0.0,
            week_trend: IndexMap::new(),
        }
    }

    /// The trend ordered by week number for display. Keys that are not week
    /// numbers sort last, in their original order.
    pub fn sorted_trend(&self) -> Vec<(&str, f64)> {
        let mut points: Vec<(&str, f64)> = self
            .week_trend
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        points.sort_by_key(|(k, _)| k.trim().parse::<u32>().unwrap_or(u32::MAX));
        points
    }

    pub fn tier(&self) -> ReadinessTier {
        ReadinessTier::classify(self.exam_readiness)
    }
}

/// Compute summary metrics from week scores.
///
/// Ties for best and worst week resolve to the first key in the mapping's
/// insertion order, so repeated calls on the same input always agree.
pub fn analyze(week_scores: &IndexMap<String, f64>) -> ReadinessMetrics {
    if week_scores.is_empty() {
        return ReadinessMetrics::empty();
    }

    let mut best: Option<(&String, f64)> = None;
    let mut worst: Option<(&String, f64)> = None;
    let mut sum = 0.0;
    for (week, &score) in week_scores {
        sum += score;
        if best.map_or(true, |(_, b)| score > b) {
            best = Some((week, score));
        }
        if worst.map_or(true, |(_, w)| score < w) {
            worst = Some((week, score));
        }
    }

    let mean = sum / week_scores.len() as f64;
    let max_score = best.map_or(0.0, |(_, s)| s);
    let exam_readiness = round2((mean + PEAK_WEIGHT * max_score) / (1.0 + PEAK_WEIGHT));

    ReadinessMetrics {
        average_score: round2(mean),
        best_week: best.map(|(w, _)| w.clone()),
        worst_week: worst.map(|(w, _)| w.clone()),
        exam_readiness,
        week_trend: week_scores.clone(),
    }
}

/// Extract the usable scores from a raw week mapping.
///
/// Numbers and numeric strings are kept; anything else is skipped.
pub fn numeric_scores(raw: &IndexMap<String, Value>) -> IndexMap<String, f64> {
    raw.iter()
        .filter_map(|(week, value)| {
            let score = match value {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            if score.is_none() {
                tracing::warn!("ignoring non-numeric score for week {week}: {value}");
            }
            score.map(|s| (week.clone(), s))
        })
        .collect()
}

/// Three-tier bucketing of exam readiness used by presentation layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
    /// Readiness of 75 or more.
    Ready,
    /// Readiness of 60 up to 75.
    OnTrack,
    /// Readiness below 60.
    NeedsImprovement,
}

impl ReadinessTier {
    pub fn classify(exam_readiness: f64) -> Self {
        if exam_readiness >= 75.0 {
            ReadinessTier::Ready
        } else if exam_readiness >= 60.0 {
            ReadinessTier::OnTrack
        } else {
            ReadinessTier::NeedsImprovement
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            ReadinessTier::Ready => "Excellent! You're ready for exams!",
            ReadinessTier::OnTrack => "Good progress! Keep revising weak topics.",
            ReadinessTier::NeedsImprovement => "Needs improvement: focus on weak areas.",
        }
    }
}

impl fmt::Display for ReadinessTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadinessTier::Ready => write!(f, "ready"),
            ReadinessTier::OnTrack => write!(f, "on track"),
            ReadinessTier::NeedsImprovement => write!(f, "needs improvement"),
        }
    }
}
