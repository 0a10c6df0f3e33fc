//! Per-week readiness scoring from the answer log.

use crate::model::{AnswerRecord, GradingMode};

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Compute the 0–100 score for `week` from the answer log.
///
/// Every logged answer for the week counts toward the denominator, but only
/// auto-graded correct answers count toward the numerator, so answers still
/// awaiting manual review hold the score down until they are graded.
///
/// Returns `None` when the week has no logged answers. This is a query: a
/// `None` must never clear a previously stored score.
pub fn score_for_week(week: u32, log: &[AnswerRecord]) -> Option<f64> {
    let (total, correct) = log
        .iter()
        .filter(|r| r.week == week)
        .fold((0usize, 0usize), |(total, correct), r| {
            let hit = r.grading == GradingMode::Auto && r.correct == Some(true);
            (total + 1, correct + usize::from(hit))
        });

    if total == 0 {
        return None;
    }
    Some(round2(correct as f64 / total as f64 * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::timestamp;

    fn record(week: u32, correct: Option<bool>, grading: GradingMode) -> AnswerRecord {
        AnswerRecord {
            timestamp: timestamp::now(),
            week,
            question_index: 0,
            question: "q".into(),
            user_answer: "a".into(),
            correct,
            grading,
            source: "test".into(),
        }
    }

    #[test]
    fn empty_week_has_no_score() {
        let log = vec![record(1, Some(true), GradingMode::Auto)];
        assert_eq!(score_for_week(2, &log), None);
        assert_eq!(score_for_week(1, &[]), None);
    }

    #[test]
    fn manual_review_counts_in_denominator_only() {
        let log = vec![
            record(1, Some(true), GradingMode::Auto),
            record(1, None, GradingMode::ManualReview),
        ];
        assert_eq!(score_for_week(1, &log), Some(50.0));
    }

    #[test]
    fn rounds_to_two_decimals() {
        let log = vec![
            record(3, Some(true), GradingMode::Auto),
            record(3, Some(false), GradingMode::Auto),
            record(3, Some(false), GradingMode::Auto),
        ];
        assert_eq!(score_for_week(3, &log), Some(33.33));
    }

    #[test]
    fn resubmissions_are_all_counted() {
        let log = vec![
            record(1, Some(false), GradingMode::Auto),
            record(1, Some(true), GradingMode::Auto),
        ];
        assert_eq!(score_for_week(1, &log), Some(50.0));
    }

    #[test]
    fn recomputation_is_idempotent() {
        let log = vec![
            record(1, Some(true), GradingMode::Auto),
            record(1, Some(false), GradingMode::Auto),
            record(1, None, GradingMode::ManualReview),
            record(2, Some(true), GradingMode::Auto),
        ];
        let first = score_for_week(1, &log).unwrap();
        let second = score_for_week(1, &log).unwrap();
        assert_eq!(first.to_bits(), second.to_bits());
    }

    #[test]
    fn round2_behaviour() {
        assert_eq!(round2(70.909090), 70.91);
        assert_eq!(round2(0.0), 0.0);
        assert_eq!(round2(100.0), 100.0);
    }
}
