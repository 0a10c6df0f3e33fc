//! Question bank and study plan loading.
//!
//! Loads the JSON documents produced by the provisioning side of the pipeline
//! and validates question banks for common authoring issues.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

use crate::grader::text_matches;
use crate::model::{ExpectedAnswer, QuestionBank, QuestionKind, StudyPlan};

fn load_document<T: DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {what} file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("failed to parse {what}: {}", path.display()))
}

/// Load a question bank from a JSON file.
pub fn load_question_bank(path: &Path) -> Result<QuestionBank> {
    load_document(path, "question bank")
}

/// Parse a question bank from a JSON string (useful for testing).
pub fn parse_question_bank_str(content: &str) -> Result<QuestionBank> {
    serde_json::from_str(content).context("failed to parse question bank JSON")
}

/// Load a study plan from a JSON file.
pub fn load_study_plan(path: &Path) -> Result<StudyPlan> {
    load_document(path, "study plan")
}

/// A warning from question bank validation.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// The week (if applicable).
    pub week: Option<u32>,
    /// Index of the question within its week (if applicable).
    pub question_index: Option<usize>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn week(week: u32, message: impl Into<String>) -> Self {
        Self {
            week: Some(week),
            question_index: None,
            message: message.into(),
        }
    }

    fn question(week: u32, index: usize, message: impl Into<String>) -> Self {
        Self {
            week: Some(week),
            question_index: Some(index),
            message: message.into(),
        }
    }
}

/// Validate a question bank for common issues.
pub fn validate_question_bank(bank: &QuestionBank) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let mut seen_weeks = HashSet::new();
    let mut seen_ids = HashSet::new();
    for week in &bank.weeks {
        if !seen_weeks.insert(week.week) {
            warnings.push(ValidationWarning::week(
                week.week,
                format!("duplicate week number: {}", week.week),
            ));
        }

        if week.questions.is_empty() {
            warnings.push(ValidationWarning::week(week.week, "week has no questions"));
        }

        for (index, q) in week.questions.iter().enumerate() {
            if let Some(id) = &q.id {
                if !seen_ids.insert(id.as_str()) {
                    warnings.push(ValidationWarning::question(
                        week.week,
                        index,
                        format!("duplicate question ID: {id}"),
                    ));
                }
            }

            if q.question.trim().is_empty() {
                warnings.push(ValidationWarning::question(week.week, index, "prompt is empty"));
            }

            if q.kind == QuestionKind::MultipleChoice {
                if q.options.is_empty() {
                    warnings.push(ValidationWarning::question(
                        week.week,
                        index,
                        "multiple-choice question has no options",
                    ));
                } else if let Some(ExpectedAnswer::Text(answer)) = &q.answer {
                    if !q.options.iter().any(|o| text_matches(answer, o)) {
                        warnings.push(ValidationWarning::question(
                            week.week,
                            index,
                            format!("expected answer '{answer}' is not one of the options"),
                        ));
                    }
                }
            }
        }
    }

    warnings
}

/// Number of questions that will be routed to manual review.
pub fn manual_review_count(bank: &QuestionBank) -> usize {
    bank.weeks
        .iter()
        .flat_map(|w| &w.questions)
        .filter(|q| q.answer.is_none())
        .count()
}
