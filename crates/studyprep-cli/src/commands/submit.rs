//! The `studyprep submit` command.

use std::path::PathBuf;

use anyhow::Result;

use studyprep_core::config::load_config_from;
use studyprep_core::model::{GradingMode, Submission};
use studyprep_core::parser;
use studyprep_core::session::{AssessmentSession, SubmissionGate};

pub async fn execute(
    week: u32,
    index: usize,
    answer: String,
    bank_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let paths = config.paths();
    let bank_path = bank_path.unwrap_or_else(|| paths.question_bank());
    let bank = parser::load_question_bank(&bank_path)?;

    let question = bank
        .question(week, index)
        .map(|q| q.question.clone())
        .unwrap_or_default();

    let session = AssessmentSession::open(paths, bank, config.grader(), &config.user_id)?;
    let gate = SubmissionGate::new(session);

    let outcome = gate
        .submit(&Submission {
            week,
            question_index: index,
            question,
            user_answer: answer,
        })
        .await?;

    match (outcome.grade.mode, outcome.grade.correct) {
        (GradingMode::ManualReview, _) => println!("Recorded for manual review."),
        (GradingMode::Auto, Some(true)) => println!("Correct!"),
        (GradingMode::Auto, _) => println!("Incorrect."),
    }

    match outcome.week_score {
        Some(score) => println!("Week {week} score: {score:.2}"),
        None => println!("Week {week} has no scored answers yet."),
    }
    if let Some(overall) = outcome.overall {
        println!("Overall: {overall:.2}");
    }

    Ok(())
}
