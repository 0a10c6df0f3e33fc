//! The `studyprep build-bank` command.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};

use studyprep_core::config::load_config_from;
use studyprep_core::parser;
use studyprep_core::store::write_json_atomic;
use studyprep_core::traits::{build_question_bank, BankFileSource, SourceChain};

pub async fn execute(
    plan_path: PathBuf,
    bank_source: Option<PathBuf>,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let plan = parser::load_study_plan(&plan_path)?;
    anyhow::ensure!(!plan.weeks.is_empty(), "study plan has no weeks");

    let mut chain = SourceChain::new();
    if let Some(path) = &bank_source {
        let bank = parser::load_question_bank(path)?;
        chain = chain.with_source(Arc::new(BankFileSource::new(bank)));
    }

    tracing::debug!(sources = chain.len(), "building question bank");
    let bank = build_question_bank(&plan, &chain).await;

    let output = output.unwrap_or_else(|| config.paths().question_bank());
    write_json_atomic(&output, &bank)
        .with_context(|| format!("failed to write question bank to {}", output.display()))?;

    for week in &bank.weeks {
        let sources: Vec<&str> = week
            .questions
            .iter()
            .map(|q| q.source.as_str())
            .fold(Vec::new(), |mut acc, s| {
                if !acc.contains(&s) {
                    acc.push(s);
                }
                acc
            });
        println!(
            "  Week {}: {} question(s) from {}",
            week.week,
            week.questions.len(),
            sources.join(", ")
        );
    }
    println!(
        "Wrote {} questions to {}",
        bank.question_count(),
        output.display()
    );

    Ok(())
}
