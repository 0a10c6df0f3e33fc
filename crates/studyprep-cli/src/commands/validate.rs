//! The `studyprep validate` command.

use std::path::PathBuf;

use anyhow::Result;

use studyprep_core::parser;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = parser::load_question_bank(&bank_path)?;

    println!(
        "Question bank: {} ({} weeks, {} questions)",
        bank.course_name,
        bank.weeks.len(),
        bank.question_count()
    );

    let warnings = parser::validate_question_bank(&bank);
    for w in &warnings {
        let prefix = match (w.week, w.question_index) {
            (Some(week), Some(index)) => format!("  [week {week} #{index}]"),
            (Some(week), None) => format!("  [week {week}]"),
            _ => "  ".to_string(),
        };
        println!("{prefix} WARNING: {}", w.message);
    }

    let manual = parser::manual_review_count(&bank);
    if manual > 0 {
        println!("{manual} question(s) without an expected answer will need manual review.");
    }

    if warnings.is_empty() {
        println!("Question bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
