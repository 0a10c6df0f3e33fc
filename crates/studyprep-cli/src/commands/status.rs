//! The `studyprep status` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyprep_core::config::load_config_from;
use studyprep_core::statistics::analyze;
use studyprep_core::store::{AnswerLog, ReadinessStore};

pub fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let paths = config.paths();
    let store = ReadinessStore::load(&paths.readiness(), &config.user_id)?;
    let log = AnswerLog::load(&paths.answers(), &config.user_id)?;

    if store.week_scores.is_empty() {
        println!("No scored weeks yet for {}.", store.user_id);
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Week", "Score", "Answers"]);
    for (week, score) in &store.week_scores {
        let answered = week
            .parse::<u32>()
            .map(|w| log.for_week(w).count())
            .unwrap_or(0);
        table.add_row(vec![
            Cell::new(week),
            Cell::new(format!("{score:.2}")),
            Cell::new(answered),
        ]);
    }
    println!("{table}");

    if let Some(overall) = store.overall {
        println!("Overall: {overall:.2}");
    }
    let metrics = analyze(&store.week_scores);
    println!(
        "Exam readiness: {:.2} ({})",
        metrics.exam_readiness,
        metrics.tier()
    );

    Ok(())
}
