//! The `studyprep progress` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use studyprep_core::config::load_config_from;
use studyprep_core::parser;
use studyprep_core::progress::ProgressTracker;

pub fn execute(
    week: Option<u32>,
    complete: bool,
    video: Option<String>,
    book: Option<String>,
    plan_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let paths = config.paths();
    let progress_path = paths.progress();
    let mut tracker = ProgressTracker::load(&progress_path, &config.user_id)?;

    if let Some(week) = week {
        anyhow::ensure!(
            complete || video.is_some() || book.is_some(),
            "nothing to update: pass --complete, --video, or --book"
        );

        let mut changed = false;
        if complete {
            changed |= tracker.mark_week_complete(week);
        }
        if let Some(v) = &video {
            changed |= tracker.mark_video_watched(week, v);
        }
        if let Some(b) = &book {
            changed |= tracker.mark_book_read(week, b);
        }

        if changed {
            tracker.save(&progress_path)?;
            println!("Updated progress for week {week}.");
        } else {
            println!("Nothing new for week {week}.");
        }
        return Ok(());
    }

    let plan_path = plan_path.unwrap_or_else(|| paths.study_plan());
    if !plan_path.exists() {
        let mut weeks = tracker.completed_weeks.clone();
        weeks.sort_unstable();
        let listed: Vec<String> = weeks.iter().map(u32::to_string).collect();
        println!(
            "Completed weeks: {}",
            if listed.is_empty() {
                "none".to_string()
            } else {
                listed.join(", ")
            }
        );
        return Ok(());
    }

    let plan = parser::load_study_plan(&plan_path)?;
    let mut table = Table::new();
    table.set_header(vec!["Week", "Topic", "Progress"]);
    for plan_week in &plan.weeks {
        table.add_row(vec![
            Cell::new(plan_week.week),
            Cell::new(&plan_week.topic),
            Cell::new(format!("{}%", tracker.week_progress(plan_week))),
        ]);
    }
    println!("{table}");

    let summary = tracker.summary(&plan);
    println!(
        "Weeks completed: {}/{}",
        summary.weeks_completed, summary.total_weeks
    );
    println!("Videos watched: {}", summary.videos_watched);
    println!("Books read: {}", summary.books_read);
    println!("Course completion: {}%", summary.completion);

    let today = chrono::Local::now().date_naive();
    if let Some(current) = plan.current_week(today) {
        println!("Current week: {} ({})", current.week, current.topic);
    }

    Ok(())
}
