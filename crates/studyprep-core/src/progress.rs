//! Study progress: completed weeks, watched videos, read books.

use std::path::Path;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::{timestamp, PlanWeek, StudyPlan};
use crate::store::{load_or, write_json_atomic, DEFAULT_USER_ID};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressTracker {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub completed_weeks: Vec<u32>,
    #[serde(default)]
    pub completed_videos: IndexMap<String, Vec<String>>,
    #[serde(default)]
    pub completed_books: IndexMap<String, Vec<String>>,
    #[serde(default, with = "timestamp::option")]
    pub last_updated: Option<NaiveDateTime>,
}

/// Course-wide totals for a study plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProgressSummary {
    pub weeks_completed: usize,
    pub total_weeks: usize,
    pub videos_watched: usize,
    pub books_read: usize,
    /// Completed items over all items in the plan, as a whole percentage.
    pub completion: u32,
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

fn insert_unique(map: &mut IndexMap<String, Vec<String>>, week: u32, item: &str) -> bool {
    let items = map.entry(week.to_string()).or_default();
    if items.iter().any(|i| i == item) {
        return false;
    }
    items.push(item.to_string());
    true
}

impl ProgressTracker {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            completed_weeks: Vec::new(),
            completed_videos: IndexMap::new(),
            completed_books: IndexMap::new(),
            last_updated: None,
        }
    }

    /// Returns `false` if the week was already complete.
    pub fn mark_week_complete(&mut self, week: u32) -> bool {
        if self.completed_weeks.contains(&week) {
            return false;
        }
        self.completed_weeks.push(week);
        true
    }

    pub fn mark_video_watched(&mut self, week: u32, video: &str) -> bool {
        insert_unique(&mut self.completed_videos, week, video)
    }

    pub fn mark_book_read(&mut self, week: u32, book: &str) -> bool {
        insert_unique(&mut self.completed_books, week, book)
    }

    /// Completion percentage for a plan week: each video, each book, and the
    /// week itself count as one item.
    pub fn week_progress(&self, week: &PlanWeek) -> u32 {
        let (done, total) = self.week_items(week);
        (done * 100 / total) as u32
    }

    fn week_items(&self, week: &PlanWeek) -> (usize, usize) {
        let key = week.week.to_string();
        let videos_done = self.completed_videos.get(&key).map_or(0, Vec::len);
        let books_done = self.completed_books.get(&key).map_or(0, Vec::len);
        let week_done = usize::from(self.completed_weeks.contains(&week.week));

        let total = week.youtube_links.len() + week.recommended_books.len() + 1;
        ((videos_done + books_done + week_done).min(total), total)
    }

    /// Totals across the whole plan. Only weeks that appear in the plan count.
    pub fn summary(&self, plan: &StudyPlan) -> ProgressSummary {
        let mut summary = ProgressSummary {
            weeks_completed: 0,
            total_weeks: plan.weeks.len(),
            videos_watched: 0,
            books_read: 0,
            completion: 0,
        };
        let (mut done, mut total) = (0, 0);
        for week in &plan.weeks {
            let key = week.week.to_string();
            summary.weeks_completed += usize::from(self.completed_weeks.contains(&week.week));
            summary.videos_watched += self.completed_videos.get(&key).map_or(0, Vec::len);
            summary.books_read += self.completed_books.get(&key).map_or(0, Vec::len);

            let (week_done, week_total) = self.week_items(week);
            done += week_done;
            total += week_total;
        }
        if total > 0 {
            summary.completion = (done * 100 / total) as u32;
        }
        summary
    }

    pub fn load(path: &Path, user_id: &str) -> Result<Self, StoreError> {
        load_or(path, || ProgressTracker::new(user_id))
    }

    /// Save, stamping `last_updated`.
    pub fn save(&mut self, path: &Path) -> Result<(), StoreError> {
        self.last_updated = Some(timestamp::now());
        write_json_atomic(path, self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan_week(videos: usize, books: usize) -> PlanWeek {
        PlanWeek {
            week: 1,
            topic: "Sets".into(),
            study_plan: String::new(),
            recommended_books: (0..books).map(|i| format!("book{i}")).collect(),
            youtube_links: (0..videos).map(|i| format!("video{i}")).collect(),
            articles: vec![],
            calendar: None,
        }
    }

    #[test]
    fn marks_are_idempotent() {
        let mut p = ProgressTracker::new("s1");
        assert!(p.mark_week_complete(1));
        assert!(!p.mark_week_complete(1));
        assert!(p.mark_video_watched(1, "video0"));
        assert!(!p.mark_video_watched(1, "video0"));
        assert!(p.mark_book_read(1, "book0"));
        assert!(!p.mark_book_read(1, "book0"));
        assert_eq!(p.completed_weeks, vec![1]);
    }

    #[test]
    fn week_progress_counts_items() {
        let week = plan_week(3, 2);
        let mut p = ProgressTracker::new("s1");
        assert_eq!(p.week_progress(&week), 0);

        p.mark_video_watched(1, "video0");
        p.mark_book_read(1, "book1");
        // 2 of 6
        assert_eq!(p.week_progress(&week), 33);

        p.mark_week_complete(1);
        assert_eq!(p.week_progress(&week), 50);
    }

    #[test]
    fn empty_week_is_binary() {
        let week = plan_week(0, 0);
        let mut p = ProgressTracker::new("s1");
        assert_eq!(p.week_progress(&week), 0);
        p.mark_week_complete(1);
        assert_eq!(p.week_progress(&week), 100);
    }

    #[test]
    fn summary_totals_plan_weeks() {
        let mut second = plan_week(1, 1);
        second.week = 2;
        let plan = StudyPlan {
            course_name: "C".into(),
            course_code: None,
            weeks: vec![plan_week(2, 1), second],
        };

        let mut p = ProgressTracker::new("s1");
        assert_eq!(
            p.summary(&plan),
            ProgressSummary {
                weeks_completed: 0,
                total_weeks: 2,
                videos_watched: 0,
                books_read: 0,
                completion: 0,
            }
        );

        p.mark_week_complete(1);
        p.mark_video_watched(1, "video0");
        p.mark_video_watched(2, "video0");
        p.mark_book_read(2, "book0");
        // Not in the plan.
        p.mark_week_complete(9);
        p.mark_book_read(9, "book0");

        let summary = p.summary(&plan);
        assert_eq!(summary.weeks_completed, 1);
        assert_eq!(summary.total_weeks, 2);
        assert_eq!(summary.videos_watched, 2);
        assert_eq!(summary.books_read, 1);
        // 4 of 7 items
        assert_eq!(summary.completion, 57);
    }

    #[test]
    fn summary_of_empty_plan() {
        let plan = StudyPlan {
            course_name: "C".into(),
            course_code: None,
            weeks: vec![],
        };
        let summary = ProgressTracker::new("s1").summary(&plan);
        assert_eq!(summary.total_weeks, 0);
        assert_eq!(summary.completion, 0);
    }

    #[test]
    fn save_stamps_last_updated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress_tracker.json");
        let mut p = ProgressTracker::load(&path, "s1").unwrap();
        assert!(p.last_updated.is_none());
        p.mark_week_complete(2);
        p.save(&path).unwrap();

        let loaded = ProgressTracker::load(&path, "other").unwrap();
        assert_eq!(loaded.user_id, "s1");
        assert_eq!(loaded.completed_weeks, vec![2]);
        assert!(loaded.last_updated.is_some());
    }
}
