//! Core data model types for studyprep.
//!
//! Questions and question banks come from the provisioning side of the
//! pipeline; answer records are produced by grading submissions against them.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The kind of a question.
///
/// Provenance kinds produced by content sources (`"practice"`, `"article"`,
/// ...) all collapse into [`QuestionKind::Reference`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionKind {
    #[serde(rename = "mcq", alias = "multiple_choice")]
    MultipleChoice,
    #[serde(rename = "short", alias = "short_answer")]
    ShortAnswer,
    #[serde(rename = "reference", other)]
    Reference,
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "mcq"),
            QuestionKind::ShortAnswer => write!(f, "short"),
            QuestionKind::Reference => write!(f, "reference"),
        }
    }
}

/// The expected answer of a question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExpectedAnswer {
    /// A numeric answer, compared with an absolute tolerance.
    Numeric(f64),
    /// A symbolic expression or free text.
    Text(String),
}

impl fmt::Display for ExpectedAnswer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpectedAnswer::Numeric(n) => write!(f, "{n}"),
            ExpectedAnswer::Text(s) => write!(f, "{s}"),
        }
    }
}

/// A single assessment question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Prompt text shown to the student.
    pub question: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    /// Choices for multiple-choice questions.
    #[serde(default)]
    pub options: Vec<String>,
    /// Expected answer; `None` routes submissions to manual review.
    #[serde(default)]
    pub answer: Option<ExpectedAnswer>,
    /// Where the question came from.
    #[serde(default)]
    pub source: String,
}

/// Questions for one week of the course.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekQuestions {
    pub week: u32,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

/// A question bank grouped by week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionBank {
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default, with = "timestamp::option")]
    pub generated_on: Option<NaiveDateTime>,
    #[serde(default)]
    pub weeks: Vec<WeekQuestions>,
}

impl QuestionBank {
    /// Find the questions for a week.
    pub fn week(&self, week: u32) -> Option<&WeekQuestions> {
        self.weeks.iter().find(|w| w.week == week)
    }

    /// Look up a question by week number and index within that week.
    pub fn question(&self, week: u32, index: usize) -> Option<&Question> {
        self.week(week).and_then(|w| w.questions.get(index))
    }

    /// Total number of questions across all weeks.
    pub fn question_count(&self) -> usize {
        self.weeks.iter().map(|w| w.questions.len()).sum()
    }
}

/// One week of a generated study plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanWeek {
    pub week: u32,
    pub topic: String,
    #[serde(default)]
    pub study_plan: String,
    #[serde(default)]
    pub recommended_books: Vec<String>,
    #[serde(default)]
    pub youtube_links: Vec<String>,
    #[serde(default)]
    pub articles: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calendar: Option<WeekCalendar>,
}

/// Inclusive date range a plan week is scheduled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekCalendar {
    #[serde(with = "calendar_date")]
    pub start_date: NaiveDate,
    #[serde(with = "calendar_date")]
    pub end_date: NaiveDate,
}

impl WeekCalendar {
    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start_date <= day && day <= self.end_date
    }
}

/// A weekly study plan derived from a course outline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyPlan {
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub course_code: Option<String>,
    #[serde(default)]
    pub weeks: Vec<PlanWeek>,
}

impl StudyPlan {
    /// The week whose calendar range contains `today`, if any.
    pub fn current_week(&self, today: NaiveDate) -> Option<&PlanWeek> {
        self.weeks
            .iter()
            .find(|w| w.calendar.is_some_and(|c| c.contains(today)))
    }
}

/// A submitted answer, before grading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub week: u32,
    pub question_index: usize,
    pub question: String,
    pub user_answer: String,
}

/// How an answer was graded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingMode {
    Auto,
    ManualReview,
}

impl fmt::Display for GradingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GradingMode::Auto => write!(f, "auto"),
            GradingMode::ManualReview => write!(f, "manual_review"),
        }
    }
}

/// Outcome of grading one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grade {
    /// `None` when the answer awaits manual review.
    pub correct: Option<bool>,
    pub mode: GradingMode,
}

impl Grade {
    pub fn auto(correct: bool) -> Self {
        Self {
            correct: Some(correct),
            mode: GradingMode::Auto,
        }
    }

    pub fn manual_review() -> Self {
        Self {
            correct: None,
            mode: GradingMode::ManualReview,
        }
    }
}

/// A logged, graded submission. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerRecord {
    #[serde(with = "timestamp")]
    pub timestamp: NaiveDateTime,
    pub week: u32,
    pub question_index: usize,
    pub question: String,
    pub user_answer: String,
    pub correct: Option<bool>,
    pub grading: GradingMode,
    #[serde(default)]
    pub source: String,
}

impl AnswerRecord {
    /// Build the record for a graded submission.
    pub fn new(
        submission: &Submission,
        question: &Question,
        grade: Grade,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            timestamp,
            week: submission.week,
            question_index: submission.question_index,
            question: question.question.clone(),
            user_answer: submission.user_answer.clone(),
            correct: grade.correct,
            grading: grade.mode,
            source: question.source.clone(),
        }
    }
}

/// `"%Y-%m-%d %H:%M:%S"` timestamps, the format the study documents use.
pub mod timestamp {
    use chrono::{NaiveDateTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn now() -> NaiveDateTime {
        let now = chrono::Local::now().naive_local();
        // Drop sub-second precision so values survive a save/load cycle.
        now.with_nanosecond(0).unwrap_or(now)
    }

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }

    pub mod option {
        use chrono::NaiveDateTime;
        use serde::{Deserialize, Deserializer, Serializer};

        use super::FORMAT;

        pub fn serialize<S: Serializer>(
            value: &Option<NaiveDateTime>,
            s: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(v) => s.serialize_str(&v.format(FORMAT).to_string()),
                None => s.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            d: D,
        ) -> Result<Option<NaiveDateTime>, D::Error> {
            let raw: Option<String> = Option::deserialize(d)?;
            raw.map(|s| NaiveDateTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
                .transpose()
        }
    }
}

/// `"%b %d, %Y"` dates (`Mar 03, 2025`), as written in study plan calendars.
pub mod calendar_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%b %d, %Y";

    pub fn serialize<S: Serializer>(value: &NaiveDate, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDate::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_kind_serde_names() {
        let mcq: QuestionKind = serde_json::from_str("\"mcq\"").unwrap();
        assert_eq!(mcq, QuestionKind::MultipleChoice);
        let short: QuestionKind = serde_json::from_str("\"short_answer\"").unwrap();
        assert_eq!(short, QuestionKind::ShortAnswer);
        let practice: QuestionKind = serde_json::from_str("\"practice\"").unwrap();
        assert_eq!(practice, QuestionKind::Reference);
        assert_eq!(serde_json::to_string(&mcq).unwrap(), "\"mcq\"");
    }

    #[test]
    fn question_parses_from_bank_json() {
        let json = r#"{
            "type": "mcq",
            "source": "Local Template",
            "question": "What is the main concept behind Graphs?",
            "options": ["Definition", "Algorithm", "Formula", "None of the above"],
            "answer": "Definition"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::MultipleChoice);
        assert_eq!(q.options.len(), 4);
        assert_eq!(q.answer, Some(ExpectedAnswer::Text("Definition".into())));
        assert!(q.id.is_none());
    }

    #[test]
    fn numeric_and_null_answers() {
        let q: Question =
            serde_json::from_str(r#"{"question": "2+2?", "type": "short", "answer": 4}"#).unwrap();
        assert_eq!(q.answer, Some(ExpectedAnswer::Numeric(4.0)));

        let q: Question =
            serde_json::from_str(r#"{"question": "Explain", "type": "short", "answer": null}"#)
                .unwrap();
        assert!(q.answer.is_none());
        assert!(q.options.is_empty());
    }

    #[test]
    fn answer_record_timestamp_format() {
        let ts = NaiveDateTime::parse_from_str("2025-03-01 10:30:00", timestamp::FORMAT).unwrap();
        let record = AnswerRecord {
            timestamp: ts,
            week: 2,
            question_index: 0,
            question: "2+2?".into(),
            user_answer: "4".into(),
            correct: Some(true),
            grading: GradingMode::Auto,
            source: "test".into(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["timestamp"], "2025-03-01 10:30:00");
        assert_eq!(json["grading"], "auto");

        let back: AnswerRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn bank_lookup() {
        let bank = QuestionBank {
            course_name: "Algebra".into(),
            course_code: None,
            generated_on: None,
            weeks: vec![WeekQuestions {
                week: 3,
                topic: "Polynomials".into(),
                questions: vec![Question {
                    id: None,
                    question: "Expand 2(x+1)".into(),
                    kind: QuestionKind::ShortAnswer,
                    options: vec![],
                    answer: Some(ExpectedAnswer::Text("2x+2".into())),
                    source: "test".into(),
                }],
            }],
        };
        assert!(bank.question(3, 0).is_some());
        assert!(bank.question(3, 1).is_none());
        assert!(bank.question(1, 0).is_none());
        assert_eq!(bank.question_count(), 1);
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn plan_week_calendar_parses() {
        let json = r#"{
            "course_name": "Discrete Mathematics",
            "weeks": [
                {"week": 1, "topic": "Sets",
                 "calendar": {"start_date": "Mar 03, 2025", "end_date": "Mar 09, 2025"}},
                {"week": 2, "topic": "Logic"}
            ]
        }"#;
        let plan: StudyPlan = serde_json::from_str(json).unwrap();
        let calendar = plan.weeks[0].calendar.unwrap();
        assert_eq!(calendar.start_date, date(2025, 3, 3));
        assert_eq!(calendar.end_date, date(2025, 3, 9));
        assert!(plan.weeks[1].calendar.is_none());

        let json = serde_json::to_value(&plan.weeks[0]).unwrap();
        assert_eq!(json["calendar"]["start_date"], "Mar 03, 2025");
        assert!(serde_json::to_value(&plan.weeks[1]).unwrap().get("calendar").is_none());
    }

    #[test]
    fn bad_calendar_date_is_rejected() {
        let json = r#"{"week": 1, "topic": "Sets",
            "calendar": {"start_date": "2025-03-03", "end_date": "Mar 09, 2025"}}"#;
        assert!(serde_json::from_str::<PlanWeek>(json).is_err());
    }

    #[test]
    fn current_week_uses_inclusive_range() {
        let week = |n: u32, start: NaiveDate, end: NaiveDate| PlanWeek {
            week: n,
            topic: format!("Topic {n}"),
            study_plan: String::new(),
            recommended_books: vec![],
            youtube_links: vec![],
            articles: vec![],
            calendar: Some(WeekCalendar {
                start_date: start,
                end_date: end,
            }),
        };
        let plan = StudyPlan {
            course_name: "C".into(),
            course_code: None,
            weeks: vec![
                week(1, date(2025, 3, 3), date(2025, 3, 9)),
                week(2, date(2025, 3, 10), date(2025, 3, 16)),
            ],
        };
        assert_eq!(plan.current_week(date(2025, 3, 3)).map(|w| w.week), Some(1));
        assert_eq!(plan.current_week(date(2025, 3, 9)).map(|w| w.week), Some(1));
        assert_eq!(plan.current_week(date(2025, 3, 10)).map(|w| w.week), Some(2));
        assert!(plan.current_week(date(2025, 3, 17)).is_none());
        assert!(plan.current_week(date(2025, 3, 2)).is_none());
    }
}
