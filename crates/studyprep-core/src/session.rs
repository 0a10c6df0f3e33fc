//! Assessment session: the grade → log → rescore unit of work.
//!
//! A session is opened over a data directory, holds an in-memory snapshot of
//! the answer log and readiness store, and applies each submission as a
//! single atomic step. Either both documents are updated on disk and in
//! memory, or neither is.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::StoreError;
use crate::grader::Grader;
use crate::model::{timestamp, AnswerRecord, Grade, QuestionBank, Submission};
use crate::scoring::score_for_week;
use crate::store::{commit_staged, stage_json, AnswerLog, Backup, ReadinessStore};

/// Locations of the study documents inside a data directory.
#[derive(Debug, Clone)]
pub struct DataPaths {
    pub root: PathBuf,
}

impl DataPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn question_bank(&self) -> PathBuf {
        self.root.join("question_bank.json")
    }

    pub fn study_plan(&self) -> PathBuf {
        self.root.join("study_plan.json")
    }

    pub fn answers(&self) -> PathBuf {
        self.root.join("answers_tracker.json")
    }

    pub fn readiness(&self) -> PathBuf {
        self.root.join("readiness_scores.json")
    }

    pub fn progress(&self) -> PathBuf {
        self.root.join("progress_tracker.json")
    }

    pub fn performance_report(&self) -> PathBuf {
        self.root.join("performance_report.json")
    }
}

/// What a submission produced.
#[derive(Debug, Clone)]
pub struct SubmissionOutcome {
    pub record: AnswerRecord,
    pub grade: Grade,
    /// The week's recomputed score, if the week has any logged answers.
    pub week_score: Option<f64>,
    /// The store's `overall` after the update.
    pub overall: Option<f64>,
}

/// An open assessment session over one data directory.
#[derive(Debug)]
pub struct AssessmentSession {
    paths: DataPaths,
    grader: Grader,
    bank: QuestionBank,
    answers: AnswerLog,
    readiness: ReadinessStore,
}

impl AssessmentSession {
    /// Open a session: read the answer log and readiness store snapshots.
    pub fn open(
        paths: DataPaths,
        bank: QuestionBank,
        grader: Grader,
        user_id: &str,
    ) -> Result<Self, StoreError> {
        let answers = AnswerLog::load(&paths.answers(), user_id)?;
        let readiness = ReadinessStore::load(&paths.readiness(), user_id)?;
        tracing::debug!(
            answers = answers.answers.len(),
            weeks = readiness.week_scores.len(),
            "opened assessment session at {}",
            paths.root.display()
        );
        Ok(Self {
            paths,
            grader,
            bank,
            answers,
            readiness,
        })
    }

    pub fn answers(&self) -> &AnswerLog {
        &self.answers
    }

    pub fn readiness(&self) -> &ReadinessStore {
        &self.readiness
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    pub fn data_dir(&self) -> &Path {
        &self.paths.root
    }

    /// Grade a submission, log it, rescore its week, and persist both
    /// documents as one step.
    pub fn submit(&mut self, submission: &Submission) -> Result<SubmissionOutcome, StoreError> {
        let week = self
            .bank
            .week(submission.week)
            .ok_or(StoreError::UnknownWeek(submission.week))?;
        let question = week.questions.get(submission.question_index).ok_or(
            StoreError::UnknownQuestion {
                week: submission.week,
                index: submission.question_index,
                len: week.questions.len(),
            },
        )?;

        let grade = self.grader.grade(question, &submission.user_answer);
        let record = AnswerRecord::new(submission, question, grade, timestamp::now());

        let mut answers = self.answers.clone();
        answers.append(record.clone());
        let week_score = score_for_week(submission.week, &answers.answers);
        let mut readiness = self.readiness.clone();
        readiness.apply(submission.week, week_score);

        // Stage both documents before moving either into place. If the
        // second move fails, the answer log is rolled back.
        let answers_path = self.paths.answers();
        let readiness_path = self.paths.readiness();
        let staged_answers = stage_json(&answers_path, &answers)?;
        let staged_readiness = stage_json(&readiness_path, &readiness)?;
        let previous_answers = Backup::take(&answers_path)?;
        commit_staged(staged_answers, &answers_path)?;
        if let Err(e) = commit_staged(staged_readiness, &readiness_path) {
            if let Err(rollback) = previous_answers.restore() {
                tracing::error!("failed to roll back {}: {rollback}", answers_path.display());
            }
            return Err(e);
        }

        self.answers = answers;
        self.readiness = readiness;

        tracing::info!(
            week = submission.week,
            index = submission.question_index,
            mode = %grade.mode,
            correct = ?grade.correct,
            week_score = ?week_score,
            "recorded submission"
        );

        Ok(SubmissionOutcome {
            record,
            grade,
            week_score,
            overall: self.readiness.overall,
        })
    }

    /// Recompute one week's score from the current log and persist it.
    pub fn rescore_week(&mut self, week: u32) -> Result<Option<f64>, StoreError> {
        let score = score_for_week(week, &self.answers.answers);
        let mut readiness = self.readiness.clone();
        if readiness.apply(week, score) {
            readiness.save(&self.paths.readiness())?;
            self.readiness = readiness;
        }
        Ok(score)
    }
}

/// Serializes submissions from concurrent callers behind a single writer lock.
#[derive(Debug, Clone)]
pub struct SubmissionGate {
    session: Arc<Mutex<AssessmentSession>>,
}

impl SubmissionGate {
    pub fn new(session: AssessmentSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn submit(&self, submission: &Submission) -> Result<SubmissionOutcome, StoreError> {
        let mut session = self.session.lock().await;
        session.submit(submission)
    }

    /// Snapshot of the readiness store.
    pub async fn readiness(&self) -> ReadinessStore {
        self.session.lock().await.readiness().clone()
    }

    pub async fn answer_count(&self) -> usize {
        self.session.lock().await.answers().answers.len()
    }
}
