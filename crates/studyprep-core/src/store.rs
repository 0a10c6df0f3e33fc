//! Durable study documents: the answer log and the readiness store.
//!
//! Both are whole JSON documents. They are read once into memory, mutated,
//! and written back in full; writes go through a temporary file and a rename
//! so a reader never observes a half-written document.

use std::io::Write;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::StoreError;
use crate::model::AnswerRecord;
use crate::scoring::round2;

pub const DEFAULT_USER_ID: &str = "student_001";

/// Ordered log of every graded submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerLog {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub answers: Vec<AnswerRecord>,
}

impl AnswerLog {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            answers: Vec::new(),
        }
    }

    /// Append a record. Records are never edited or removed.
    pub fn append(&mut self, record: AnswerRecord) {
        self.answers.push(record);
    }

    pub fn for_week(&self, week: u32) -> impl Iterator<Item = &AnswerRecord> {
        self.answers.iter().filter(move |r| r.week == week)
    }

    pub fn load(path: &Path, user_id: &str) -> Result<Self, StoreError> {
        load_or(path, || AnswerLog::new(user_id))
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json_atomic(path, self)
    }
}

/// Per-week scores plus the simple-mean `overall` readiness.
///
/// Each week is either unscored (absent) or scored; recording a score
/// overwrites whatever was stored for that week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReadinessStore {
    #[serde(default = "default_user_id")]
    pub user_id: String,
    #[serde(default)]
    pub week_scores: IndexMap<String, f64>,
    /// Mean of all scored weeks. Distinct from the analytics `exam_readiness`.
    #[serde(default)]
    pub overall: Option<f64>,
}

impl ReadinessStore {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            week_scores: IndexMap::new(),
            overall: None,
        }
    }

    /// Transition `week` to `scored(score)` and recompute `overall`.
    pub fn record(&mut self, week: u32, score: f64) {
        self.week_scores.insert(week.to_string(), score);
        self.overall = Some(mean(&self.week_scores));
    }

    /// Apply the result of a week score query. `None` leaves the store alone.
    pub fn apply(&mut self, week: u32, score: Option<f64>) -> bool {
        match score {
            Some(s) => {
                self.record(week, s);
                true
            }
            None => false,
        }
    }

    pub fn score(&self, week: u32) -> Option<f64> {
        self.week_scores.get(&week.to_string()).copied()
    }

    pub fn load(path: &Path, user_id: &str) -> Result<Self, StoreError> {
        load_or(path, || ReadinessStore::new(user_id))
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        write_json_atomic(path, self)
    }
}

fn mean(scores: &IndexMap<String, f64>) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    round2(scores.values().sum::<f64>() / scores.len() as f64)
}

fn default_user_id() -> String {
    DEFAULT_USER_ID.to_string()
}

/// Load a JSON document, or build the default when the file does not exist.
pub(crate) fn load_or<T, F>(path: &Path, default: F) -> Result<T, StoreError>
where
    T: DeserializeOwned,
    F: FnOnce() -> T,
{
    if !path.exists() {
        tracing::debug!("{} not found, starting empty", path.display());
        return Ok(default());
    }
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

/// Serialize `value` into a temporary file next to `path`, ready to be
/// renamed into place.
pub(crate) fn stage_json<T: Serialize>(path: &Path, value: &T) -> Result<NamedTempFile, StoreError> {
    let json = serde_json::to_string_pretty(value)?;
    stage_bytes(path, json.as_bytes())
}

fn stage_bytes(path: &Path, bytes: &[u8]) -> Result<NamedTempFile, StoreError> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };
    std::fs::create_dir_all(dir).map_err(write_err)?;
    let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
    tmp.write_all(bytes).map_err(write_err)?;
    tmp.flush().map_err(write_err)?;
    Ok(tmp)
}

/// Move a staged file into place.
pub(crate) fn commit_staged(tmp: NamedTempFile, path: &Path) -> Result<(), StoreError> {
    tmp.persist(path).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// A document's on-disk contents before it is replaced.
pub(crate) struct Backup {
    path: PathBuf,
    previous: Option<Vec<u8>>,
}

impl Backup {
    pub(crate) fn take(path: &Path) -> Result<Self, StoreError> {
        let previous = match std::fs::read(path) {
            Ok(bytes) => Some(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        Ok(Self {
            path: path.to_path_buf(),
            previous,
        })
    }

    /// Put the previous contents back, or remove the file if there were none.
    pub(crate) fn restore(self) -> Result<(), StoreError> {
        match &self.previous {
            Some(bytes) => {
                let staged = stage_bytes(&self.path, bytes)?;
                commit_staged(staged, &self.path)
            }
            None => std::fs::remove_file(&self.path).map_err(|source| StoreError::Write {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Write a JSON document atomically.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    let staged = stage_json(path, value)?;
    commit_staged(staged, path)
}
