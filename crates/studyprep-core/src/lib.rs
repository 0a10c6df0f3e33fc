//! studyprep-core: Grading, week scoring, and readiness analytics.
//!
//! This crate defines the study data model, the answer grading policy, the
//! per-week and aggregate readiness computations, and the durable documents
//! that tie them together.

pub mod config;
pub mod error;
pub mod grader;
pub mod model;
pub mod parser;
pub mod progress;
pub mod report;
pub mod scoring;
pub mod session;
pub mod statistics;
pub mod store;
pub mod symbolic;
pub mod traits;

pub use config::{load_config, load_config_from, StudyprepConfig};
pub use error::{StoreError, SymbolicError};
pub use grader::{Grader, SymbolicCapability};
pub use session::{AssessmentSession, DataPaths, SubmissionGate};
