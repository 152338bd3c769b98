//! Conversion jobs: the state machine, its durable history, and the
//! audio files that completed jobs leave behind

mod error;
mod history;
mod manager;
mod types;

pub use error::{JobError, Result};
pub use history::HistoryStore;
pub use manager::{AudioDownload, JobManager, RetentionPolicy, SubmitRequest};
pub use types::{ConversionJob, JobStatus};
