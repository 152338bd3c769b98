//! The conversion state machine
//!
//! A job moves pending → processing → completed | failed. Validation
//! happens before any record exists; after the record is created every
//! failure is captured into it so the caller can always read a
//! definitive status for an id it was handed.

use std::path::PathBuf;
use std::sync::Arc;

use jiff::Timestamp;
use recital_synth::{AudioFormat, SynthError, Synthesizer};
use recital_voices::{VoiceModel, VoiceRegistry};
use uuid::Uuid;

use crate::error::{JobError, Result};
use crate::history::HistoryStore;
use crate::types::{ConversionJob, JobStatus};

/// Stored-markdown preview length for listings
const PREVIEW_CHARS: usize = 200;

/// A conversion request as accepted from the outside
#[derive(Debug, Clone)]
pub struct SubmitRequest {
    pub markdown: String,
    pub title: Option<String>,
    pub voice_id: Option<String>,
}

/// Handle to a completed job's audio, ready for streaming
pub struct AudioDownload {
    pub file: tokio::fs::File,
    pub size: u64,
    pub content_type: &'static str,
    pub filename: String,
}

/// Retention windows for the maintenance sweep; zero disables a window
#[derive(Debug, Clone, Copy)]
pub struct RetentionPolicy {
    pub history_max_age_days: u64,
    pub audio_max_age_days: u64,
}

pub struct JobManager {
    registry: Arc<VoiceRegistry>,
    synthesizer: Arc<Synthesizer>,
    history: Arc<HistoryStore>,
    audio_dir: PathBuf,
    retention: RetentionPolicy,
}

impl JobManager {
    pub fn new(
        registry: Arc<VoiceRegistry>,
        synthesizer: Arc<Synthesizer>,
        history: Arc<HistoryStore>,
        audio_dir: PathBuf,
        retention: RetentionPolicy,
    ) -> Self {
        Self {
            registry,
            synthesizer,
            history,
            audio_dir,
            retention,
        }
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Run a conversion to its terminal state within the calling task
    ///
    /// # Errors
    ///
    /// Returns a validation error before any record is created; every
    /// later failure lands in the returned job's `error` field instead
    pub async fn submit(self: &Arc<Self>, request: SubmitRequest) -> Result<ConversionJob> {
        let (text, voice) = self.validate(&request)?;
        let job = self.create_pending(&request, &voice).await?;
        Ok(self.process(job, text, voice).await)
    }

    /// Accept a conversion and process it on a spawned task
    ///
    /// Returns the pending snapshot immediately; callers poll for the
    /// terminal state. Validation and record creation are identical to
    /// [`Self::submit`].
    ///
    /// # Errors
    ///
    /// Same validation errors as [`Self::submit`]
    pub async fn submit_detached(self: &Arc<Self>, request: SubmitRequest) -> Result<ConversionJob> {
        let (text, voice) = self.validate(&request)?;
        let job = self.create_pending(&request, &voice).await?;

        let manager = Arc::clone(self);
        let snapshot = job.clone();
        tokio::spawn(async move {
            manager.process(job, text, voice).await;
        });

        Ok(snapshot)
    }

    /// Fail-fast checks that run before any record is persisted
    fn validate(&self, request: &SubmitRequest) -> Result<(String, VoiceModel)> {
        let text = recital_extract::extract(&request.markdown);
        if text.is_empty() {
            return Err(JobError::EmptyInput);
        }

        let voice = self.registry.resolve(request.voice_id.as_deref())?;
        Ok((text, voice.clone()))
    }

    async fn create_pending(
        &self,
        request: &SubmitRequest,
        voice: &VoiceModel,
    ) -> Result<ConversionJob> {
        let preview = recital_extract::preview(request.markdown.trim(), PREVIEW_CHARS);
        let job = ConversionJob::new(
            request.title.clone(),
            request.markdown.clone(),
            preview,
            voice.id.clone(),
        );

        self.history.upsert(&job).await?;
        tracing::info!(job = %job.id, voice = %voice.id, "conversion accepted");
        Ok(job)
    }

    /// Drive a pending job to its terminal state
    ///
    /// Every transition is written to the history store at the moment it
    /// happens; a concurrent delete drops the write instead of
    /// resurrecting the record.
    async fn process(&self, mut job: ConversionJob, text: String, voice: VoiceModel) -> ConversionJob {
        job.status = JobStatus::Processing;
        self.record_transition(&job).await;

        match self.run_pipeline(&job, &text, &voice).await {
            Ok((path, format, size)) => {
                job.audio_path = Some(path);
                job.audio_format = Some(format);
                job.file_size = Some(size);
                job.completed_at = Some(Timestamp::now());
                job.status = JobStatus::Completed;
                tracing::info!(job = %job.id, size, "conversion completed");
            }
            Err(summary) => {
                job.error = Some(summary);
                job.status = JobStatus::Failed;
                tracing::warn!(job = %job.id, error = job.error.as_deref(), "conversion failed");
            }
        }

        self.record_transition(&job).await;
        self.spawn_sweep();
        job
    }

    /// Synthesize and persist the audio; errors come back as the
    /// client-facing summary while the detail goes to the log
    async fn run_pipeline(
        &self,
        job: &ConversionJob,
        text: &str,
        voice: &VoiceModel,
    ) -> std::result::Result<(String, AudioFormat, u64), String> {
        let audio = self
            .synthesizer
            .synthesize(text, voice)
            .await
            .map_err(|e| summarize_synth_error(job.id, &e))?;

        let path = self
            .audio_dir
            .join(format!("{}.{}", job.id, audio.format.extension()));

        let size = audio.bytes.len() as u64;
        tokio::fs::write(&path, &audio.bytes).await.map_err(|e| {
            tracing::error!(job = %job.id, path = %path.display(), error = %e, "audio write failed");
            "the generated audio could not be stored".to_string()
        })?;

        Ok((path.display().to_string(), audio.format, size))
    }

    async fn record_transition(&self, job: &ConversionJob) {
        match self.history.update(job).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(job = %job.id, status = %job.status, "record deleted mid-flight, dropping update");
            }
            Err(e) => {
                tracing::error!(job = %job.id, error = %e, "failed to record job transition");
            }
        }
    }

    /// Look up the current state of a conversion
    ///
    /// # Errors
    ///
    /// [`JobError::NotFound`] when the id is unknown
    pub async fn get_status(&self, id: Uuid) -> Result<ConversionJob> {
        self.history.get(id).await?.ok_or(JobError::NotFound(id))
    }

    /// Open a completed conversion's audio for download
    ///
    /// # Errors
    ///
    /// [`JobError::NotFound`] for an unknown id or a completed record
    /// whose file is gone (corruption, logged at error level);
    /// [`JobError::NotReady`] while the job has not completed
    pub async fn get_audio(&self, id: Uuid) -> Result<AudioDownload> {
        let job = self.get_status(id).await?;

        if job.status != JobStatus::Completed {
            return Err(JobError::NotReady(id));
        }

        let format = job.audio_format.unwrap_or(AudioFormat::Wav);
        let Some(path) = job.audio_path.as_deref() else {
            tracing::error!(job = %id, "completed record has no audio path");
            return Err(JobError::NotFound(id));
        };

        let file = match tokio::fs::File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                tracing::error!(job = %id, path, error = %e, "audio file missing for completed conversion");
                return Err(JobError::NotFound(id));
            }
        };

        let size = file
            .metadata()
            .await
            .map_err(|e| JobError::Storage(format!("stat {path}: {e}")))?
            .len();

        Ok(AudioDownload {
            file,
            size,
            content_type: format.content_type(),
            filename: download_filename(&job, format),
        })
    }

    /// Remove a conversion and its audio file
    ///
    /// File removal is best-effort; the record removal decides the
    /// outcome so a vanished file never masks a successful delete.
    ///
    /// # Errors
    ///
    /// [`JobError::NotFound`] when no record exists for the id
    pub async fn delete(&self, id: Uuid) -> Result<()> {
        let job = self.history.get(id).await?.ok_or(JobError::NotFound(id))?;

        if let Some(path) = job.audio_path.as_deref() {
            remove_audio_file(id, path).await;
        }

        if self.history.delete(id).await? {
            tracing::info!(job = %id, "conversion deleted");
            Ok(())
        } else {
            Err(JobError::NotFound(id))
        }
    }

    /// Kick off the retention sweep without blocking the pipeline
    fn spawn_sweep(&self) {
        let history = Arc::clone(&self.history);
        let audio_dir = self.audio_dir.clone();
        let retention = self.retention;

        tokio::spawn(async move {
            if let Err(e) = sweep(&history, &audio_dir, retention).await {
                tracing::warn!(error = %e, "retention sweep failed");
            }
        });
    }
}

/// Drop history records and audio files past their retention windows
async fn sweep(
    history: &HistoryStore,
    audio_dir: &std::path::Path,
    retention: RetentionPolicy,
) -> Result<()> {
    if retention.history_max_age_days > 0 {
        let cutoff = days_ago(retention.history_max_age_days);
        for job in history.purge_older_than(cutoff).await? {
            if let Some(path) = job.audio_path.as_deref() {
                remove_audio_file(job.id, path).await;
            }
        }
    }

    if retention.audio_max_age_days > 0 {
        sweep_orphan_files(audio_dir, retention.audio_max_age_days).await;
    }

    Ok(())
}

/// Remove audio files older than the window regardless of record state;
/// covers files whose record is already gone
async fn sweep_orphan_files(audio_dir: &std::path::Path, max_age_days: u64) {
    let Ok(mut entries) = tokio::fs::read_dir(audio_dir).await else {
        return;
    };

    let max_age = std::time::Duration::from_secs(max_age_days * 24 * 60 * 60);

    while let Ok(Some(entry)) = entries.next_entry().await {
        let Ok(metadata) = entry.metadata().await else {
            continue;
        };
        let Ok(modified) = metadata.modified() else {
            continue;
        };

        if modified.elapsed().is_ok_and(|age| age > max_age) {
            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => tracing::info!(path = %entry.path().display(), "removed expired audio file"),
                Err(e) => tracing::warn!(path = %entry.path().display(), error = %e, "could not remove expired audio file"),
            }
        }
    }
}

async fn remove_audio_file(id: Uuid, path: &str) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::info!(job = %id, path, "audio file removed"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(job = %id, path, "audio file already gone");
        }
        Err(e) => {
            tracing::warn!(job = %id, path, error = %e, "could not remove audio file");
        }
    }
}

fn days_ago(days: u64) -> Timestamp {
    let seconds = i64::try_from(days * 24 * 60 * 60).unwrap_or(i64::MAX);
    Timestamp::now() - jiff::SignedDuration::from_secs(seconds)
}

/// Client-facing filename: the sanitized title when present, the job id
/// otherwise
fn download_filename(job: &ConversionJob, format: AudioFormat) -> String {
    let stem = job
        .title
        .as_deref()
        .map(sanitize_title)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| job.id.to_string());

    format!("{stem}.{}", format.extension())
}

fn sanitize_title(title: &str) -> String {
    title
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '-' | '_'))
        .take(50)
        .collect::<String>()
        .trim()
        .to_string()
}

/// Condense a synthesis error into something safe to show; the full
/// error is logged here and never stored on the record
fn summarize_synth_error(id: Uuid, error: &SynthError) -> String {
    tracing::error!(job = %id, error = %error, "synthesis failed");

    match error {
        SynthError::ModelUnavailable(_) => "the voice model could not be fetched".to_string(),
        SynthError::Synthesis(_) => "the speech engine could not synthesize the text".to_string(),
        SynthError::SynthesisTimeout(secs) => {
            format!("synthesis exceeded the {secs}s time limit")
        }
        SynthError::Encode(_) => "the generated audio could not be encoded".to_string(),
    }
}
