//! Speech engine seam
//!
//! [`SpeechEngine`] is the boundary to the acoustic model runtime. The
//! production implementation drives Piper ONNX voices; tests substitute
//! their own engine to keep synthesis deterministic and fast.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use piper_rs::synth::PiperSpeechSynthesizer;

use crate::error::{Result, SynthError};
use crate::models::ModelPaths;

/// Raw audio produced by an engine
pub struct PcmAudio {
    /// Mono samples in `[-1.0, 1.0]`
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// An acoustic engine that renders text with a locally cached voice
#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Render `text` with the voice whose artifacts live at `paths`
    ///
    /// # Errors
    ///
    /// Returns [`SynthError::Synthesis`] when the engine rejects the
    /// input or fails to produce audio
    async fn render(&self, voice_id: &str, paths: &ModelPaths, text: &str) -> Result<PcmAudio>;
}

struct LoadedVoice {
    synth: PiperSpeechSynthesizer,
    sample_rate: u32,
}

/// Piper ONNX engine
///
/// Loaded synthesizers are cached per voice id; loading happens once per
/// process and synthesis runs on the blocking thread pool since it is
/// CPU-bound. Whether ONNX Runtime picks an accelerated execution
/// provider is decided by the runtime at session creation, not per
/// request.
#[derive(Default)]
pub struct PiperEngine {
    loaded: Arc<DashMap<String, Arc<LoadedVoice>>>,
}

impl PiperEngine {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SpeechEngine for PiperEngine {
    async fn render(&self, voice_id: &str, paths: &ModelPaths, text: &str) -> Result<PcmAudio> {
        let loaded = Arc::clone(&self.loaded);
        let voice_id = voice_id.to_string();
        let paths = paths.clone();
        let text = text.to_string();

        tokio::task::spawn_blocking(move || render_blocking(&loaded, &voice_id, &paths, &text))
            .await
            .map_err(|e| SynthError::Synthesis(format!("engine task failed: {e}")))?
    }
}

fn render_blocking(
    loaded: &DashMap<String, Arc<LoadedVoice>>,
    voice_id: &str,
    paths: &ModelPaths,
    text: &str,
) -> Result<PcmAudio> {
    let voice = load_voice(loaded, voice_id, paths)?;

    let stream = voice
        .synth
        .synthesize_parallel(text.to_string(), None)
        .map_err(|e| SynthError::Synthesis(format!("piper: {e}")))?;

    let mut samples: Vec<f32> = Vec::new();
    for chunk in stream {
        let chunk = chunk.map_err(|e| SynthError::Synthesis(format!("piper chunk: {e}")))?;
        samples.extend(chunk.into_vec());
    }

    if samples.is_empty() {
        return Err(SynthError::Synthesis(
            "engine produced no audio for the input".to_string(),
        ));
    }

    Ok(PcmAudio {
        samples,
        sample_rate: voice.sample_rate,
    })
}

fn load_voice(
    loaded: &DashMap<String, Arc<LoadedVoice>>,
    voice_id: &str,
    paths: &ModelPaths,
) -> Result<Arc<LoadedVoice>> {
    if let Some(voice) = loaded.get(voice_id) {
        return Ok(Arc::clone(&voice));
    }

    let sample_rate = read_sample_rate(&paths.config)?;

    let model = piper_rs::from_config_path(&paths.config)
        .map_err(|e| SynthError::Synthesis(format!("load voice config: {e}")))?;
    let synth = PiperSpeechSynthesizer::new(model)
        .map_err(|e| SynthError::Synthesis(format!("init synthesizer: {e}")))?;

    tracing::info!(voice = voice_id, sample_rate, "voice loaded");

    let voice = Arc::new(LoadedVoice { synth, sample_rate });
    loaded.insert(voice_id.to_string(), Arc::clone(&voice));
    Ok(voice)
}

/// The output sample rate lives in the voice's JSON config
fn read_sample_rate(config_path: &std::path::Path) -> Result<u32> {
    let raw = std::fs::read_to_string(config_path)
        .map_err(|e| SynthError::Synthesis(format!("read voice config: {e}")))?;
    let json: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| SynthError::Synthesis(format!("parse voice config: {e}")))?;

    json.get("audio")
        .and_then(|audio| audio.get("sample_rate"))
        .and_then(serde_json::Value::as_u64)
        .and_then(|rate| u32::try_from(rate).ok())
        .ok_or_else(|| {
            SynthError::Synthesis("voice config is missing audio.sample_rate".to_string())
        })
}
