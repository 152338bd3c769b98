//! Deterministic stand-in for the Piper engine

use async_trait::async_trait;
use recital_synth::{ModelPaths, PcmAudio, SpeechEngine, SynthError};

/// Engine that renders a fixed-rate tone proportional to input length
///
/// Fast, deterministic, and ignores the model files on disk, so tests
/// exercise the whole pipeline without an ONNX runtime.
#[derive(Default)]
pub struct MockEngine;

#[async_trait]
impl SpeechEngine for MockEngine {
    async fn render(
        &self,
        _voice_id: &str,
        _paths: &ModelPaths,
        text: &str,
    ) -> Result<PcmAudio, SynthError> {
        Ok(PcmAudio {
            samples: vec![0.05; text.len().max(1) * 32],
            sample_rate: 22050,
        })
    }
}
