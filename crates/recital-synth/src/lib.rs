//! Speech synthesis pipeline
//!
//! Wraps the acoustic engine behind a seam, keeps voice models cached
//! locally with single-flight fetch, and encodes finished audio for
//! download.

mod audio;
mod engine;
mod error;
mod models;

use std::sync::Arc;
use std::time::Duration;

use recital_voices::VoiceModel;

pub use audio::{AudioFormat, EncodedAudio, FfmpegTranscoder};
pub use engine::{PcmAudio, PiperEngine, SpeechEngine};
pub use error::{Result, SynthError};
pub use models::{ModelCache, ModelPaths};

/// The synthesis front door: model acquisition, engine invocation under
/// a deadline, and audio encoding
pub struct Synthesizer {
    engine: Arc<dyn SpeechEngine>,
    cache: ModelCache,
    transcoder: Option<FfmpegTranscoder>,
    timeout: Duration,
}

impl Synthesizer {
    pub fn new(
        engine: Arc<dyn SpeechEngine>,
        cache: ModelCache,
        transcoder: Option<FfmpegTranscoder>,
        timeout: Duration,
    ) -> Self {
        Self {
            engine,
            cache,
            transcoder,
            timeout,
        }
    }

    /// Synthesize `text` with `voice` into playable audio
    ///
    /// The voice's model is fetched on first use (single-flight across
    /// concurrent jobs). The engine call runs under the configured
    /// deadline; on expiry no audio is produced.
    ///
    /// # Errors
    ///
    /// [`SynthError::ModelUnavailable`] when the model fetch fails,
    /// [`SynthError::Synthesis`] when the engine rejects the input,
    /// [`SynthError::SynthesisTimeout`] on deadline expiry
    pub async fn synthesize(&self, text: &str, voice: &VoiceModel) -> Result<EncodedAudio> {
        let paths = self.cache.ensure(voice).await?;

        let pcm = tokio::time::timeout(self.timeout, self.engine.render(&voice.id, &paths, text))
            .await
            .map_err(|_| SynthError::SynthesisTimeout(self.timeout.as_secs()))??;

        let wav = audio::encode_wav(&pcm)?;

        match &self.transcoder {
            Some(transcoder) => match transcoder.to_mp3(&wav).await {
                Ok(mp3) => Ok(EncodedAudio {
                    bytes: mp3,
                    format: AudioFormat::Mp3,
                }),
                Err(e) => {
                    // Degrade to WAV rather than failing the job
                    tracing::warn!(error = %e, "mp3 transcode failed, serving wav");
                    Ok(EncodedAudio {
                        bytes: wav,
                        format: AudioFormat::Wav,
                    })
                }
            },
            None => Ok(EncodedAudio {
                bytes: wav,
                format: AudioFormat::Wav,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct SilenceEngine;

    #[async_trait]
    impl SpeechEngine for SilenceEngine {
        async fn render(
            &self,
            _voice_id: &str,
            _paths: &ModelPaths,
            text: &str,
        ) -> Result<PcmAudio> {
            Ok(PcmAudio {
                samples: vec![0.0; text.len().max(1) * 16],
                sample_rate: 22050,
            })
        }
    }

    struct StuckEngine;

    #[async_trait]
    impl SpeechEngine for StuckEngine {
        async fn render(
            &self,
            _voice_id: &str,
            _paths: &ModelPaths,
            _text: &str,
        ) -> Result<PcmAudio> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!()
        }
    }

    fn seeded_cache(dir: &std::path::Path, voice_id: &str) -> ModelCache {
        std::fs::write(dir.join(format!("{voice_id}.onnx")), b"model").unwrap();
        std::fs::write(dir.join(format!("{voice_id}.onnx.json")), b"{}").unwrap();
        ModelCache::new(dir.to_path_buf(), "http://127.0.0.1:1".to_string())
    }

    #[tokio::test]
    async fn synthesize_produces_wav_without_ffmpeg() {
        let dir = tempfile::tempdir().unwrap();
        let registry = recital_voices::VoiceRegistry::new();
        let voice = registry.default_voice();
        let cache = seeded_cache(dir.path(), &voice.id);

        let synthesizer = Synthesizer::new(
            Arc::new(SilenceEngine),
            cache,
            None,
            Duration::from_secs(5),
        );

        let audio = synthesizer.synthesize("hello there", voice).await.unwrap();
        assert_eq!(audio.format, AudioFormat::Wav);
        assert!(!audio.bytes.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_expiry_maps_to_timeout_error() {
        let dir = tempfile::tempdir().unwrap();
        let registry = recital_voices::VoiceRegistry::new();
        let voice = registry.default_voice();
        let cache = seeded_cache(dir.path(), &voice.id);

        let synthesizer = Synthesizer::new(
            Arc::new(StuckEngine),
            cache,
            None,
            Duration::from_secs(2),
        );

        let err = synthesizer.synthesize("hello", voice).await.unwrap_err();
        assert!(matches!(err, SynthError::SynthesisTimeout(2)));
    }
}
