//! PCM-to-container encoding
//!
//! The engine hands back mono f32 samples; they are written out as
//! 16-bit WAV, then transcoded to MP3 when ffmpeg is available on the
//! host. Transcode failures fall back to the WAV transparently.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

use crate::engine::PcmAudio;
use crate::error::{Result, SynthError};

/// Container format of a finished audio file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    Wav,
    Mp3,
}

impl AudioFormat {
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::Wav => "audio/wav",
            Self::Mp3 => "audio/mpeg",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Wav => "wav",
            Self::Mp3 => "mp3",
        }
    }
}

/// Finished, playable audio
pub struct EncodedAudio {
    pub bytes: Vec<u8>,
    pub format: AudioFormat,
}

/// Encode mono f32 PCM as a 16-bit WAV byte buffer
pub fn encode_wav(pcm: &PcmAudio) -> Result<Vec<u8>> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: pcm.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut cursor = Cursor::new(Vec::new());
    let mut writer = hound::WavWriter::new(&mut cursor, spec)
        .map_err(|e| SynthError::Encode(format!("wav header: {e}")))?;

    for &sample in &pcm.samples {
        #[allow(clippy::cast_possible_truncation)]
        let quantized = (sample.clamp(-1.0, 1.0) * f32::from(i16::MAX)) as i16;
        writer
            .write_sample(quantized)
            .map_err(|e| SynthError::Encode(format!("wav sample: {e}")))?;
    }

    writer
        .finalize()
        .map_err(|e| SynthError::Encode(format!("wav finalize: {e}")))?;

    Ok(cursor.into_inner())
}

/// MP3 transcoder backed by the host's ffmpeg binary
pub struct FfmpegTranscoder {
    _private: (),
}

impl FfmpegTranscoder {
    /// Probe for a usable ffmpeg once at startup
    ///
    /// Returns `None` when the binary is missing; the pipeline then
    /// serves WAV instead of MP3.
    pub async fn detect() -> Option<Self> {
        let probe = tokio::process::Command::new("ffmpeg")
            .arg("-version")
            .stdout(std::process::Stdio::null())
            .stderr(std::process::Stdio::null())
            .status()
            .await;

        match probe {
            Ok(status) if status.success() => {
                tracing::info!("ffmpeg detected, audio will be transcoded to mp3");
                Some(Self { _private: () })
            }
            _ => {
                tracing::warn!("ffmpeg not found, audio will be served as wav");
                None
            }
        }
    }

    /// Transcode a WAV byte buffer to 128k MP3
    pub async fn to_mp3(&self, wav: &[u8]) -> Result<Vec<u8>> {
        let dir = tempfile::tempdir().map_err(|e| SynthError::Encode(format!("tempdir: {e}")))?;
        let wav_path = dir.path().join("in.wav");
        let mp3_path = dir.path().join("out.mp3");

        tokio::fs::write(&wav_path, wav)
            .await
            .map_err(|e| SynthError::Encode(format!("write wav: {e}")))?;

        let output = tokio::process::Command::new("ffmpeg")
            .arg("-i")
            .arg(&wav_path)
            .args(["-acodec", "mp3", "-ab", "128k", "-y"])
            .arg(&mp3_path)
            .output()
            .await
            .map_err(|e| SynthError::Encode(format!("spawn ffmpeg: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SynthError::Encode(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        tokio::fs::read(&mp3_path)
            .await
            .map_err(|e| SynthError::Encode(format!("read mp3: {e}")))
    }
}
