use serde::Serialize;

/// Acoustic model quality tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    Low,
    Medium,
    High,
}

impl Quality {
    /// Path segment used by the model repository layout
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A single entry in the voice catalog
///
/// Immutable after registry load. The id doubles as the stable key for
/// model cache paths and job records.
#[derive(Debug, Clone, Serialize)]
pub struct VoiceModel {
    /// Stable unique id, e.g. `en_US-lessac-medium`
    pub id: String,
    /// Human-readable language label, e.g. `English (US)`
    pub language: String,
    /// BCP-47-style code, e.g. `en_US`
    pub language_code: String,
    /// Native language name, e.g. `Deutsch`
    pub language_name: String,
    /// Speaker name within the language
    pub speaker: String,
    pub quality: Quality,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<Gender>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl VoiceModel {
    /// Relative path of this voice's artifacts in the model repository
    ///
    /// The repository lays voices out as
    /// `<family>/<code>/<speaker>/<quality>/<id>` with `.onnx` and
    /// `.onnx.json` suffixes for the model and its config.
    pub fn artifact_path(&self) -> String {
        let family = self.language_code.split('_').next().unwrap_or("en");
        format!(
            "{family}/{}/{}/{}/{}",
            self.language_code,
            self.speaker,
            self.quality.as_str(),
            self.id
        )
    }
}
