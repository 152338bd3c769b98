//! Voice catalog and lookup
//!
//! The catalog is fixed at build time and loaded once at startup; after
//! that the registry is read-only. Requests either name a voice from the
//! catalog or fall back to the default.

mod catalog;
mod types;

use http::StatusCode;
use indexmap::IndexMap;
use recital_core::HttpError;
use thiserror::Error;

pub use types::{Gender, Quality, VoiceModel};

/// Requested voice id is not in the catalog
#[derive(Debug, Error)]
#[error("unknown voice '{0}'")]
pub struct UnknownVoice(pub String);

impl HttpError for UnknownVoice {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNPROCESSABLE_ENTITY
    }

    fn error_type(&self) -> &str {
        "validation_error"
    }
}

/// Read-only catalog of available voices
///
/// Ordered by language, then speaker, then quality; iteration order is
/// the order voices are presented to clients.
pub struct VoiceRegistry {
    voices: IndexMap<String, VoiceModel>,
    default_id: String,
}

impl VoiceRegistry {
    /// Build the registry from the built-in catalog
    ///
    /// # Panics
    ///
    /// Panics if the catalog does not contain the default voice; that is
    /// a programming error caught by tests, not a runtime condition.
    #[must_use]
    pub fn new() -> Self {
        let voices: IndexMap<String, VoiceModel> = catalog::builtin_voices()
            .into_iter()
            .map(|voice| (voice.id.clone(), voice))
            .collect();

        let default_id = catalog::DEFAULT_VOICE_ID.to_string();
        assert!(
            voices.contains_key(&default_id),
            "default voice must be in the catalog"
        );

        Self { voices, default_id }
    }

    /// All voices in catalog order
    pub fn iter(&self) -> impl Iterator<Item = &VoiceModel> {
        self.voices.values()
    }

    /// Number of voices in the catalog
    pub fn len(&self) -> usize {
        self.voices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.voices.is_empty()
    }

    /// The catalog's designated default voice
    pub fn default_voice(&self) -> &VoiceModel {
        &self.voices[&self.default_id]
    }

    /// Resolve a requested voice id to a catalog entry
    ///
    /// An absent or empty id resolves to the default voice.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownVoice`] when a non-empty id is not in the catalog
    pub fn resolve(&self, voice_id: Option<&str>) -> Result<&VoiceModel, UnknownVoice> {
        match voice_id {
            None => Ok(self.default_voice()),
            Some(id) if id.trim().is_empty() => Ok(self.default_voice()),
            Some(id) => self
                .voices
                .get(id)
                .ok_or_else(|| UnknownVoice(id.to_string())),
        }
    }
}

impl Default for VoiceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_voice_is_in_catalog() {
        let registry = VoiceRegistry::new();
        assert_eq!(registry.default_voice().id, "en_US-lessac-medium");
    }

    #[test]
    fn resolve_none_and_empty_yield_default() {
        let registry = VoiceRegistry::new();
        assert_eq!(registry.resolve(None).unwrap().id, "en_US-lessac-medium");
        assert_eq!(registry.resolve(Some("")).unwrap().id, "en_US-lessac-medium");
        assert_eq!(
            registry.resolve(Some("  ")).unwrap().id,
            "en_US-lessac-medium"
        );
    }

    #[test]
    fn resolve_known_voice() {
        let registry = VoiceRegistry::new();
        let voice = registry.resolve(Some("de_DE-thorsten-high")).unwrap();
        assert_eq!(voice.language_code, "de_DE");
        assert_eq!(voice.quality, Quality::High);
    }

    #[test]
    fn resolve_unknown_voice_errors() {
        let registry = VoiceRegistry::new();
        let err = registry.resolve(Some("does-not-exist")).unwrap_err();
        assert!(err.to_string().contains("does-not-exist"));
    }

    #[test]
    fn voice_ids_are_unique() {
        let registry = VoiceRegistry::new();
        assert_eq!(registry.len(), catalog::builtin_voices().len());
    }

    #[test]
    fn catalog_is_grouped_by_language() {
        let registry = VoiceRegistry::new();
        let codes: Vec<&str> = registry.iter().map(|v| v.language_code.as_str()).collect();

        // A language never reappears after another language started
        let mut seen: Vec<&str> = Vec::new();
        for code in codes {
            if seen.last() != Some(&code) {
                assert!(!seen.contains(&code), "language group split: {code}");
                seen.push(code);
            }
        }
    }

    #[test]
    fn artifact_paths_follow_repo_layout() {
        let registry = VoiceRegistry::new();
        let voice = registry.resolve(Some("en_US-lessac-medium")).unwrap();
        assert_eq!(
            voice.artifact_path(),
            "en/en_US/lessac/medium/en_US-lessac-medium"
        );
    }
}
