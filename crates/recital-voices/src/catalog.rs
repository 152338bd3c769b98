//! Built-in voice catalog, generated from the Piper voices repository

use crate::types::{Gender, Quality, VoiceModel};

pub const DEFAULT_VOICE_ID: &str = "en_US-lessac-medium";

#[allow(clippy::too_many_arguments)]
fn voice(
    id: &str,
    language: &str,
    language_code: &str,
    language_name: &str,
    speaker: &str,
    quality: Quality,
    gender: Gender,
    description: &str,
) -> VoiceModel {
    VoiceModel {
        id: id.to_string(),
        language: language.to_string(),
        language_code: language_code.to_string(),
        language_name: language_name.to_string(),
        speaker: speaker.to_string(),
        quality,
        gender: Some(gender),
        description: Some(description.to_string()),
    }
}

/// All shipped voices, ordered by language, then speaker, then quality
#[rustfmt::skip]
pub fn builtin_voices() -> Vec<VoiceModel> {
    use Gender::{Female, Male};
    use Quality::{High, Medium};

    vec![
        // English (US)
        voice("en_US-amy-medium", "English (US)", "en_US", "English", "amy", Medium, Female,
            "Natural female American English voice"),
        voice("en_US-joe-medium", "English (US)", "en_US", "English", "joe", Medium, Male,
            "Clear male American English voice"),
        voice("en_US-lessac-medium", "English (US)", "en_US", "English", "lessac", Medium, Female,
            "High quality female American English voice"),
        voice("en_US-lessac-high", "English (US)", "en_US", "English", "lessac", High, Female,
            "Very high quality female American English voice"),
        voice("en_US-ryan-medium", "English (US)", "en_US", "English", "ryan", Medium, Male,
            "High quality male American English voice"),
        voice("en_US-ryan-high", "English (US)", "en_US", "English", "ryan", High, Male,
            "Very high quality male American English voice"),
        // English (UK)
        voice("en_GB-alan-medium", "English (UK)", "en_GB", "English", "alan", Medium, Male,
            "British male English voice"),
        voice("en_GB-cori-high", "English (UK)", "en_GB", "English", "cori", High, Female,
            "High quality British female voice"),
        // German
        voice("de_DE-thorsten-medium", "German", "de_DE", "Deutsch", "thorsten", Medium, Male,
            "German male voice"),
        voice("de_DE-thorsten-high", "German", "de_DE", "Deutsch", "thorsten", High, Male,
            "High quality German male voice"),
        // French
        voice("fr_FR-siwis-medium", "French", "fr_FR", "Français", "siwis", Medium, Female,
            "French female voice"),
        voice("fr_FR-tom-medium", "French", "fr_FR", "Français", "tom", Medium, Male,
            "French male voice"),
        // Spanish
        voice("es_ES-davefx-medium", "Spanish (Spain)", "es_ES", "Español", "davefx", Medium, Male,
            "Spanish male voice"),
        voice("es_MX-claude-high", "Spanish (Mexico)", "es_MX", "Español", "claude", High, Male,
            "Mexican Spanish male voice"),
        // Italian
        voice("it_IT-paola-medium", "Italian", "it_IT", "Italiano", "paola", Medium, Female,
            "Italian female voice"),
        // Portuguese
        voice("pt_BR-faber-medium", "Portuguese (Brazil)", "pt_BR", "Português", "faber", Medium, Male,
            "Brazilian Portuguese male voice"),
        // Russian
        voice("ru_RU-denis-medium", "Russian", "ru_RU", "Русский", "denis", Medium, Male,
            "Russian male voice"),
    ]
}
