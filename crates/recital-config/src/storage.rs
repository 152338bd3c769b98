use std::path::{Path, PathBuf};

use serde::Deserialize;

/// On-disk layout for audio files, voice models, and the history database
///
/// Everything lives under `root`; the subdirectory names are fixed so a
/// deployment only ever has to mount one volume.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Root storage directory
    #[serde(default = "default_root")]
    pub root: PathBuf,
    /// Audio files older than this many days are removed by the
    /// maintenance sweep. 0 disables the sweep.
    #[serde(default = "default_audio_max_age_days")]
    pub audio_max_age_days: u64,
}

impl StorageConfig {
    /// Directory holding generated audio files, one per completed job
    pub fn audio_dir(&self) -> PathBuf {
        self.root.join("audio")
    }

    /// Directory holding downloaded voice model artifacts
    pub fn models_dir(&self) -> PathBuf {
        self.root.join("models")
    }

    /// Path of the history database file
    pub fn history_db_path(&self) -> PathBuf {
        self.root.join("history.redb")
    }

    /// Create the storage directory tree if it does not exist yet
    pub fn ensure_layout(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(self.audio_dir())?;
        std::fs::create_dir_all(self.models_dir())?;
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            audio_max_age_days: default_audio_max_age_days(),
        }
    }
}

fn default_root() -> PathBuf {
    Path::new("storage").to_path_buf()
}

fn default_audio_max_age_days() -> u64 {
    7
}
