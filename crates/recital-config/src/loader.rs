use std::path::Path;

use crate::Config;

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Reads the file, expands `{{ env.VAR }}` placeholders, then
    /// deserializes and validates the result.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, environment variable
    /// expansion fails, TOML parsing fails, or validation fails
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read config file {}: {e}", path.display()))?;

        let expanded = crate::env::expand_env(&raw)
            .map_err(|e| anyhow::anyhow!("config variable expansion failed: {e}"))?;

        let config: Self =
            toml::from_str(&expanded).map_err(|e| anyhow::anyhow!("failed to parse config: {e}"))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate that the configuration is internally consistent
    ///
    /// # Errors
    ///
    /// Returns an error on zero timeouts, an empty model repository URL,
    /// or a zero page limit
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.synth.timeout_secs == 0 {
            anyhow::bail!("synth.timeout_secs must be greater than 0");
        }

        if self.synth.model_repo_url.trim().is_empty() {
            anyhow::bail!("synth.model_repo_url must not be empty");
        }

        if self.history.page_limit_max == 0 {
            anyhow::bail!("history.page_limit_max must be greater than 0");
        }

        Ok(())
    }
}
