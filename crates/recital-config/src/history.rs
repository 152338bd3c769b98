use serde::Deserialize;

/// Conversion history configuration
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HistoryConfig {
    /// Upper bound applied to the `limit` query parameter of history listings
    #[serde(default = "default_page_limit_max")]
    pub page_limit_max: usize,
    /// Records older than this many days are removed by the maintenance
    /// sweep. 0 disables the sweep.
    #[serde(default = "default_max_age_days")]
    pub max_age_days: u64,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            page_limit_max: default_page_limit_max(),
            max_age_days: default_max_age_days(),
        }
    }
}

fn default_page_limit_max() -> usize {
    100
}

fn default_max_age_days() -> u64 {
    30
}
