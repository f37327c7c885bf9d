use adscope_core::{AppConfig, QualityTier};
use serde::Serialize;

/// Classifier thresholds, read once per classification call so runtime
/// reconfiguration is honored without restarting the process.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    /// Records running fewer days than this are dropped by the filter.
    pub min_days_running: i64,
    pub gold_score_threshold: u32,
    pub silver_score_threshold: u32,
    /// Country code assigned when a run spans multiple countries.
    pub default_country_code: String,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            min_days_running: 4,
            gold_score_threshold: 80,
            silver_score_threshold: 60,
            default_country_code: "US".to_owned(),
        }
    }
}

impl ClassifierConfig {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            min_days_running: config.min_days_running,
            gold_score_threshold: config.gold_score_threshold,
            silver_score_threshold: config.silver_score_threshold,
            default_country_code: config.default_country_code.clone(),
        }
    }
}

/// Outcome of scoring one record. Derived and non-persistent: only the
/// score and tier survive onto the normalized entity.
#[derive(Debug, Clone)]
pub struct QualityAssessment {
    /// Additive score; unbounded accumulator, practically 0–~120.
    pub score: u32,
    pub tier: QualityTier,
    /// Human-readable factors that contributed to the score.
    pub reasons: Vec<String>,
}

/// Parameters for one orchestrated collection run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub search_terms: Option<String>,
    /// Country list; `None` uses the broad sweep preset.
    pub countries: Option<Vec<String>>,
    pub max_pages: u32,
    pub page_size: u32,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            search_terms: None,
            countries: None,
            max_pages: 3,
            page_size: 100,
        }
    }
}

/// Aggregated statistics for one collection run, returned to the caller.
/// Never persisted; the trigger API serializes it as the response body.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunResult {
    pub success: bool,
    pub ads_found: usize,
    pub ads_processed: usize,
    pub ads_saved: usize,
    pub errors: Vec<String>,
}
