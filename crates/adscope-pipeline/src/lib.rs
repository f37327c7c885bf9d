//! Collection pipeline for adscope.
//!
//! Turns raw ad-library records into stored [`adscope_core::NormalizedAd`]
//! entities: a deterministic quality classifier (filter, score, tier), a
//! normalizing transform, and an orchestrator that drives one end-to-end
//! collection run and aggregates its statistics.

pub mod classifier;
pub mod orchestrator;
pub mod transform;
pub mod types;

pub use classifier::{days_running, filter_records, score_record};
pub use orchestrator::run_collection;
pub use transform::transform_record;
pub use types::{ClassifierConfig, QualityAssessment, RunOptions, RunResult};
