//! Data model for the ICU monitoring-bias analysis.
//!
//! - **observation**: per-patient, per-variable measurement streams
//! - **exposure**: exposure windows and their per-patient union
//! - **missed**: missed-measurement counts
//! - **summary**: per-patient statistic rows
//! - **resolution**: reconciliation of values that disagree across records
//! - **config**: analysis configuration and its validation

pub mod config;
pub mod error;
pub mod exposure;
pub mod ids;
pub mod missed;
pub mod observation;
pub mod resolution;
pub mod stay;
pub mod summary;

pub use config::AnalysisConfig;
pub use error::{ConfigError, ModelError, Result};
pub use exposure::{ExposureWindow, WindowSet};
pub use ids::PatientId;
pub use missed::MissedCount;
pub use observation::{Observation, ObservationStream, PatientStreams, Timestamp};
pub use resolution::{DEFAULT_ABSORBING_CATEGORIES, Resolution, resolve_category};
pub use stay::StayExtent;
pub use summary::{PatientSummary, StatRecord};
