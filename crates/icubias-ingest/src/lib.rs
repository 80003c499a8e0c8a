//! Measurement ingestion: file discovery, CSV loading, per-patient streams
//! and cohort attribute tables.

pub mod cohorts;
pub mod config;
pub mod discovery;
pub mod error;
pub mod reader;
pub mod streams;
pub mod timestamp;

pub use cohorts::{CohortTable, read_cohort_table};
pub use config::load_config;
pub use discovery::list_data_files;
pub use error::{IngestError, Result};
pub use reader::read_measurement_table;
pub use streams::{StreamBuild, StreamColumns, build_patient_streams};
pub use timestamp::parse_timestamp;
