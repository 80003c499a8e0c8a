//! Per-patient monitoring analysis.
//!
//! - **gaps**: inter-measurement gaps and missed-measurement counts
//! - **interval**: gap and raw-value statistics under stable key names
//! - **exposure**: exposure windows tracked from indicator streams
//! - **conditioned**: statistics split by exposure state
//! - **patient**: the full summary row of one patient
//! - **table**: merge of rows across files and DataFrame export
//! - **pipeline**: parallel analysis of tables and files

pub mod conditioned;
pub mod descriptive;
pub mod error;
pub mod exposure;
pub mod gaps;
pub mod interval;
pub mod patient;
pub mod pipeline;
pub mod table;

pub use conditioned::{Partition, partition_and_summarize, partition_by_exposure};
pub use descriptive::{ValueSummary, describe, nearest_rank_quantile};
pub use error::{AnalysisError, Result};
pub use exposure::{ExposureOptions, track_exposure, track_patient_exposure};
pub use gaps::{GapReport, detect_gaps, missed_in_gap};
pub use interval::{summarize_gaps, summarize_values};
pub use patient::analyze_patient;
pub use pipeline::{
    FileReport, RunOutcome, TableAnalysis, analyze_file, analyze_files, analyze_patients,
    analyze_table,
};
pub use table::{PATIENT_ID_COLUMN, SummaryTable};
