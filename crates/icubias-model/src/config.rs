//! Analysis configuration.
//!
//! Every field has a default reproducing the HiRID monitoring study: heart
//! rate (`vm1`) and arterial pressure (`vm5`) are expected every two minutes,
//! lactate (`vm136`) every eight hours, and the vasopressor/inotrope
//! indicators `pm39`..`pm46` define exposure.

use std::collections::BTreeMap;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Static configuration of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Column holding the patient identifier.
    pub patient_column: String,
    /// Column holding the measurement timestamp.
    pub timestamp_column: String,
    /// Variable whose first and last observation define the stay extent.
    pub anchor_variable: Option<String>,
    /// Variables analysed for missed measurements. Each needs an expected period.
    pub missingness_variables: Vec<String>,
    /// Variables summarised over their raw values.
    pub monitored_variables: Vec<String>,
    /// Variables summarised separately inside and outside exposure windows.
    pub conditioned_variables: Vec<String>,
    /// Indicator variables whose positive values mark exposure.
    pub exposure_variables: Vec<String>,
    /// Close a window still open at stream end at the last exposure sample.
    ///
    /// Off by default: a window that never returns to zero is dropped.
    pub close_open_windows_at_stream_end: bool,
    /// Protocol maximum gap per variable, in seconds.
    pub expected_period_seconds: BTreeMap<String, i64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        let to_strings = |names: &[&str]| names.iter().map(|n| (*n).to_string()).collect();
        Self {
            patient_column: "patientid".to_string(),
            timestamp_column: "datetime".to_string(),
            anchor_variable: Some("vm1".to_string()),
            missingness_variables: to_strings(&["vm1", "vm5", "vm136"]),
            monitored_variables: to_strings(&["vm1", "vm5", "vm136", "vm146"]),
            conditioned_variables: to_strings(&["vm1", "vm5"]),
            exposure_variables: (39..=46).map(|i| format!("pm{i}")).collect(),
            close_open_windows_at_stream_end: false,
            expected_period_seconds: BTreeMap::from([
                ("vm1".to_string(), 120),
                ("vm5".to_string(), 120),
                ("vm136".to_string(), 8 * 3600),
            ]),
        }
    }
}

impl AnalysisConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Expected sampling period of a variable, if configured.
    pub fn expected_period(&self, variable: &str) -> Option<TimeDelta> {
        self.expected_period_seconds
            .get(variable)
            .map(|seconds| TimeDelta::seconds(*seconds))
    }

    /// Checks the configuration before any data is read.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for variable in &self.missingness_variables {
            match self.expected_period_seconds.get(variable) {
                None => {
                    return Err(ConfigError::MissingExpectedPeriod {
                        variable: variable.clone(),
                    });
                }
                Some(seconds) if *seconds <= 0 => {
                    return Err(ConfigError::NonPositivePeriod {
                        variable: variable.clone(),
                    });
                }
                Some(_) => {}
            }
        }
        if !self.conditioned_variables.is_empty() && self.exposure_variables.is_empty() {
            return Err(ConfigError::NoExposureVariables {
                variables: self.conditioned_variables.clone(),
            });
        }
        Ok(())
    }

    /// Every data column the analysis reads besides the id and timestamp.
    pub fn required_variables(&self) -> Vec<String> {
        let mut variables: Vec<String> = self
            .missingness_variables
            .iter()
            .chain(&self.monitored_variables)
            .chain(&self.conditioned_variables)
            .chain(&self.exposure_variables)
            .chain(self.anchor_variable.iter())
            .cloned()
            .collect();
        variables.sort();
        variables.dedup();
        variables
    }
}
