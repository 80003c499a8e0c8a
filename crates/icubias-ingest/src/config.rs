//! Loading the analysis configuration from disk.

use std::path::Path;

use tracing::debug;

use icubias_model::{AnalysisConfig, ConfigError};

/// Reads and validates a TOML configuration file.
///
/// Missing fields keep their defaults. Validation runs before the
/// configuration is returned, so a run never starts with an expected-period
/// gap.
pub fn load_config(path: &Path) -> Result<AnalysisConfig, ConfigError> {
    let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = AnalysisConfig::from_toml_str(&source).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    config.validate()?;
    debug!(config_path = %path.display(), "loaded analysis config");
    Ok(config)
}
