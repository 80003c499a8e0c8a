//! Measurement file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{IngestError, Result};

fn has_csv_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// CSV files directly inside `dir`, sorted by file name.
///
/// Subdirectories are not searched, so the `output/` directory of an
/// earlier run is never picked up as input.
pub fn list_data_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let read_error = |source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    };
    let mut files = fs::read_dir(dir)
        .map_err(read_error)?
        .map(|entry| entry.map(|e| e.path()).map_err(read_error))
        .filter(|path| {
            path.as_ref()
                .map_or(true, |p| p.is_file() && has_csv_extension(p))
        })
        .collect::<Result<Vec<_>>>()?;
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    debug!(dir = %dir.display(), file_count = files.len(), "discovered data files");
    Ok(files)
}
