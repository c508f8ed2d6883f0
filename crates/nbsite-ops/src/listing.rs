use std::path::{Path, PathBuf};

use nbsite_config::PatternList;
use walkdir::WalkDir;

use crate::OperationError;

/// Enumerate files directly inside `dir` (non-recursive) carrying the given
/// extension, skipping names matched by `exclude`. Entries are sorted by
/// file name so every run converts and links pages in the same order.
pub fn files_with_extension(
    dir: &Path,
    extension: &str,
    exclude: &PatternList,
) -> Result<Vec<PathBuf>, OperationError> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| dir.to_path_buf());
            OperationError::Io {
                path,
                source: err.into(),
            }
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        if entry.path().extension().and_then(|ext| ext.to_str()) != Some(extension) {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if exclude.matches(&name) {
            continue;
        }

        files.push(entry.into_path());
    }

    Ok(files)
}
