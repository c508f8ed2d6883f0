use std::path::{Path, PathBuf};
use std::process::Command;

use nbsite_config::Config;

use crate::listing::files_with_extension;
use crate::{OperationError, SOURCE_EXTENSION};

/// Convert every notebook in the articles directory to a sibling HTML page.
/// Returns the sources converted, in listing order. The first converter
/// failure aborts the remaining conversions.
pub(crate) fn convert_directory(config: &Config) -> Result<Vec<PathBuf>, OperationError> {
    let dir = config.articles_path();
    let sources = files_with_extension(&dir, SOURCE_EXTENSION, &config.site.exclude)?;

    for source in &sources {
        run_converter(config, source)?;
    }

    Ok(sources)
}

/// Invoke the converter for one notebook. The file path is passed as a
/// discrete argument vector entry; no shell is involved.
fn run_converter(config: &Config, source: &Path) -> Result<(), OperationError> {
    let program = &config.converter.program;

    let output = Command::new(program)
        .arg("nbconvert")
        .arg("--to")
        .arg("html")
        .arg(source)
        .arg(format!("--HTMLExporter.theme={}", config.converter.theme))
        .output()
        .map_err(|source| OperationError::ConverterSpawn {
            program: program.clone(),
            source,
        })?;

    if !output.status.success() {
        return Err(OperationError::Converter {
            program: program.clone(),
            status: output.status,
            stderr: stderr_excerpt(&output.stderr),
        });
    }

    Ok(())
}

/// Keep diagnostics readable: only the last few stderr lines make it into
/// the error message.
fn stderr_excerpt(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return "(no stderr)".into();
    }

    let lines: Vec<&str> = trimmed.lines().collect();
    let tail = lines.len().saturating_sub(5);
    lines[tail..].join("\n")
}
