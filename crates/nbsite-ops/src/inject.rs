use std::fs;
use std::path::Path;

use nbsite_config::InjectSettings;
use nbsite_utils::atomic_write;

use crate::OperationError;

/// Outcome of a marker-relative insertion. Callers must handle
/// [`Insertion::AnchorMissing`] explicitly; there is no silent fallback.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Insertion {
    /// New contents with the snippet inserted after the anchor's end.
    Done(String),
    /// The anchor substring does not occur in the contents.
    AnchorMissing,
}

/// Insert `snippet` immediately after the first occurrence of `anchor`.
/// The match is exact, case- and whitespace-sensitive. No duplicate
/// detection is performed: inserting twice yields two snippets.
pub fn insert_after(contents: &str, anchor: &str, snippet: &str) -> Insertion {
    match contents.find(anchor) {
        Some(start) => {
            let end = start + anchor.len();
            let mut updated = String::with_capacity(contents.len() + snippet.len());
            updated.push_str(&contents[..end]);
            updated.push_str(snippet);
            updated.push_str(&contents[end..]);
            Insertion::Done(updated)
        }
        None => Insertion::AnchorMissing,
    }
}

/// Status of one header injection, surfaced in the pipeline outcome.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum InjectStatus {
    Injected,
    AnchorMissing,
}

/// Rewrite the page at `path` with the stylesheet snippet inserted after
/// the header anchor. A page without the anchor is left untouched and
/// reported as [`InjectStatus::AnchorMissing`].
pub fn inject_header(path: &Path, settings: &InjectSettings) -> Result<InjectStatus, OperationError> {
    let contents = fs::read_to_string(path).map_err(|source| OperationError::Io {
        path: path.into(),
        source,
    })?;

    match insert_after(&contents, &settings.anchor, &settings.snippet) {
        Insertion::Done(updated) => {
            atomic_write(path, &updated).map_err(|source| OperationError::Io {
                path: path.into(),
                source,
            })?;
            Ok(InjectStatus::Injected)
        }
        Insertion::AnchorMissing => Ok(InjectStatus::AnchorMissing),
    }
}
