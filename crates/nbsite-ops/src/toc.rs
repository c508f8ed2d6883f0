use std::fs;
use std::path::{Component, Path, PathBuf};

use nbsite_utils::atomic_write;

use crate::inject::{insert_after, Insertion};
use crate::{OperationError, PAGE_EXTENSION};

/// Any line containing this substring is treated as a stale entry and
/// dropped before regeneration. The filter is textual, not structural.
const STALE_ENTRY_MARKER: &str = "<li>";

/// One table-of-contents row: target URL plus display name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LinkEntry {
    pub url: String,
    pub name: String,
}

/// Result of a table-of-contents rebuild.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TocStatus {
    Rebuilt { entries: usize },
    /// Stale entries were stripped, but the anchor was absent so no new
    /// entries were inserted.
    AnchorMissing,
}

/// Compute one link entry per page: URL joined from the base URL, the
/// articles directory, and the file name, always with forward slashes;
/// display name is the file name minus its trailing extension.
pub fn link_entries(pages: &[PathBuf], base_url: &str, articles_dir: &Path) -> Vec<LinkEntry> {
    let suffix = format!(".{PAGE_EXTENSION}");
    let mut entries = Vec::with_capacity(pages.len());

    for page in pages {
        let Some(file_name) = page.file_name() else {
            continue;
        };
        let file_name = file_name.to_string_lossy();
        let name = file_name
            .strip_suffix(&suffix)
            .unwrap_or(&file_name)
            .to_string();
        entries.push(LinkEntry {
            url: join_url(base_url, articles_dir, &file_name),
            name,
        });
    }

    entries
}

/// Render the combined markup block: one list item per entry, each wrapped
/// in newlines so the block slots in directly after the anchor.
pub fn render_entries(entries: &[LinkEntry]) -> String {
    let mut block = String::new();
    for entry in entries {
        block.push_str(&format!(
            "\n<li><a href=\"{}\">{}</a></li>\n",
            entry.url, entry.name
        ));
    }
    block
}

/// Rebuild the index document in place: strip every stale `<li>` line,
/// regenerate entries for `pages`, insert them after the anchor, and
/// atomically overwrite the file. When the anchor is absent the stripped
/// text is still written and the caller is told via the returned status.
pub fn rebuild(
    index: &Path,
    pages: &[PathBuf],
    base_url: &str,
    articles_dir: &Path,
    anchor: &str,
) -> Result<TocStatus, OperationError> {
    let contents = fs::read_to_string(index).map_err(|source| OperationError::Io {
        path: index.into(),
        source,
    })?;

    let stripped = strip_stale_entries(&contents);
    let entries = link_entries(pages, base_url, articles_dir);
    let block = render_entries(&entries);

    let (updated, status) = match insert_after(&stripped, anchor, &block) {
        Insertion::Done(updated) => (
            updated,
            TocStatus::Rebuilt {
                entries: entries.len(),
            },
        ),
        Insertion::AnchorMissing => (stripped, TocStatus::AnchorMissing),
    };

    atomic_write(index, &updated).map_err(|source| OperationError::Io {
        path: index.into(),
        source,
    })?;

    Ok(status)
}

/// Drop every line containing the stale-entry marker, preserving the rest
/// of the file byte-for-byte, line endings included.
fn strip_stale_entries(contents: &str) -> String {
    contents
        .split_inclusive('\n')
        .filter(|line| !line.contains(STALE_ENTRY_MARKER))
        .collect()
}

fn join_url(base: &str, dir: &Path, file_name: &str) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    for component in dir.components() {
        match component {
            Component::CurDir => {}
            other => {
                url.push('/');
                url.push_str(&other.as_os_str().to_string_lossy());
            }
        }
    }
    url.push('/');
    url.push_str(file_name);
    url
}
