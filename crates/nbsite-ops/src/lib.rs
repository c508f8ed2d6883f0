//! Pipeline operations for nbsite: notebook conversion, stylesheet header
//! injection, and table-of-contents rebuilding over one articles directory.

use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use nbsite_config::{Config, PatternList};

use thiserror::Error;

mod convert;
pub mod inject;
pub mod listing;
pub mod toc;

pub use inject::{inject_header, insert_after, InjectStatus, Insertion};
pub use toc::{LinkEntry, TocStatus};

/// Extension of notebook sources consumed by the converter.
pub const SOURCE_EXTENSION: &str = "ipynb";
/// Extension of generated pages produced by the converter.
pub const PAGE_EXTENSION: &str = "html";

/// Fatal failures a pipeline run can abort with. Missing anchors are not
/// errors; they surface as data in [`PipelineOutcome`].
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("converter `{program}` failed ({status}): {stderr}")]
    Converter {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
    #[error("failed to launch converter `{program}`: {source}")]
    ConverterSpawn { program: String, source: io::Error },
    #[error("I/O error on {}: {}", path.display(), source)]
    Io { path: PathBuf, source: io::Error },
}

/// Everything a pipeline run produced, for the CLI layer to render.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// Notebook sources converted, in listing order.
    pub converted: Vec<PathBuf>,
    /// Generated pages threaded through injection and the TOC rebuild.
    pub pages: Vec<PathBuf>,
    /// Pages rewritten with the stylesheet snippet.
    pub injected: usize,
    /// Pages whose header anchor was absent, left byte-for-byte unchanged.
    pub header_anchor_missing: Vec<PathBuf>,
    pub toc: TocStatus,
}

/// Operation bundle composing the pipeline steps over one configuration.
pub struct Operations {
    config: Config,
}

impl Operations {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the full pipeline: convert every notebook, inject the stylesheet
    /// header into every page, rebuild the index table of contents. Steps
    /// run strictly in sequence; the page list is computed once after
    /// conversion and passed to the later stages instead of re-listing the
    /// directory per step.
    pub fn publish(&self) -> Result<PipelineOutcome, OperationError> {
        let articles = self.config.articles_path();

        let converted = convert::convert_directory(&self.config)?;

        let no_exclude = PatternList::default();
        let pages = listing::files_with_extension(&articles, PAGE_EXTENSION, &no_exclude)?;

        let mut injected = 0;
        let mut header_anchor_missing = Vec::new();
        for page in &pages {
            match inject::inject_header(page, &self.config.inject)? {
                InjectStatus::Injected => injected += 1,
                InjectStatus::AnchorMissing => header_anchor_missing.push(page.clone()),
            }
        }

        let toc = toc::rebuild(
            &self.config.index_path(),
            &pages,
            &self.config.site.base_url,
            &self.config.site.articles_dir,
            &self.config.toc.anchor,
        )?;

        Ok(PipelineOutcome {
            converted,
            pages,
            injected,
            header_anchor_missing,
            toc,
        })
    }
}
