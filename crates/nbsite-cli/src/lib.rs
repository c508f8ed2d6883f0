use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use nbsite_config::{Config, LoadOptions};
use nbsite_ops::{Operations, PipelineOutcome, TocStatus};

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();

    let mut options = LoadOptions::default();
    if let Some(path) = cli.config {
        options = options.with_override_path(path);
    }

    let mut config = Config::load(options)?;
    if let Some(base) = cli.base {
        config.site.base_url = base;
    }

    let ops = Operations::new(config);
    let outcome = ops.publish()?;

    report_warnings(&outcome, ops.config().index_path());
    if !cli.quiet {
        report_summary(&outcome);
    }

    Ok(0)
}

fn report_warnings(outcome: &PipelineOutcome, index_path: PathBuf) {
    for page in &outcome.header_anchor_missing {
        eprintln!(
            "warning: header anchor not found in {}, page left unstyled",
            page.display()
        );
    }
    if outcome.toc == TocStatus::AnchorMissing {
        eprintln!(
            "warning: table-of-contents anchor not found in {}, no entries inserted",
            index_path.display()
        );
    }
}

fn report_summary(outcome: &PipelineOutcome) {
    println!("converted {} notebook(s)", outcome.converted.len());
    println!("injected stylesheet into {} page(s)", outcome.injected);
    if let TocStatus::Rebuilt { entries } = outcome.toc {
        println!("index rebuilt with {} entr{}", entries, plural_y(entries));
    }
}

fn plural_y(count: usize) -> &'static str {
    if count == 1 {
        "y"
    } else {
        "ies"
    }
}

#[derive(Parser)]
#[command(author, version, about = "Publish a directory of notebooks as a static site")]
struct Cli {
    /// Base URL prefix for table-of-contents links (overrides site.base_url)
    #[arg(value_name = "BASE")]
    base: Option<String>,
    /// Use an alternate configuration file instead of `.nbsite.toml`
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Suppress the success summary (warnings are still printed)
    #[arg(long)]
    quiet: bool,
}
