//! Configuration primitives and loader for nbsite.
//!
//! Configuration resolves from built-in defaults, then an optional
//! `.nbsite.toml` in the working directory, then an explicit override path
//! supplied by the CLI. Parsed settings are normalised into typed structures
//! so the pipeline never touches raw TOML.

use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};
use serde::Deserialize;
use thiserror::Error;

const CONFIG_FILE_NAME: &str = ".nbsite.toml";

pub const DEFAULT_ARTICLES_DIR: &str = "articles";
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_INDEX_FILE: &str = "index.html";
pub const DEFAULT_CONVERTER_PROGRAM: &str = "jupyter";
pub const DEFAULT_THEME: &str = "dark";
pub const DEFAULT_HEADER_ANCHOR: &str = "<meta charset=\"utf-8\"/>";
pub const DEFAULT_SNIPPET: &str = "<link rel=\"stylesheet\" href=\"custom.css\">";
pub const DEFAULT_TOC_ANCHOR: &str = "<ul id=\"table-of-contents\">";

/// Complete configuration resolved from defaults and on-disk overrides.
#[derive(Clone, Debug)]
pub struct Config {
    pub site: SiteSettings,
    pub converter: ConverterSettings,
    pub inject: InjectSettings,
    pub toc: TocSettings,
    /// Directory every relative path in the configuration resolves against.
    pub working_dir: PathBuf,
}

/// Site layout settings: where sources live and how links are built.
#[derive(Clone, Debug)]
pub struct SiteSettings {
    pub articles_dir: PathBuf,
    pub base_url: String,
    pub index_file: PathBuf,
    pub exclude: PatternList,
}

/// External converter invocation settings.
#[derive(Clone, Debug)]
pub struct ConverterSettings {
    pub program: String,
    pub theme: String,
}

/// Settings for the stylesheet header injection step.
#[derive(Clone, Debug)]
pub struct InjectSettings {
    pub anchor: String,
    pub snippet: String,
}

/// Settings governing table-of-contents anchor detection.
#[derive(Clone, Debug)]
pub struct TocSettings {
    pub anchor: String,
}

impl Config {
    /// Resolve the articles directory against the working directory.
    pub fn articles_path(&self) -> PathBuf {
        make_absolute(&self.site.articles_dir, &self.working_dir)
    }

    /// Resolve the index document against the working directory.
    pub fn index_path(&self) -> PathBuf {
        make_absolute(&self.site.index_file, &self.working_dir)
    }
}

/// Glob pattern plus compiled matcher.
#[derive(Clone, Debug)]
pub struct Pattern {
    original: String,
    matcher: GlobMatcher,
}

impl Pattern {
    fn new(value: String) -> Result<Self, ConfigValidationError> {
        match Glob::new(&value) {
            Ok(glob) => Ok(Pattern {
                matcher: glob.compile_matcher(),
                original: value,
            }),
            Err(err) => Err(ConfigValidationError::new(format!(
                "invalid glob pattern '{value}': {err}"
            ))),
        }
    }

    pub fn original(&self) -> &str {
        &self.original
    }
}

/// Ordered list of glob patterns matched against bare file names.
#[derive(Clone, Debug, Default)]
pub struct PatternList {
    patterns: Vec<Pattern>,
}

impl PatternList {
    fn new(patterns: Vec<Pattern>) -> Self {
        PatternList { patterns }
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn matches(&self, file_name: &str) -> bool {
        self.patterns
            .iter()
            .any(|pattern| pattern.matcher.is_match(Path::new(file_name)))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pattern> {
        self.patterns.iter()
    }
}

/// Loader options, typically supplied by the CLI layer.
#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub override_path: Option<PathBuf>,
    pub working_dir: Option<PathBuf>,
}

impl LoadOptions {
    pub fn with_override_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.override_path = Some(path.into());
        self
    }

    pub fn with_working_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(path.into());
        self
    }
}

/// Errors surfaced while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to resolve working directory {attempted}: {source}")]
    WorkingDirectory {
        attempted: PathBuf,
        source: io::Error,
    },
    #[error("override config {path} not found")]
    OverrideNotFound { path: PathBuf },
    #[error("failed to read config {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("configuration validation failed:\n{0}")]
    Validation(ConfigValidationErrors),
}

impl Config {
    /// Loads configuration using the precedence rules and returns typed settings.
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let working_dir = resolve_working_dir(options.working_dir)?;
        let override_path = options
            .override_path
            .map(|path| make_absolute(&path, &working_dir));

        if let Some(path) = &override_path {
            if !path.exists() {
                return Err(ConfigError::OverrideNotFound { path: path.clone() });
            }
        }

        let config_path = match override_path {
            Some(path) => Some(path),
            None => {
                let local = working_dir.join(CONFIG_FILE_NAME);
                local.exists().then_some(local)
            }
        };

        let raw = match &config_path {
            Some(path) => load_raw(path)?,
            None => RawConfig::default(),
        };

        raw.finalize(working_dir).map_err(ConfigError::Validation)
    }
}

fn resolve_working_dir(override_dir: Option<PathBuf>) -> Result<PathBuf, ConfigError> {
    match override_dir {
        Some(path) => fs::canonicalize(&path).map_err(|source| ConfigError::WorkingDirectory {
            attempted: path,
            source,
        }),
        None => env::current_dir().map_err(|source| ConfigError::WorkingDirectory {
            attempted: PathBuf::from("."),
            source,
        }),
    }
}

fn make_absolute(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn load_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.into(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.into(),
        source,
    })
}

/// Container for validation failures, formatted as a bullet list.
#[derive(Debug)]
pub struct ConfigValidationErrors(pub Vec<ConfigValidationError>);

impl fmt::Display for ConfigValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, err) in self.0.iter().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            write!(f, "- {err}")?;
        }
        Ok(())
    }
}

impl ConfigValidationErrors {
    pub fn iter(&self) -> impl Iterator<Item = &ConfigValidationError> {
        self.0.iter()
    }
}

/// Individual validation failure with optional setting context.
#[derive(Clone, Debug)]
pub struct ConfigValidationError {
    pub message: String,
    pub context: Option<String>,
}

impl ConfigValidationError {
    fn new(message: String) -> Self {
        ConfigValidationError {
            message,
            context: None,
        }
    }

    fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(context) = &self.context {
            write!(f, "{}: {}", context, self.message)
        } else {
            write!(f, "{}", self.message)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    #[serde(default)]
    site: Option<RawSite>,
    #[serde(default)]
    converter: Option<RawConverter>,
    #[serde(default)]
    inject: Option<RawInject>,
    #[serde(default)]
    toc: Option<RawToc>,
}

#[derive(Debug, Default, Deserialize)]
struct RawSite {
    #[serde(default)]
    articles_dir: Option<PathBuf>,
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default)]
    index_file: Option<PathBuf>,
    #[serde(default)]
    exclude: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawConverter {
    #[serde(default)]
    program: Option<String>,
    #[serde(default)]
    theme: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawInject {
    #[serde(default)]
    anchor: Option<String>,
    #[serde(default)]
    snippet: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawToc {
    #[serde(default)]
    anchor: Option<String>,
}

impl RawConfig {
    fn finalize(self, working_dir: PathBuf) -> Result<Config, ConfigValidationErrors> {
        let mut errors = Vec::new();

        let site = self.site.unwrap_or_default();

        let articles_dir = site
            .articles_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARTICLES_DIR));
        let base_url = site.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let index_file = site
            .index_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INDEX_FILE));

        if articles_dir.as_os_str().is_empty() {
            errors.push(
                ConfigValidationError::new("articles directory cannot be empty".into())
                    .with_context("site.articles_dir"),
            );
        }
        if index_file.as_os_str().is_empty() {
            errors.push(
                ConfigValidationError::new("index file cannot be empty".into())
                    .with_context("site.index_file"),
            );
        }

        let mut exclude = Vec::new();
        for value in site.exclude.unwrap_or_default() {
            match Pattern::new(value) {
                Ok(pattern) => exclude.push(pattern),
                Err(err) => errors.push(err.with_context("site.exclude")),
            }
        }

        let converter = self.converter.unwrap_or_default();
        let program = converter
            .program
            .unwrap_or_else(|| DEFAULT_CONVERTER_PROGRAM.into());
        let theme = converter.theme.unwrap_or_else(|| DEFAULT_THEME.into());

        if program.trim().is_empty() {
            errors.push(
                ConfigValidationError::new("converter program cannot be empty".into())
                    .with_context("converter.program"),
            );
        }

        let inject = self.inject.unwrap_or_default();
        let header_anchor = inject
            .anchor
            .unwrap_or_else(|| DEFAULT_HEADER_ANCHOR.into());
        let snippet = inject.snippet.unwrap_or_else(|| DEFAULT_SNIPPET.into());

        if header_anchor.trim().is_empty() {
            errors.push(
                ConfigValidationError::new("header anchor cannot be empty".into())
                    .with_context("inject.anchor"),
            );
        }

        let toc = self.toc.unwrap_or_default();
        let toc_anchor = toc.anchor.unwrap_or_else(|| DEFAULT_TOC_ANCHOR.into());

        if toc_anchor.trim().is_empty() {
            errors.push(
                ConfigValidationError::new("table-of-contents anchor cannot be empty".into())
                    .with_context("toc.anchor"),
            );
        }

        if !errors.is_empty() {
            return Err(ConfigValidationErrors(errors));
        }

        Ok(Config {
            site: SiteSettings {
                articles_dir,
                base_url,
                index_file,
                exclude: PatternList::new(exclude),
            },
            converter: ConverterSettings { program, theme },
            inject: InjectSettings {
                anchor: header_anchor,
                snippet,
            },
            toc: TocSettings { anchor: toc_anchor },
            working_dir,
        })
    }
}
