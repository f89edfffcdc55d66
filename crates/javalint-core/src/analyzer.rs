//! Pipeline orchestration: discovery, extraction, evaluation, assembly.

use crate::config::Config;
use crate::context::ProjectContext;
use crate::engine::RuleEngine;
use crate::heuristic::HeuristicSource;
use crate::report::{Report, ReportAssembler, ReportError, ReportSink, TracingSink};
use crate::rules::{RuleError, RuleSet};
use crate::source::{DeclarationSource, ExtractError, SourceBox};
use crate::types::{DeclKind, FileError};

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving paths.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Directory traversal failed.
    #[error("Failed to walk source tree: {0}")]
    Walk(#[from] ignore::Error),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// The rule set could not be loaded.
    #[error(transparent)]
    Rules(#[from] RuleError),

    /// The declaration source failed.
    #[error(transparent)]
    Extract(#[from] ExtractError),

    /// A source file could not be read and read errors are fatal.
    #[error("Failed to read {}: {message}", path.display())]
    FileRead {
        /// Unreadable file.
        path: PathBuf,
        /// Error description.
        message: String,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Report files could not be written.
    #[error(transparent)]
    Report(#[from] ReportError),
}

impl From<FileError> for AnalyzerError {
    fn from(e: FileError) -> Self {
        Self::FileRead {
            path: e.path,
            message: e.message,
        }
    }
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    source: Option<SourceBox>,
    sink: Option<Box<dyn ReportSink>>,
    rules: Option<RuleSet>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the declaration source (default: heuristic).
    #[must_use]
    pub fn source<S: DeclarationSource + 'static>(mut self, source: S) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Sets a boxed declaration source.
    #[must_use]
    pub fn source_box(mut self, source: SourceBox) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the notice sink (default: [`TracingSink`]).
    #[must_use]
    pub fn sink<S: ReportSink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Uses `rules` instead of loading the rule file.
    #[must_use]
    pub fn rules(mut self, rules: RuleSet) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the working directory cannot be resolved or an
    /// exclude pattern is invalid.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };
        // Drop `.` components so reported paths stay clean
        let root: PathBuf = root.components().collect();

        // Merge exclude patterns from config
        let exclude = self
            .exclude_patterns
            .iter()
            .chain(&config.analyzer.exclude)
            .map(String::as_str)
            .map(glob::Pattern::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            source: self.source.unwrap_or_else(|| Box::new(HeuristicSource::new())),
            sink: self.sink.unwrap_or_else(|| Box::new(TracingSink)),
            rules: self.rules,
            exclude,
            config,
        })
    }
}

/// The main analyzer that runs the naming pipeline over a Java tree.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    source: SourceBox,
    sink: Box<dyn ReportSink>,
    rules: Option<RuleSet>,
    exclude: Vec<glob::Pattern>,
    config: Config,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Name of the declaration source in use.
    #[must_use]
    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Path of the rule file this analyzer loads.
    #[must_use]
    pub fn rules_path(&self) -> PathBuf {
        self.root.join(&self.config.analyzer.rules_file)
    }

    /// Directory report files are written to.
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.config
            .report
            .output_dir
            .as_ref()
            .map_or_else(|| self.root.clone(), |dir| self.root.join(dir))
    }

    /// Runs the pipeline and returns the assembled report.
    ///
    /// Nothing is written to disk; see [`Analyzer::write_report`].
    ///
    /// # Errors
    ///
    /// Returns an error if the rule set cannot be loaded, file discovery or
    /// extraction fails, or a file is unreadable while
    /// `fail_on_read_error` is set.
    pub fn analyze(&self) -> Result<Report, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let loaded;
        let rules = if let Some(rules) = &self.rules {
            rules
        } else {
            loaded = RuleSet::from_file(&self.rules_path())?;
            &loaded
        };
        debug!("Loaded {} rule(s)", rules.len());

        let files = self.discover_files()?;
        info!("Found {} Java file(s) to analyze", files.len());

        let ctx = ProjectContext::new(&self.root).with_source_files(files);
        let extraction = self.source.extract(&ctx)?;

        for error in &extraction.file_errors {
            if self.config.analyzer.fail_on_read_error {
                return Err(error.clone().into());
            }
            self.sink.warning(&format!("Skipping unreadable file {error}"));
        }

        let engine = RuleEngine::new(rules.clone());
        let evaluation = engine.evaluate(&extraction.declarations);
        let assembler = ReportAssembler::new(&ctx.source_files, engine.rules());

        let methods = engine
            .rules()
            .has_style_rules(DeclKind::Method)
            .then(|| assembler.style_violations(&evaluation, DeclKind::Method));
        let missing = extraction.missing_javadoc.as_ref();

        let report = Report {
            classes: assembler.style_violations(&evaluation, DeclKind::Class),
            variables: assembler.style_violations(&evaluation, DeclKind::Variable),
            methods,
            missing_javadoc_classes: missing
                .map(|m| assembler.javadoc_violations(m, DeclKind::Class)),
            missing_javadoc_methods: missing
                .map(|m| assembler.javadoc_violations(m, DeclKind::Method)),
            files_checked: extraction.files_read,
            file_errors: extraction.file_errors,
        };

        info!(
            "Analysis complete: {} violation(s) in {} file(s) using {}",
            report.violations().count(),
            report.files_checked,
            self.source.name()
        );

        Ok(report)
    }

    /// Writes `report` into the configured output directory.
    ///
    /// # Errors
    ///
    /// Returns an error if a report file cannot be written.
    pub fn write_report(&self, report: &Report) -> Result<Vec<PathBuf>, AnalyzerError> {
        let dir = self.output_dir();
        std::fs::create_dir_all(&dir)?;
        Ok(report.write_to(&dir, self.sink.as_ref())?)
    }

    /// Analyzes and, when enabled in the configuration, writes the reports.
    ///
    /// A failed analysis leaves existing report files untouched.
    ///
    /// # Errors
    ///
    /// Returns the first analysis or write error.
    pub fn run(&self) -> Result<Report, AnalyzerError> {
        let report = self.analyze()?;
        if self.config.report.write {
            self.write_report(&report)?;
        }
        Ok(report)
    }

    /// Discovers all Java source files in enumeration order.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let respect = self.config.analyzer.respect_gitignore;
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(respect)
            .git_global(respect)
            .git_exclude(respect)
            .ignore(respect)
            .parents(respect)
            .require_git(false)
            .sort_by_file_name(|a, b| a.cmp(b));

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            // Symlinked sources are kept; a dangling link fails at read time.
            if entry.file_type().is_none_or(|t| t.is_dir())
                || path.extension() != Some(OsStr::new("java"))
            {
                continue;
            }

            // Check exclude patterns
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Checks if a path matches an exclude pattern, either as an absolute
    /// path or relative to the root.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}
