//! Configuration types for javalint.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration, usually read from `javalint.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Extraction strategy configuration.
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Report output configuration.
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or has unknown keys.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default)]
    pub respect_gitignore: bool,

    /// Rule file, relative to the root.
    #[serde(default = "default_rules_file")]
    pub rules_file: PathBuf,

    /// Abort the run when a source file cannot be read.
    #[serde(default)]
    pub fail_on_read_error: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: Vec::new(),
            respect_gitignore: false,
            rules_file: default_rules_file(),
            fail_on_read_error: false,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_rules_file() -> PathBuf {
    PathBuf::from("rules").join("rules.json")
}

fn default_true() -> bool {
    true
}

/// Declaration extraction strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Regex-based scanning of comment-stripped text.
    #[default]
    Heuristic,
    /// In-process Tree-sitter parse.
    TreeSitter,
    /// External parser process.
    Subprocess,
}

impl Strategy {
    /// Returns true for strategies backed by a declaration tree.
    #[must_use]
    pub fn is_structural(self) -> bool {
        !matches!(self, Self::Heuristic)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Heuristic => write!(f, "heuristic"),
            Self::TreeSitter => write!(f, "tree-sitter"),
            Self::Subprocess => write!(f, "subprocess"),
        }
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractorConfig {
    /// Strategy to run.
    #[serde(default)]
    pub strategy: Strategy,

    /// Program and arguments of the external parser; the root is appended.
    #[serde(default)]
    pub command: Vec<String>,

    /// Fall back to the heuristic strategy when a structural one fails.
    #[serde(default = "default_true")]
    pub fallback: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            command: Vec::new(),
            fallback: true,
        }
    }
}

/// Report output configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    /// Directory for report files; defaults to the analyzed root.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Whether report files are written at all.
    #[serde(default = "default_true")]
    pub write: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            write: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}
