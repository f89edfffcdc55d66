//! Core types shared by every pipeline stage.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Severity level for rule violations.
///
/// Serialized as written in `rules.json` (`Error`, `Warning`, `Info`);
/// lowercase and uppercase spellings are accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Informational message.
    #[serde(alias = "info", alias = "INFO")]
    Info,
    /// Warning that should be addressed.
    #[serde(alias = "warning", alias = "WARNING")]
    Warning,
    /// Error that must be fixed.
    #[serde(alias = "error", alias = "ERROR")]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown severity `{other}`, expected: error, warning, info"
            )),
        }
    }
}

/// Kind of a declared identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclKind {
    /// `class Foo`
    Class,
    /// `void foo()`
    Method,
    /// `int foo;`
    Variable,
}

impl DeclKind {
    /// JSON key carrying the identifier in report entries (e.g. `className`).
    #[must_use]
    pub fn name_key(self) -> &'static str {
        match self {
            Self::Class => "className",
            Self::Method => "methodName",
            Self::Variable => "variableName",
        }
    }
}

impl std::fmt::Display for DeclKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Class => write!(f, "class"),
            Self::Method => write!(f, "method"),
            Self::Variable => write!(f, "variable"),
        }
    }
}

/// A named class, method or variable recovered from source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// Kind of declaration.
    pub kind: DeclKind,
    /// Identifier name.
    pub name: String,
    /// File the declaration came from, when the extractor knows it.
    ///
    /// Only used for re-reading; locations are resolved across the whole tree.
    pub source: Option<PathBuf>,
}

impl Declaration {
    /// Creates a declaration.
    #[must_use]
    pub fn new(kind: DeclKind, name: impl Into<String>, source: Option<PathBuf>) -> Self {
        Self {
            kind,
            name: name.into(),
            source,
        }
    }

    /// Creates a class declaration.
    #[must_use]
    pub fn class(name: impl Into<String>, source: Option<PathBuf>) -> Self {
        Self::new(DeclKind::Class, name, source)
    }

    /// Creates a variable declaration.
    #[must_use]
    pub fn variable(name: impl Into<String>, source: Option<PathBuf>) -> Self {
        Self::new(DeclKind::Variable, name, source)
    }

    /// Creates a method declaration.
    #[must_use]
    pub fn method(name: impl Into<String>, source: Option<PathBuf>) -> Self {
        Self::new(DeclKind::Method, name, source)
    }
}

/// A 1-based row/column position in a source file.
///
/// `column` counts characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcePosition {
    /// Line number (1-indexed).
    pub row: usize,
    /// Character offset within the line (1-indexed).
    pub column: usize,
}

impl SourcePosition {
    /// Creates a position.
    #[must_use]
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// Byte offset of this position inside `text`, if it exists there.
    #[must_use]
    pub fn byte_offset(&self, text: &str) -> Option<usize> {
        if self.row == 0 || self.column == 0 {
            return None;
        }
        let mut line_start = 0;
        for (i, line) in text.split('\n').enumerate() {
            if i + 1 == self.row {
                return line
                    .char_indices()
                    .nth(self.column - 1)
                    .map(|(byte, _)| line_start + byte);
            }
            line_start += line.len() + 1;
        }
        None
    }
}

/// A file that could not be read during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileError {
    /// Path of the unreadable file.
    pub path: PathBuf,
    /// Error description.
    pub message: String,
}

impl FileError {
    /// Creates a file error from an IO error.
    #[must_use]
    pub fn new(path: &Path, err: &std::io::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_parses_any_case() {
        assert_eq!("Error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("warning".parse::<Severity>(), Ok(Severity::Warning));
        assert_eq!("INFO".parse::<Severity>(), Ok(Severity::Info));
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn severity_serializes_as_rule_files_spell_it() {
        let s: Severity = serde_json::from_str("\"warning\"").unwrap();
        assert_eq!(s, Severity::Warning);
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"Warning\"");
        let s: Severity = serde_json::from_str("\"Error\"").unwrap();
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"Error\"");
    }

    #[test]
    fn severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
        assert!(Severity::Warning > Severity::Info);
    }

    #[test]
    fn byte_offset_counts_characters() {
        let text = "int a;\nString é = x;\n";
        assert_eq!(SourcePosition::new(1, 1).byte_offset(text), Some(0));
        assert_eq!(SourcePosition::new(2, 1).byte_offset(text), Some(7));
        // 'é' is two bytes wide, so column 9 (' ') sits at byte 7 + 9
        assert_eq!(SourcePosition::new(2, 9).byte_offset(text), Some(16));
        assert_eq!(SourcePosition::new(9, 1).byte_offset(text), None);
    }

    #[test]
    fn name_keys() {
        assert_eq!(DeclKind::Class.name_key(), "className");
        assert_eq!(DeclKind::Variable.name_key(), "variableName");
        assert_eq!(DeclKind::Method.name_key(), "methodName");
    }
}
