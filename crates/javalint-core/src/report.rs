//! Report assembly and serialization.
//!
//! Non-matching verdicts are merged with resolved locations into
//! [`Violation`] records, grouped into the JSON report files written at the
//! analyzed root:
//!
//! | File | Top-level key | Written |
//! |---|---|---|
//! | `nonMatchingClasses.json` | `nonMatchingClasses` | always |
//! | `nonMatchingVariables.json` | `nonMatchingVariables` | always |
//! | `nonMatchingMethods.json` | `nonMatchingMethods` | when a method style rule exists |
//! | `missingJavadocsClass.json` | `missingJavadocsClass` | structural strategies |
//! | `missingJavadocsMethod.json` | `missingJavadocsMethod` | structural strategies |

use std::path::{Path, PathBuf};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::engine::Evaluation;
use crate::locate::Locator;
use crate::rules::RuleSet;
use crate::source::MissingJavadoc;
use crate::types::{DeclKind, FileError, Severity, SourcePosition};

/// Message used for missing-Javadoc entries without a `javadoc` rule.
pub const DEFAULT_JAVADOC_MESSAGE: &str = "Missing Javadoc comment";

/// Errors writing report files.
#[derive(Debug, Error)]
pub enum ReportError {
    /// A report file could not be written.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Target path.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A report could not be serialized.
    #[error("failed to serialize {file}: {source}")]
    Serialize {
        /// Report file name.
        file: &'static str,
        /// Serializer error.
        source: serde_json::Error,
    },
}

/// Where a violation lives, with an editor link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLocation {
    /// Absolute path of the file.
    pub file: PathBuf,
    /// Position of the identifier.
    pub position: SourcePosition,
    /// `file:///...#L<row>,<col>` link.
    pub hyperlink: String,
}

impl ResolvedLocation {
    /// Builds a location and its hyperlink.
    #[must_use]
    pub fn new(file: PathBuf, position: SourcePosition) -> Self {
        let hyperlink = hyperlink(&file, position);
        Self {
            file,
            position,
            hyperlink,
        }
    }
}

/// Builds a `file:///` link to `position` in `file`.
///
/// Backslashes become forward slashes and leading slashes collapse, so both
/// `/home/a/B.java` and `C:\a\B.java` produce three slashes after `file:`.
#[must_use]
pub fn hyperlink(file: &Path, position: SourcePosition) -> String {
    let normalized = file.to_string_lossy().replace('\\', "/");
    format!(
        "file:///{}#L{},{}",
        normalized.trim_start_matches('/'),
        position.row,
        position.column
    )
}

/// One rule violation in a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Kind of the offending declaration.
    pub kind: DeclKind,
    /// Identifier name.
    pub name: String,
    /// Rule message.
    pub message: String,
    /// Rule severity.
    pub severity: Severity,
    /// Location, when one was resolved.
    pub location: Option<ResolvedLocation>,
}

impl Serialize for Violation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = if self.location.is_some() { 7 } else { 3 };
        let mut map = serializer.serialize_map(Some(len))?;
        map.serialize_entry(self.kind.name_key(), &self.name)?;
        map.serialize_entry("message", &self.message)?;
        map.serialize_entry("severity", &self.severity)?;
        if let Some(location) = &self.location {
            map.serialize_entry("file", &location.file.to_string_lossy())?;
            map.serialize_entry("row", &location.position.row)?;
            map.serialize_entry("col", &location.position.column)?;
            map.serialize_entry("hyperlink", &location.hyperlink)?;
        }
        map.end()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(loc) = &self.location {
            write!(
                f,
                "{}:{}:{}: ",
                loc.file.display(),
                loc.position.row,
                loc.position.column
            )?;
        }
        write!(
            f,
            "{} [{} `{}`] {}",
            self.severity, self.kind, self.name, self.message
        )
    }
}

/// A single report file.
#[derive(Debug, Clone, Copy)]
pub struct ReportFile<'a> {
    /// File name, e.g. `nonMatchingClasses.json`.
    pub file_name: &'static str,
    /// Top-level JSON key.
    pub key: &'static str,
    /// Entries.
    pub entries: &'a [Violation],
}

impl ReportFile<'_> {
    /// Serializes as 4-space indented JSON.
    ///
    /// # Errors
    ///
    /// Returns a serializer error.
    pub fn to_json(&self) -> Result<String, ReportError> {
        let wrap = |source| ReportError::Serialize {
            file: self.file_name,
            source,
        };
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        let mut map = ser.serialize_map(Some(1)).map_err(wrap)?;
        map.serialize_entry(self.key, self.entries).map_err(wrap)?;
        SerializeMap::end(map).map_err(wrap)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}

/// Receives user-facing notices from the pipeline.
pub trait ReportSink: Send + Sync {
    /// A report file was written.
    fn written(&self, path: &Path, entries: usize);

    /// A non-fatal problem worth surfacing.
    fn warning(&self, message: &str);
}

/// Sink forwarding notices to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn written(&self, path: &Path, entries: usize) {
        info!("Wrote {} ({entries} entries)", path.display());
    }

    fn warning(&self, message: &str) {
        tracing::warn!("{message}");
    }
}

/// Complete analysis output.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Class style violations.
    pub classes: Vec<Violation>,
    /// Variable style violations.
    pub variables: Vec<Violation>,
    /// Method style violations; `None` when no method rule is configured.
    pub methods: Option<Vec<Violation>>,
    /// Classes without Javadoc; `None` when the strategy cannot tell.
    pub missing_javadoc_classes: Option<Vec<Violation>>,
    /// Methods without Javadoc; `None` when the strategy cannot tell.
    pub missing_javadoc_methods: Option<Vec<Violation>>,
    /// Number of files read during extraction.
    pub files_checked: usize,
    /// Files that could not be read.
    pub file_errors: Vec<FileError>,
}

impl Report {
    /// The report files this report produces, in write order.
    #[must_use]
    pub fn files(&self) -> Vec<ReportFile<'_>> {
        let mut files = vec![
            ReportFile {
                file_name: "nonMatchingClasses.json",
                key: "nonMatchingClasses",
                entries: &self.classes,
            },
            ReportFile {
                file_name: "nonMatchingVariables.json",
                key: "nonMatchingVariables",
                entries: &self.variables,
            },
        ];
        if let Some(methods) = &self.methods {
            files.push(ReportFile {
                file_name: "nonMatchingMethods.json",
                key: "nonMatchingMethods",
                entries: methods,
            });
        }
        if let Some(classes) = &self.missing_javadoc_classes {
            files.push(ReportFile {
                file_name: "missingJavadocsClass.json",
                key: "missingJavadocsClass",
                entries: classes,
            });
        }
        if let Some(methods) = &self.missing_javadoc_methods {
            files.push(ReportFile {
                file_name: "missingJavadocsMethod.json",
                key: "missingJavadocsMethod",
                entries: methods,
            });
        }
        files
    }

    /// Every violation, in report-file order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.classes
            .iter()
            .chain(&self.variables)
            .chain(self.methods.iter().flatten())
            .chain(self.missing_javadoc_classes.iter().flatten())
            .chain(self.missing_javadoc_methods.iter().flatten())
    }

    /// Counts violations as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Checks if any violation meets or exceeds `severity`.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|v| v.severity >= severity)
    }

    /// Writes every report file into `dir`.
    ///
    /// All files are serialized before the first one is written, so a
    /// serialization failure leaves no partial report behind.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to(&self, dir: &Path, sink: &dyn ReportSink) -> Result<Vec<PathBuf>, ReportError> {
        let rendered = self
            .files()
            .into_iter()
            .map(|file| -> Result<_, ReportError> {
                Ok((file.file_name, file.entries.len(), file.to_json()?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut written = Vec::with_capacity(rendered.len());
        for (file_name, entries, json) in rendered {
            let path = dir.join(file_name);
            std::fs::write(&path, json).map_err(|source| ReportError::Io {
                path: path.clone(),
                source,
            })?;
            sink.written(&path, entries);
            written.push(path);
        }
        Ok(written)
    }
}

/// Merges rule verdicts with resolved locations.
pub struct ReportAssembler<'a> {
    locator: Locator<'a>,
    rules: &'a RuleSet,
}

impl<'a> ReportAssembler<'a> {
    /// Creates an assembler resolving locations across `files`.
    #[must_use]
    pub fn new(files: &'a [PathBuf], rules: &'a RuleSet) -> Self {
        Self {
            locator: Locator::new(files),
            rules,
        }
    }

    fn locate(&self, kind: DeclKind, name: &str) -> Option<ResolvedLocation> {
        // Class entries never carry a location.
        if kind == DeclKind::Class {
            return None;
        }
        let located = self.locator.resolve(name, kind);
        if located.is_none() {
            debug!("No location found for {kind} `{name}`");
        }
        located.map(|l| ResolvedLocation::new(l.file, l.position))
    }

    /// Builds style violations of `kind` from an evaluation.
    #[must_use]
    pub fn style_violations(&self, evaluation: &Evaluation<'_>, kind: DeclKind) -> Vec<Violation> {
        evaluation
            .violations_of(kind)
            .map(|verdict| Violation {
                kind,
                name: verdict.declaration.name.clone(),
                message: verdict.rule.message.clone(),
                severity: verdict.rule.severity,
                location: self.locate(kind, &verdict.declaration.name),
            })
            .collect()
    }

    /// Builds missing-Javadoc violations of `kind`.
    #[must_use]
    pub fn javadoc_violations(&self, missing: &MissingJavadoc, kind: DeclKind) -> Vec<Violation> {
        let names = match kind {
            DeclKind::Class => &missing.classes,
            DeclKind::Method => &missing.methods,
            DeclKind::Variable => return Vec::new(),
        };
        let (message, severity) = self.rules.javadoc_rule(kind).map_or_else(
            || (DEFAULT_JAVADOC_MESSAGE.to_owned(), Severity::Warning),
            |rule| (rule.message.clone(), rule.severity),
        );

        names
            .iter()
            .map(|name| Violation {
                kind,
                name: name.clone(),
                message: message.clone(),
                severity,
                location: self.locate(kind, name),
            })
            .collect()
    }
}
