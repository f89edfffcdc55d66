//! Rich terminal rendering of located violations through `miette`.

use miette::{Diagnostic, NamedSource, SourceSpan};

use crate::context::SourceFile;
use crate::report::Violation;

/// A located violation with its source snippet attached.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("[{kind} `{name}`] {message}")]
pub struct ViolationDiagnostic {
    kind: String,
    name: String,
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("{severity}")]
    span: SourceSpan,
    severity: String,
    #[help]
    help: Option<String>,
}

impl ViolationDiagnostic {
    /// Builds a diagnostic by re-reading the violation's file.
    ///
    /// Returns `None` for unlocated violations, unreadable files, or when
    /// the recorded position no longer exists in the file.
    #[must_use]
    pub fn from_violation(violation: &Violation) -> Option<Self> {
        let location = violation.location.as_ref()?;
        let file = SourceFile::read(&location.file).ok()?;
        let offset = location.position.byte_offset(&file.text)?;

        Some(Self {
            kind: violation.kind.to_string(),
            name: violation.name.clone(),
            message: violation.message.clone(),
            span: SourceSpan::from((offset, violation.name.len())),
            severity: violation.severity.to_string(),
            help: Some(location.hyperlink.clone()),
            src: NamedSource::new(file.path.to_string_lossy(), file.text),
        })
    }
}
