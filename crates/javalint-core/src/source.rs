//! Declaration sources: the interchangeable extraction strategies.
//!
//! Every strategy yields the same [`Extraction`] shape, so the rule engine
//! and the report assembler never branch on which one ran.

use crate::context::ProjectContext;
use crate::structural::ParserError;
use crate::types::{Declaration, FileError};

use thiserror::Error;
use tracing::warn;

/// Errors a declaration source can fail with.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The structural parser failed.
    #[error("structural parser failed: {0}")]
    Parser(#[from] ParserError),
}

/// Names whose documentation comment is absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingJavadoc {
    /// Classes without a `/** ... */` comment.
    pub classes: Vec<String>,
    /// Methods without a `/** ... */` comment.
    pub methods: Vec<String>,
}

/// Output of a declaration source.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Declarations in file scan order.
    pub declarations: Vec<Declaration>,
    /// Documentation signals; `None` when the strategy cannot observe them.
    pub missing_javadoc: Option<MissingJavadoc>,
    /// Number of files successfully read.
    pub files_read: usize,
    /// Files that could not be read.
    pub file_errors: Vec<FileError>,
}

/// A strategy for recovering declarations from a Java source tree.
pub trait DeclarationSource: Send + Sync {
    /// Short strategy name used in logs (e.g. `"heuristic"`).
    fn name(&self) -> &'static str;

    /// Extracts declarations from every file in `ctx`.
    ///
    /// Unreadable files are recorded in [`Extraction::file_errors`], not
    /// returned as errors.
    ///
    /// # Errors
    ///
    /// Returns an error when the strategy as a whole cannot run.
    fn extract(&self, ctx: &ProjectContext<'_>) -> Result<Extraction, ExtractError>;
}

/// Type alias for boxed `DeclarationSource` trait objects.
pub type SourceBox = Box<dyn DeclarationSource>;

/// Runs a primary source and substitutes a fallback when it fails.
pub struct FallbackSource {
    primary: SourceBox,
    fallback: SourceBox,
}

impl FallbackSource {
    /// Wraps `primary` with `fallback`.
    #[must_use]
    pub fn new(primary: SourceBox, fallback: SourceBox) -> Self {
        Self { primary, fallback }
    }
}

impl DeclarationSource for FallbackSource {
    fn name(&self) -> &'static str {
        self.primary.name()
    }

    fn extract(&self, ctx: &ProjectContext<'_>) -> Result<Extraction, ExtractError> {
        match self.primary.extract(ctx) {
            Ok(extraction) => Ok(extraction),
            Err(e) => {
                warn!(
                    "{} extraction failed ({e}), falling back to {}",
                    self.primary.name(),
                    self.fallback.name()
                );
                self.fallback.extract(ctx)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    struct Failing;

    impl DeclarationSource for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn extract(&self, _ctx: &ProjectContext<'_>) -> Result<Extraction, ExtractError> {
            Err(ParserError::InvalidOutput("not json".into()).into())
        }
    }

    struct Fixed(&'static str);

    impl DeclarationSource for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }
        fn extract(&self, _ctx: &ProjectContext<'_>) -> Result<Extraction, ExtractError> {
            Ok(Extraction {
                declarations: vec![Declaration::class(self.0, None)],
                ..Extraction::default()
            })
        }
    }

    #[test]
    fn fallback_used_on_failure() {
        let source = FallbackSource::new(Box::new(Failing), Box::new(Fixed("Foo")));
        let ctx = ProjectContext::new(Path::new("."));
        let extraction = source.extract(&ctx).unwrap();
        assert_eq!(extraction.declarations[0].name, "Foo");
    }

    #[test]
    fn primary_result_kept_on_success() {
        let source = FallbackSource::new(Box::new(Fixed("Primary")), Box::new(Fixed("Other")));
        let ctx = ProjectContext::new(Path::new("."));
        let extraction = source.extract(&ctx).unwrap();
        assert_eq!(extraction.declarations[0].name, "Primary");
        assert_eq!(source.name(), "fixed");
    }

    #[test]
    fn failing_source_surfaces_error_without_fallback() {
        let ctx = ProjectContext::new(Path::new("."));
        let err = Failing.extract(&ctx).unwrap_err();
        assert!(err.to_string().contains("not json"));
    }
}
