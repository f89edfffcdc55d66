//! # javalint-core
//!
//! Naming-convention analysis for Java source trees.
//!
//! The pipeline runs in five stages:
//!
//! 1. [`strip`](strip::strip) removes comments and literal contents.
//! 2. A [`DeclarationSource`] extracts class, method and variable names,
//!    either lexically ([`HeuristicSource`]) or from a declaration tree
//!    ([`StructuralSource`]).
//! 3. The [`RuleEngine`] tests every declaration against the `style` rules
//!    of `rules/rules.json`.
//! 4. The [`Locator`] maps each failing name back to a file, row and column.
//! 5. The [`Report`] is serialized to `nonMatching*.json` files.
//!
//! ## Example
//!
//! ```ignore
//! use javalint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .build()?;
//!
//! let report = analyzer.run()?;
//! println!("{} violation(s)", report.violations().count());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
mod diagnostic;
mod engine;
mod report;
mod rules;
mod source;
mod structural;
mod tree;
mod types;

/// Lexical extraction over comment-stripped text.
pub mod heuristic;
/// Name-to-position resolution on raw source text.
pub mod locate;
/// Comment and literal stripping.
pub mod strip;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, ExtractorConfig, ReportConfig, Strategy};
pub use context::{ProjectContext, SourceFile};
pub use diagnostic::ViolationDiagnostic;
pub use engine::{Evaluation, RuleEngine, Verdict};
pub use heuristic::HeuristicSource;
pub use locate::{Located, Locator};
pub use report::{
    hyperlink, Report, ReportAssembler, ReportError, ReportFile, ReportSink, ResolvedLocation,
    TracingSink, Violation, DEFAULT_JAVADOC_MESSAGE,
};
pub use rules::{Rule, RuleError, RuleSet, RuleType};
pub use source::{DeclarationSource, ExtractError, Extraction, FallbackSource, MissingJavadoc, SourceBox};
pub use structural::{ParseOutput, ParserError, StructuralParser, StructuralSource, SubprocessParser};
pub use tree::{DeclNode, DeclTree, NodeId, NodeKind, ParsedUnit, Walk};
pub use types::{DeclKind, Declaration, FileError, Severity, SourcePosition};
