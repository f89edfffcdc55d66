//! Structural declaration extraction.
//!
//! A [`StructuralParser`] turns a source tree into [`DeclTree`]s;
//! [`StructuralSource`] walks those trees and emits declarations plus
//! missing-Javadoc signals. [`SubprocessParser`] adapts an external parser
//! process that prints its findings as JSON.

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::context::ProjectContext;
use crate::source::{DeclarationSource, ExtractError, Extraction, MissingJavadoc};
use crate::tree::{DeclTree, NodeKind, ParsedUnit};
use crate::types::{Declaration, FileError};

/// Errors produced by structural parsers.
#[derive(Debug, Error)]
pub enum ParserError {
    /// The parser process could not be started.
    #[error("failed to start `{program}`: {source}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// The parser process exited unsuccessfully.
    #[error("`{program}` exited with {status}: {stderr}")]
    Exit {
        /// Program that failed.
        program: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// The parser output is not the expected JSON.
    #[error("invalid parser output: {0}")]
    InvalidOutput(String),

    /// No parser command is configured.
    #[error("no structural parser command configured")]
    NotConfigured,

    /// The grammar could not be loaded.
    #[error("failed to load grammar: {0}")]
    Language(String),

    /// A file could not be parsed.
    #[error("failed to parse {path}")]
    Parse {
        /// File that failed to parse.
        path: PathBuf,
    },
}

/// Everything a structural parser found.
#[derive(Debug, Clone, Default)]
pub struct ParseOutput {
    /// One tree per parsed unit, in file enumeration order.
    pub units: Vec<ParsedUnit>,
    /// Missing-Javadoc names reported directly by the parser.
    pub missing_javadoc: MissingJavadoc,
    /// Number of files the parser read.
    pub files_read: usize,
    /// Files the parser could not read.
    pub file_errors: Vec<FileError>,
}

/// A facility that parses a Java source tree into declaration trees.
pub trait StructuralParser: Send + Sync {
    /// Short parser name used in logs.
    fn name(&self) -> &'static str;

    /// Parses every file of `ctx`.
    ///
    /// # Errors
    ///
    /// Returns an error when the parser cannot run or its output is unusable.
    fn parse(&self, ctx: &ProjectContext<'_>) -> Result<ParseOutput, ParserError>;
}

/// Declaration source backed by a [`StructuralParser`].
pub struct StructuralSource {
    parser: Box<dyn StructuralParser>,
}

impl StructuralSource {
    /// Creates a source around `parser`.
    #[must_use]
    pub fn new(parser: Box<dyn StructuralParser>) -> Self {
        Self { parser }
    }
}

impl DeclarationSource for StructuralSource {
    fn name(&self) -> &'static str {
        self.parser.name()
    }

    fn extract(&self, ctx: &ProjectContext<'_>) -> Result<Extraction, ExtractError> {
        let output = self.parser.parse(ctx)?;
        let mut missing = output.missing_javadoc;
        let mut declarations = Vec::new();

        for unit in &output.units {
            collect(unit, &mut declarations, &mut missing);
        }

        debug!(
            "{}: {} declaration(s) from {} unit(s)",
            self.parser.name(),
            declarations.len(),
            output.units.len()
        );

        Ok(Extraction {
            declarations,
            missing_javadoc: Some(missing),
            files_read: output.files_read,
            file_errors: output.file_errors,
        })
    }
}

/// Visits every node of `unit` and records declarations and doc signals.
fn collect(unit: &ParsedUnit, declarations: &mut Vec<Declaration>, missing: &mut MissingJavadoc) {
    for node in unit.tree.walk() {
        let Some(name) = node.name.as_deref() else {
            continue;
        };
        let (decl, undocumented) = match node.kind {
            NodeKind::ClassDeclaration => (
                Declaration::class(name, unit.file.clone()),
                &mut missing.classes,
            ),
            NodeKind::MethodDeclaration => (
                Declaration::method(name, unit.file.clone()),
                &mut missing.methods,
            ),
            NodeKind::VariableDeclarator => {
                declarations.push(Declaration::variable(name, unit.file.clone()));
                continue;
            }
            NodeKind::Unit | NodeKind::Other => continue,
        };
        if node.documented == Some(false) {
            undocumented.push(name.to_owned());
        }
        declarations.push(decl);
    }
}

/// JSON printed by an external parser process.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct SubprocessReport {
    non_matching_classes: Vec<String>,
    non_matching_variables: Vec<String>,
    missing_javadocs_class: Vec<String>,
    missing_javadocs_method: Vec<String>,
}

/// Runs an external parser process over the root directory.
///
/// The root path is appended as the last argument; the process must print a
/// JSON object with `nonMatchingClasses`, `nonMatchingVariables`,
/// `missingJavadocsClass` and `missingJavadocsMethod` string arrays.
#[derive(Debug, Clone)]
pub struct SubprocessParser {
    program: String,
    args: Vec<String>,
}

impl SubprocessParser {
    /// Creates a parser running `program` with `args`.
    #[must_use]
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds a parser from a `[program, args...]` command line.
    ///
    /// # Errors
    ///
    /// Returns [`ParserError::NotConfigured`] if `command` is empty.
    pub fn from_command(command: &[String]) -> Result<Self, ParserError> {
        let (program, args) = command.split_first().ok_or(ParserError::NotConfigured)?;
        Ok(Self::new(program.clone(), args.to_vec()))
    }

    fn run(&self, root: &Path) -> Result<Vec<u8>, ParserError> {
        info!("Running structural parser `{}`", self.program);
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(root)
            .output()
            .map_err(|source| ParserError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ParserError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_owned(),
            });
        }

        Ok(output.stdout)
    }
}

/// Converts subprocess JSON into a flat parse output.
fn parse_report(stdout: &[u8]) -> Result<ParseOutput, ParserError> {
    let report: SubprocessReport =
        serde_json::from_slice(stdout).map_err(|e| ParserError::InvalidOutput(e.to_string()))?;

    let mut tree = DeclTree::new();
    let root = tree.root();
    for name in report.non_matching_classes {
        tree.push(root, NodeKind::ClassDeclaration, Some(name));
    }
    for name in report.non_matching_variables {
        tree.push(root, NodeKind::VariableDeclarator, Some(name));
    }

    Ok(ParseOutput {
        units: vec![ParsedUnit { file: None, tree }],
        missing_javadoc: MissingJavadoc {
            classes: report.missing_javadocs_class,
            methods: report.missing_javadocs_method,
        },
        files_read: 0,
        file_errors: Vec::new(),
    })
}

impl StructuralParser for SubprocessParser {
    fn name(&self) -> &'static str {
        "subprocess"
    }

    fn parse(&self, ctx: &ProjectContext<'_>) -> Result<ParseOutput, ParserError> {
        let stdout = self.run(ctx.root)?;
        let mut output = parse_report(&stdout)?;
        output.files_read = ctx.source_files.len();
        Ok(output)
    }
}
