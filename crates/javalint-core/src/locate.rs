//! Location resolution for declared names.
//!
//! Works on raw file text so positions match what an editor shows. Lines
//! whose first non-blank character is `/` or `*` are treated as comments and
//! skipped; comments starting mid-line are not detected. On every other line
//! only the first occurrence of the name is considered, and it is accepted
//! when followed by whitespace, `,`, `;` or the end of the line. Method
//! names also accept `(`. The first accepted occurrence in the file wins.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::context::SourceFile;
use crate::types::{DeclKind, SourcePosition};

fn is_comment_line(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with('/') || trimmed.starts_with('*')
}

fn ends_identifier(next: Option<char>, kind: DeclKind) -> bool {
    match next {
        None => true,
        Some('(') => kind == DeclKind::Method,
        Some(c) => c.is_whitespace() || c == ',' || c == ';',
    }
}

/// Finds the defining occurrence of variable `name` in `text`.
#[must_use]
pub fn locate(text: &str, name: &str) -> Option<SourcePosition> {
    locate_as(text, name, DeclKind::Variable)
}

/// Finds the defining occurrence of `name` declared as `kind`.
#[must_use]
pub fn locate_as(text: &str, name: &str, kind: DeclKind) -> Option<SourcePosition> {
    if name.is_empty() {
        return None;
    }

    for (index, line) in text.split('\n').enumerate() {
        if is_comment_line(line) {
            continue;
        }
        let Some(byte) = line.find(name) else {
            continue;
        };
        if ends_identifier(line[byte + name.len()..].chars().next(), kind) {
            return Some(SourcePosition::new(
                index + 1,
                line[..byte].chars().count() + 1,
            ));
        }
    }

    None
}

/// Reads `path` and locates `name` declared as `kind` in it.
///
/// # Errors
///
/// Returns the IO error if the file cannot be read.
pub fn locate_in_file(
    path: &Path,
    name: &str,
    kind: DeclKind,
) -> std::io::Result<Option<SourcePosition>> {
    let file = SourceFile::read(path)?;
    Ok(locate_as(&file.text, name, kind))
}

/// A resolved name: the file it was found in and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Located {
    /// File containing the accepted occurrence.
    pub file: PathBuf,
    /// Position of the occurrence.
    pub position: SourcePosition,
}

/// Resolves names across every file of a tree.
///
/// Files are re-read on each lookup and searched in enumeration order; the
/// first file with an accepted occurrence wins.
#[derive(Debug, Clone, Copy)]
pub struct Locator<'a> {
    files: &'a [PathBuf],
}

impl<'a> Locator<'a> {
    /// Creates a locator over `files`.
    #[must_use]
    pub fn new(files: &'a [PathBuf]) -> Self {
        Self { files }
    }

    /// Finds the first file and position defining `name` as `kind`.
    ///
    /// Unreadable files are skipped with a warning.
    #[must_use]
    pub fn resolve(&self, name: &str, kind: DeclKind) -> Option<Located> {
        for file in self.files {
            match locate_in_file(file, name, kind) {
                Ok(Some(position)) => {
                    return Some(Located {
                        file: file.clone(),
                        position,
                    })
                }
                Ok(None) => {}
                Err(e) => warn!("Skipping {} while locating `{name}`: {e}", file.display()),
            }
        }
        None
    }
}
