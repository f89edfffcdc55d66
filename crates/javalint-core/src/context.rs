//! Context types for extraction and location resolution.

use std::path::{Path, PathBuf};

/// A Java source file read from disk.
///
/// Never cached between stages: each stage that needs the text reads it
/// again so results always reflect current disk content.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path to the file.
    pub path: PathBuf,
    /// Raw file contents.
    pub text: String,
}

impl SourceFile {
    /// Reads a file as UTF-8 text. Invalid sequences become U+FFFD.
    ///
    /// # Errors
    ///
    /// Returns the IO error if the file cannot be read.
    pub fn read(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            text: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Context provided to declaration sources.
///
/// Carries the analyzed root and the discovered Java files in enumeration
/// order; that order decides first-occurrence binding.
#[derive(Debug, Clone)]
pub struct ProjectContext<'a> {
    /// Root directory of the analyzed tree.
    pub root: &'a Path,
    /// All Java source files, in discovery order.
    pub source_files: Vec<PathBuf>,
}

impl<'a> ProjectContext<'a> {
    /// Creates a new project context.
    #[must_use]
    pub fn new(root: &'a Path) -> Self {
        Self {
            root,
            source_files: Vec::new(),
        }
    }

    /// Sets the list of source files.
    #[must_use]
    pub fn with_source_files(mut self, files: Vec<PathBuf>) -> Self {
        self.source_files = files;
        self
    }

    /// Path of `file` relative to the root, for display.
    #[must_use]
    pub fn relative<'p>(&self, file: &'p Path) -> &'p Path {
        file.strip_prefix(self.root).unwrap_or(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_strips_root() {
        let ctx = ProjectContext::new(Path::new("/work/project"));
        assert_eq!(
            ctx.relative(Path::new("/work/project/src/A.java")),
            Path::new("src/A.java")
        );
        assert_eq!(
            ctx.relative(Path::new("/elsewhere/B.java")),
            Path::new("/elsewhere/B.java")
        );
    }

    #[test]
    fn read_decodes_latin1_bytes_lossily() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Cafe.java");
        std::fs::write(&path, b"// caf\xE9\nint count;\n").unwrap();
        let file = SourceFile::read(&path).unwrap();
        assert_eq!(file.text, "// caf\u{FFFD}\nint count;\n");
    }

    #[test]
    fn read_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SourceFile::read(&dir.path().join("Gone.java")).unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
