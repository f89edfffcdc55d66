//! Heuristic (lexical) declaration extraction.
//!
//! Works on comment-stripped text with two patterns:
//!
//! - classes: the keyword `class`, whitespace, then an identifier.
//! - variables: a whitespace character, a type token (a primitive keyword or
//!   a capitalized identifier of two or more characters), whitespace, then a
//!   lowercase-leading identifier.
//!
//! The variable pattern undercounts on purpose: qualified or generic types,
//! arrays of generics and comma lists (`int a, b;` yields only `a`) are not
//! recognized. Methods are never extracted here.
//!
//! The leading whitespace must not follow any character of
//! `public|private|protected|static|final`. This is a character-set test,
//! not a word test: it rejects `private int x` as intended, but it also
//! rejects any declaration whose preceding word ends in one of those letters
//! (`return`, `new`, ...).

use std::path::PathBuf;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use crate::context::{ProjectContext, SourceFile};
use crate::source::{DeclarationSource, ExtractError, Extraction};
use crate::strip::strip;
use crate::types::{Declaration, FileError};

/// Characters that may not precede the whitespace before a variable's type.
const MODIFIER_CHARS: &str = "public|private|protected|static|final";

#[allow(clippy::expect_used)] // constant pattern
fn class_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"class\s+([A-Za-z0-9_]+)").expect("class pattern is valid"))
}

#[allow(clippy::expect_used)] // constant pattern
fn variable_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"\s(?:byte|short|int|long|float|double|char|boolean|[A-Z][A-Za-z0-9_]+)\s+([a-z][A-Za-z0-9_]*)",
        )
        .expect("variable pattern is valid")
    })
}

/// Class names in `text`, in order of appearance.
///
/// `text` should already be comment-stripped.
#[must_use]
pub fn class_names(text: &str) -> Vec<String> {
    class_pattern()
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_owned()))
        .collect()
}

/// Variable names in `text`, in order of appearance.
///
/// `text` should already be comment-stripped.
#[must_use]
pub fn variable_names(text: &str) -> Vec<String> {
    let re = variable_pattern();
    let mut names = Vec::new();
    let mut pos = 0;

    while let Some(caps) = re.captures_at(text, pos) {
        let Some(whole) = caps.get(0) else { break };
        let preceded_by_modifier = text[..whole.start()]
            .chars()
            .next_back()
            .is_some_and(|c| MODIFIER_CHARS.contains(c));

        if preceded_by_modifier {
            // Retry from the next character, like a failed lookbehind would.
            pos = whole.start() + text[whole.start()..].chars().next().map_or(1, char::len_utf8);
            continue;
        }

        if let Some(name) = caps.get(1) {
            names.push(name.as_str().to_owned());
        }
        pos = whole.end();
    }

    names
}

/// Extracts class and variable declarations from raw source text.
///
/// Comments and literal contents are stripped first.
#[must_use]
pub fn extract(text: &str, source: Option<PathBuf>) -> Vec<Declaration> {
    let cleaned = strip(text);
    let mut declarations: Vec<Declaration> = class_names(&cleaned)
        .into_iter()
        .map(|name| Declaration::class(name, source.clone()))
        .collect();
    declarations.extend(
        variable_names(&cleaned)
            .into_iter()
            .map(|name| Declaration::variable(name, source.clone())),
    );
    declarations
}

/// Lexical declaration source.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSource;

impl HeuristicSource {
    /// Creates the heuristic source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DeclarationSource for HeuristicSource {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn extract(&self, ctx: &ProjectContext<'_>) -> Result<Extraction, ExtractError> {
        let mut result = Extraction::default();

        for path in &ctx.source_files {
            let file = match SourceFile::read(path) {
                Ok(file) => file,
                Err(e) => {
                    result.file_errors.push(FileError::new(path, &e));
                    continue;
                }
            };

            let declarations = extract(&file.text, Some(file.path));
            debug!(
                "{}: {} declaration(s)",
                ctx.relative(path).display(),
                declarations.len()
            );
            result.declarations.extend(declarations);
            result.files_read += 1;
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeclKind;

    #[test]
    fn finds_class_names() {
        let src = "public class Foo {}\nfinal class Bar extends Foo {}\n";
        assert_eq!(class_names(src), vec!["Foo", "Bar"]);
    }

    #[test]
    fn finds_primitive_and_object_variables() {
        let src = "class A {\n    int count;\n    String name = \"\";\n    double ratio;\n}\n";
        assert_eq!(variable_names(src), vec!["count", "name", "ratio"]);
    }

    #[test]
    fn comma_list_yields_first_name_only() {
        assert_eq!(variable_names("\n    int a, b;"), vec!["a"]);
    }

    #[test]
    fn needs_leading_whitespace() {
        assert!(variable_names("int count;").is_empty());
        assert_eq!(variable_names("\nint count;"), vec!["count"]);
    }

    #[test]
    fn modifier_before_type_is_rejected() {
        assert!(variable_names("\n    private int hidden;").is_empty());
        assert!(variable_names("\n    public static String name;").is_empty());
    }

    #[test]
    fn preceding_letter_set_also_rejects_non_modifiers() {
        // 'n' of `return` belongs to the modifier character set.
        assert!(variable_names("\n    return Foo bar;").is_empty());
        // 'x' does not.
        assert_eq!(variable_names("\n    max Foo bar;"), vec!["bar"]);
    }

    #[test]
    fn single_letter_types_are_not_types() {
        assert!(variable_names("\n    T value;").is_empty());
    }

    #[test]
    fn rejected_candidate_does_not_hide_later_ones() {
        let src = "\n    private int hidden;\n    int shown;";
        assert_eq!(variable_names(src), vec!["shown"]);
    }

    #[test]
    fn commented_declarations_are_ignored() {
        let decls = extract("/* int count; */\nint total;", None);
        let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["total"]);
        assert_eq!(decls[0].kind, DeclKind::Variable);
    }

    #[test]
    fn string_contents_are_ignored() {
        let decls = extract("class A {\n    String s = \"a Foo bar\";\n}", None);
        let names: Vec<&str> = decls.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["A", "s"]);
    }

    #[test]
    fn classes_come_before_variables_per_file() {
        let decls = extract("class A {\n    int x;\n}\nclass B {}\n", None);
        let kinds: Vec<DeclKind> = decls.iter().map(|d| d.kind).collect();
        assert_eq!(
            kinds,
            vec![DeclKind::Class, DeclKind::Class, DeclKind::Variable]
        );
    }

    #[test]
    fn source_records_unreadable_files_and_continues() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("A.java");
        let bad = dir.path().join("Deleted.java");
        std::fs::write(&good, "class A {\n    int x;\n}\n").unwrap();

        let ctx = ProjectContext::new(dir.path()).with_source_files(vec![bad.clone(), good]);
        let extraction = HeuristicSource::new().extract(&ctx).unwrap();

        assert_eq!(extraction.files_read, 1);
        assert_eq!(extraction.file_errors.len(), 1);
        assert_eq!(extraction.file_errors[0].path, bad);
        assert_eq!(extraction.declarations.len(), 2);
        assert!(extraction.missing_javadoc.is_none());
    }
}
