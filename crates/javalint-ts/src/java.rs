//! Java declaration trees from Tree-sitter.

use std::path::Path;

use javalint_core::{
    DeclTree, FileError, NodeKind, ParseOutput, ParsedUnit, ParserError, ProjectContext,
    SourceFile, StructuralParser,
};
use tracing::debug;
use tree_sitter::{Language, Node, Parser};

/// Structural parser for Java backed by `tree-sitter-java`.
///
/// Class and method nodes carry a Javadoc flag: true when the closest
/// preceding sibling, skipping line comments and annotations, is a
/// `/** ... */` block comment.
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeSitterJavaParser;

impl TreeSitterJavaParser {
    /// Creates a new Java parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn parser() -> Result<Parser, ParserError> {
        let language: Language = tree_sitter_java::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| ParserError::Language(e.to_string()))?;
        Ok(parser)
    }

    /// Parses one Java source text into a declaration tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the grammar cannot be loaded or parsing is
    /// aborted.
    pub fn parse_text(&self, text: &str, path: &Path) -> Result<DeclTree, ParserError> {
        let mut parser = Self::parser()?;
        parse_tree(&mut parser, text, path)
    }
}

fn parse_tree(parser: &mut Parser, text: &str, path: &Path) -> Result<DeclTree, ParserError> {
    let tree = parser.parse(text, None).ok_or_else(|| ParserError::Parse {
        path: path.to_path_buf(),
    })?;
    Ok(build_tree(tree.root_node(), text.as_bytes()))
}

fn declaration_kind(kind: &str) -> Option<NodeKind> {
    match kind {
        "class_declaration" => Some(NodeKind::ClassDeclaration),
        "method_declaration" => Some(NodeKind::MethodDeclaration),
        "variable_declarator" => Some(NodeKind::VariableDeclarator),
        // Named type declarations that are not classes; kept so nested
        // declarations stay attached to their owner.
        "interface_declaration"
        | "enum_declaration"
        | "record_declaration"
        | "annotation_type_declaration" => Some(NodeKind::Other),
        _ => None,
    }
}

/// Converts a syntax tree into a [`DeclTree`] holding only declarations.
///
/// Non-declaration syntax nodes are flattened: their descendants attach to
/// the nearest declaration ancestor, in document order.
fn build_tree(root: Node<'_>, src: &[u8]) -> DeclTree {
    let mut decls = DeclTree::new();
    let mut stack = vec![(root, decls.root())];

    while let Some((node, parent)) = stack.pop() {
        let id = match declaration_kind(node.kind()) {
            Some(kind) => {
                let name = node
                    .child_by_field_name("name")
                    .and_then(|n| n.utf8_text(src).ok())
                    .map(str::to_owned);
                let id = decls.push(parent, kind, name);
                if matches!(
                    kind,
                    NodeKind::ClassDeclaration | NodeKind::MethodDeclaration
                ) {
                    decls.set_documented(id, has_javadoc(node, src));
                }
                id
            }
            None => parent,
        };

        let mut cursor = node.walk();
        let children: Vec<Node<'_>> = node.named_children(&mut cursor).collect();
        stack.extend(children.into_iter().rev().map(|child| (child, id)));
    }

    decls
}

fn has_javadoc(node: Node<'_>, src: &[u8]) -> bool {
    let mut prev = node.prev_sibling();
    while let Some(sibling) = prev {
        match sibling.kind() {
            "block_comment" => {
                return sibling
                    .utf8_text(src)
                    .is_ok_and(|text| text.starts_with("/**"));
            }
            "line_comment" | "modifiers" | "marker_annotation" | "annotation" => {
                prev = sibling.prev_sibling();
            }
            _ => return false,
        }
    }
    false
}

impl StructuralParser for TreeSitterJavaParser {
    fn name(&self) -> &'static str {
        "tree-sitter"
    }

    fn parse(&self, ctx: &ProjectContext<'_>) -> Result<ParseOutput, ParserError> {
        let mut parser = Self::parser()?;
        let mut output = ParseOutput::default();

        for path in &ctx.source_files {
            let file = match SourceFile::read(path) {
                Ok(file) => file,
                Err(e) => {
                    output.file_errors.push(FileError::new(path, &e));
                    continue;
                }
            };

            let tree = parse_tree(&mut parser, &file.text, path)?;
            debug!(
                "{}: {} tree node(s)",
                ctx.relative(path).display(),
                tree.len()
            );
            output.units.push(ParsedUnit {
                file: Some(file.path),
                tree,
            });
            output.files_read += 1;
        }

        Ok(output)
    }
}
