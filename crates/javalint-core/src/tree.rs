//! Declaration trees: the input of the structural strategy.
//!
//! A [`DeclTree`] is an arena of [`DeclNode`]s. Parsers build it, and
//! [`DeclTree::walk`] visits every node reachable from the root in document
//! order using an explicit stack, so deeply nested classes cannot overflow
//! the call stack.

use std::path::PathBuf;

/// Index of a node inside its [`DeclTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// What a tree node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// The root of a file or of a flat name list.
    Unit,
    /// A class declaration.
    ClassDeclaration,
    /// A method declaration.
    MethodDeclaration,
    /// A variable declarator (field, local or resource).
    VariableDeclarator,
    /// Any other syntax node; only its children matter.
    Other,
}

/// One node of a declaration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclNode {
    /// Node kind.
    pub kind: NodeKind,
    /// Declared identifier, for declaration nodes.
    pub name: Option<String>,
    /// Whether a documentation comment precedes the node, when known.
    pub documented: Option<bool>,
    children: Vec<NodeId>,
}

impl DeclNode {
    /// Child ids in document order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }
}

/// Arena-backed declaration tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclTree {
    nodes: Vec<DeclNode>,
}

impl Default for DeclTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclTree {
    /// Creates a tree holding only a [`NodeKind::Unit`] root.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![DeclNode {
                kind: NodeKind::Unit,
                name: None,
                documented: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root node id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Looks up a node.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&DeclNode> {
        self.nodes.get(id.0)
    }

    /// Appends a node under `parent` and returns its id.
    ///
    /// An unknown `parent` attaches the node to the root.
    pub fn push(&mut self, parent: NodeId, kind: NodeKind, name: Option<String>) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(DeclNode {
            kind,
            name,
            documented: None,
            children: Vec::new(),
        });
        let parent = if parent.0 < id.0 { parent.0 } else { 0 };
        self.nodes[parent].children.push(id);
        id
    }

    /// Records whether `id` carries a documentation comment.
    pub fn set_documented(&mut self, id: NodeId, documented: bool) {
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.documented = Some(documented);
        }
    }

    /// Pre-order iterator over every node reachable from the root.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            tree: self,
            stack: vec![self.root()],
        }
    }
}

/// Explicit-stack pre-order traversal of a [`DeclTree`].
pub struct Walk<'a> {
    tree: &'a DeclTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a DeclNode;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        self.stack.extend(node.children.iter().rev().copied());
        Some(node)
    }
}

/// A parsed tree plus the file it was built from.
#[derive(Debug, Clone)]
pub struct ParsedUnit {
    /// Originating file, when the parser reports one.
    pub file: Option<PathBuf>,
    /// The declaration tree.
    pub tree: DeclTree,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(tree: &DeclTree) -> Vec<&str> {
        tree.walk().filter_map(|n| n.name.as_deref()).collect()
    }

    #[test]
    fn walk_is_document_order() {
        let mut tree = DeclTree::new();
        let outer = tree.push(tree.root(), NodeKind::ClassDeclaration, Some("Outer".into()));
        let body = tree.push(outer, NodeKind::Other, None);
        tree.push(body, NodeKind::VariableDeclarator, Some("a".into()));
        let inner = tree.push(body, NodeKind::ClassDeclaration, Some("Inner".into()));
        tree.push(inner, NodeKind::VariableDeclarator, Some("b".into()));
        tree.push(body, NodeKind::VariableDeclarator, Some("c".into()));
        tree.push(tree.root(), NodeKind::ClassDeclaration, Some("Next".into()));

        assert_eq!(names(&tree), vec!["Outer", "a", "Inner", "b", "c", "Next"]);
    }

    #[test]
    fn deep_nesting_does_not_recurse() {
        let mut tree = DeclTree::new();
        let mut parent = tree.root();
        for i in 0..100_000 {
            parent = tree.push(parent, NodeKind::ClassDeclaration, Some(format!("C{i}")));
        }
        assert_eq!(tree.walk().count(), 100_001);
    }

    #[test]
    fn empty_tree_walks_root_only() {
        let tree = DeclTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.walk().count(), 1);
    }

    #[test]
    fn documented_flag() {
        let mut tree = DeclTree::new();
        let id = tree.push(tree.root(), NodeKind::MethodDeclaration, Some("run".into()));
        assert_eq!(tree.get(id).unwrap().documented, None);
        tree.set_documented(id, false);
        assert_eq!(tree.get(id).unwrap().documented, Some(false));
    }
}
