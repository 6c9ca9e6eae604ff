//! Mova Syntax Shapes
//!
//! A reduced view of the Mova syntax tree: only the node shapes the type
//! inference engine dispatches on, stored in a growable arena with parent
//! links. The parser and name resolver live elsewhere and lower their full
//! trees into this form before handing expressions to the checker.

// Re-export common types for use by other crates
pub use smol_str::SmolStr;

use std::ops::Range;

/// A half-open byte range into a source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn merge(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn dummy() -> Self {
        Self { start: 0, end: 0 }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.start..span.end
    }
}

// ============================================================================
// Identifiers
// ============================================================================

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "#{}", self.0)
            }
        }
    };
}

arena_id! {
    /// Index of a node in a [`SyntaxTree`] arena.
    NodeId
}
arena_id! {
    /// Identity of a resolved struct declaration.
    StructId
}
arena_id! {
    /// Identity of a resolved function declaration.
    FunctionId
}
arena_id! {
    /// Identity of a generic type parameter declaration.
    TypeParamId
}

// ============================================================================
// Syntax Shapes
// ============================================================================

/// The closed set of syntactic positions the type engine distinguishes.
///
/// Child-bearing variants record their child slots in source order, so a
/// node's positional index inside its parent can be recovered by scanning
/// the parent's slot list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// `&e` / `&mut e`
    Borrow { mutable: bool, operand: NodeId },
    /// `f<T1, T2>(a1, a2)`: a call with its explicit type-argument and
    /// value-argument slots. Slots wrap the actual argument expressions.
    Call {
        function: FunctionId,
        type_args: Vec<NodeId>,
        args: Vec<NodeId>,
    },
    /// `S<T1, T2> { f1: e1, .. }`
    StructLit {
        item: StructId,
        type_args: Vec<NodeId>,
        fields: Vec<NodeId>,
    },
    /// A single `name: value` entry of a struct literal.
    LitField { name: SmolStr, value: NodeId },
    /// `let pat: annotation = initializer;`
    Let {
        pat: Option<NodeId>,
        annotation: Option<NodeId>,
        initializer: Option<NodeId>,
    },
    /// A written type in annotation position.
    TypeAnnotation,
    /// A type-argument slot of a call or struct literal.
    TypeArgument { value: NodeId },
    /// A value-argument slot of a call.
    ValueArgument { value: NodeId },
    /// Any other expression.
    Expr,
    /// A binding pattern.
    Pat,
}

/// One arena slot: a syntax shape plus its parent link and source span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub parent: Option<NodeId>,
    pub kind: NodeKind,
    pub span: Span,
}

/// Arena of [`Node`]s with parent links maintained by the builder methods.
///
/// Trees are built leaves-first: child nodes are allocated before the parent
/// that references them, and [`SyntaxTree::alloc`] rewires the children's
/// parent pointers to the freshly allocated node.
#[derive(Debug, Default, Clone)]
pub struct SyntaxTree {
    nodes: Vec<Node>,
}

impl SyntaxTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a node and point every child slot in `kind` back at it.
    pub fn alloc(&mut self, kind: NodeKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        for child in kind.children() {
            self.nodes[child.index()].parent = Some(id);
        }
        self.nodes.push(Node {
            parent: None,
            kind,
            span,
        });
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    pub fn span(&self, id: NodeId) -> Span {
        self.nodes[id.index()].span
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl NodeKind {
    /// Child slots of this shape, in source order.
    pub fn children(&self) -> Vec<NodeId> {
        match self {
            NodeKind::Borrow { operand, .. } => vec![*operand],
            NodeKind::Call {
                type_args, args, ..
            } => type_args.iter().chain(args.iter()).copied().collect(),
            NodeKind::StructLit {
                type_args, fields, ..
            } => type_args.iter().chain(fields.iter()).copied().collect(),
            NodeKind::LitField { value, .. } => vec![*value],
            NodeKind::Let {
                pat,
                annotation,
                initializer,
            } => pat
                .iter()
                .chain(annotation.iter())
                .chain(initializer.iter())
                .copied()
                .collect(),
            NodeKind::TypeArgument { value } | NodeKind::ValueArgument { value } => {
                vec![*value]
            }
            NodeKind::TypeAnnotation | NodeKind::Expr | NodeKind::Pat => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn alloc_wires_parent_links() {
        let mut tree = SyntaxTree::new();
        let operand = tree.alloc(NodeKind::Expr, Span::dummy());
        let borrow = tree.alloc(
            NodeKind::Borrow {
                mutable: false,
                operand,
            },
            Span::dummy(),
        );
        assert_eq!(tree.parent(operand), Some(borrow));
        assert_eq!(tree.parent(borrow), None);
    }

    #[test]
    fn call_children_in_source_order() {
        let mut tree = SyntaxTree::new();
        let t = tree.alloc(NodeKind::Expr, Span::dummy());
        let ta = tree.alloc(NodeKind::TypeArgument { value: t }, Span::dummy());
        let v = tree.alloc(NodeKind::Expr, Span::dummy());
        let va = tree.alloc(NodeKind::ValueArgument { value: v }, Span::dummy());
        let call = tree.alloc(
            NodeKind::Call {
                function: FunctionId(0),
                type_args: vec![ta],
                args: vec![va],
            },
            Span::dummy(),
        );
        assert_eq!(tree.kind(call).children(), vec![ta, va]);
        assert_eq!(tree.parent(ta), Some(call));
        assert_eq!(tree.parent(va), Some(call));
    }

    #[test]
    fn span_merge_covers_both() {
        let a = Span::new(3, 7);
        let b = Span::new(5, 12);
        assert_eq!(a.merge(b), Span::new(3, 12));
    }
}
