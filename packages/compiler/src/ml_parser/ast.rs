//! ML Parser AST
//!
//! The template tree is stored in an arena: nodes live in a `Vec` owned by
//! [`TemplateAst`] and refer to their children by [`NodeId`]. Nodes detached
//! by a transform stay allocated but are no longer reachable from the root.

use serde::Serialize;
use std::fmt;

use crate::output::output_ast::JsNode;
use crate::parse_util::ParseSourceSpan;

/// Index of a node inside its [`TemplateAst`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
    pub source_span: Option<ParseSourceSpan>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
            source_span: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    pub tag: String,
    pub attributes: Vec<Attribute>,
    pub self_closing: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Text {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Comment {
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Interpolation {
    /// Expression source between the delimiters, untrimmed
    pub expression: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    Root,
    Element(Element),
    Text(Text),
    Comment(Comment),
    Interpolation(Interpolation),
}

impl NodeKind {
    pub fn element(tag: impl Into<String>) -> Self {
        NodeKind::Element(Element {
            tag: tag.into(),
            attributes: Vec::new(),
            self_closing: false,
        })
    }

    pub fn text(content: impl Into<String>) -> Self {
        NodeKind::Text(Text {
            content: content.into(),
        })
    }

    pub fn comment(content: impl Into<String>) -> Self {
        NodeKind::Comment(Comment {
            content: content.into(),
        })
    }

    pub fn interpolation(expression: impl Into<String>) -> Self {
        NodeKind::Interpolation(Interpolation {
            expression: expression.into(),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Root => "Root",
            NodeKind::Element(_) => "Element",
            NodeKind::Text(_) => "Text",
            NodeKind::Comment(_) => "Comment",
            NodeKind::Interpolation(_) => "Interpolation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<NodeId>,
    pub source_span: Option<ParseSourceSpan>,
    /// Generated code attached by the code-generation transforms
    #[serde(skip_serializing_if = "Option::is_none")]
    pub js_node: Option<JsNode>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Node {
            kind,
            children: Vec::new(),
            source_span: None,
            js_node: None,
        }
    }

    pub fn with_span(mut self, span: ParseSourceSpan) -> Self {
        self.source_span = Some(span);
        self
    }

    pub fn as_element(&self) -> Option<&Element> {
        match &self.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.kind, NodeKind::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.kind, NodeKind::Comment(_))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateAst {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for TemplateAst {
    fn default() -> Self {
        TemplateAst::new()
    }
}

impl TemplateAst {
    /// An empty tree holding only the root
    pub fn new() -> Self {
        TemplateAst {
            nodes: vec![Node::new(NodeKind::Root)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of allocated nodes, reachable or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node(self.root).children.is_empty()
    }

    pub fn alloc(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(node);
        id
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[parent.0].children.push(child);
    }

    /// Tag name when `id` is an element
    pub fn tag_of(&self, id: NodeId) -> Option<&str> {
        self.node(id).as_element().map(|e| e.tag.as_str())
    }

    /// Indented outline of the reachable tree, one node per line.
    pub fn dump(&self) -> String {
        let mut dumper = Dumper::default();
        dumper.visit_node(self, self.root);
        dumper.lines.join("\n")
    }
}

/// Read-only walk over a [`TemplateAst`]
pub trait Visitor {
    fn visit_root(&mut self, ast: &TemplateAst, id: NodeId) {
        self.visit_children(ast, id);
    }

    fn visit_element(&mut self, ast: &TemplateAst, id: NodeId, _element: &Element) {
        self.visit_children(ast, id);
    }

    fn visit_text(&mut self, _ast: &TemplateAst, _id: NodeId, _text: &Text) {}

    fn visit_comment(&mut self, _ast: &TemplateAst, _id: NodeId, _comment: &Comment) {}

    fn visit_interpolation(&mut self, _ast: &TemplateAst, _id: NodeId, _interpolation: &Interpolation) {}

    fn visit_children(&mut self, ast: &TemplateAst, id: NodeId) {
        visit_all(self, ast, ast.children(id));
    }

    fn visit_node(&mut self, ast: &TemplateAst, id: NodeId) {
        match &ast.node(id).kind {
            NodeKind::Root => self.visit_root(ast, id),
            NodeKind::Element(e) => self.visit_element(ast, id, e),
            NodeKind::Text(t) => self.visit_text(ast, id, t),
            NodeKind::Comment(c) => self.visit_comment(ast, id, c),
            NodeKind::Interpolation(i) => self.visit_interpolation(ast, id, i),
        }
    }
}

pub fn visit_all<V: Visitor + ?Sized>(visitor: &mut V, ast: &TemplateAst, nodes: &[NodeId]) {
    for &id in nodes {
        visitor.visit_node(ast, id);
    }
}

#[derive(Default)]
struct Dumper {
    depth: usize,
    lines: Vec<String>,
}

impl Dumper {
    fn line(&mut self, kind: &str, desc: &str) {
        self.lines
            .push(format!("{}{}: {}", "-".repeat(self.depth * 2), kind, desc));
    }

    fn nested(&mut self, ast: &TemplateAst, id: NodeId) {
        self.depth += 1;
        self.visit_children(ast, id);
        self.depth -= 1;
    }
}

impl Visitor for Dumper {
    fn visit_root(&mut self, ast: &TemplateAst, id: NodeId) {
        self.line("Root", "");
        self.nested(ast, id);
    }

    fn visit_element(&mut self, ast: &TemplateAst, id: NodeId, element: &Element) {
        self.line("Element", &element.tag);
        self.nested(ast, id);
    }

    fn visit_text(&mut self, _ast: &TemplateAst, _id: NodeId, text: &Text) {
        self.line("Text", &text.content);
    }

    fn visit_comment(&mut self, _ast: &TemplateAst, _id: NodeId, comment: &Comment) {
        self.line("Comment", &comment.content);
    }

    fn visit_interpolation(&mut self, _ast: &TemplateAst, _id: NodeId, interpolation: &Interpolation) {
        self.line("Interpolation", &interpolation.expression);
    }
}
