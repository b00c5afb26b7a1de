//! Transform Module
//!
//! Depth-first rewriting of a [`TemplateAst`]. Each registered
//! [`NodeTransform`] is entered on every node in registration order and may
//! hand back an [`ExitFn`]; exit functions run after the node's children
//! have been visited, last registered first. Transforms may replace or
//! remove the node they are visiting through the [`TransformContext`].

pub mod attributes;
pub mod comments;
pub mod node_transforms;
pub mod whitespace;

use log::{debug, trace};
use smallvec::SmallVec;

use crate::config::CompileOptions;
use crate::error::TransformError;
use crate::ml_parser::ast::{Node, NodeId, TemplateAst};
use crate::parse_util::ParseError;

pub use node_transforms::default_transforms;

/// Exit-phase callback returned from [`NodeTransform::enter`]
pub type ExitFn = Box<dyn FnOnce(&mut TransformContext<'_>) -> Result<(), TransformError>>;

pub type TransformResult = Result<Option<ExitFn>, TransformError>;

pub trait NodeTransform {
    fn enter(&self, node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult;
}

impl<F> NodeTransform for F
where
    F: Fn(NodeId, &mut TransformContext<'_>) -> TransformResult,
{
    fn enter(&self, node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult {
        self(node, ctx)
    }
}

/// Box a closure as a transform
pub fn node_transform<F>(f: F) -> Box<dyn NodeTransform>
where
    F: Fn(NodeId, &mut TransformContext<'_>) -> TransformResult + 'static,
{
    Box::new(f)
}

/// Box a closure as an exit function
pub fn exit_fn<F>(f: F) -> ExitFn
where
    F: FnOnce(&mut TransformContext<'_>) -> Result<(), TransformError> + 'static,
{
    Box::new(f)
}

pub struct TransformContext<'a> {
    pub ast: &'a mut TemplateAst,
    pub options: &'a CompileOptions,
    transforms: &'a [Box<dyn NodeTransform>],
    /// Node being visited; `None` once it has been removed
    pub current_node: Option<NodeId>,
    pub parent: Option<NodeId>,
    /// Open nodes from the root down to `parent`
    pub ancestors: Vec<NodeId>,
    pub child_index: usize,
    pub diagnostics: Vec<ParseError>,
}

impl<'a> TransformContext<'a> {
    pub fn new(
        ast: &'a mut TemplateAst,
        transforms: &'a [Box<dyn NodeTransform>],
        options: &'a CompileOptions,
    ) -> Self {
        TransformContext {
            ast,
            options,
            transforms,
            current_node: None,
            parent: None,
            ancestors: Vec::new(),
            child_index: 0,
            diagnostics: Vec::new(),
        }
    }

    pub fn current_node(&self) -> Result<NodeId, TransformError> {
        self.current_node.ok_or(TransformError::NoCurrentNode)
    }

    /// Resolve the parent slot holding the current node, checking that the
    /// context still describes the tree.
    fn current_slot(&self) -> Result<(NodeId, usize, NodeId), TransformError> {
        let node = self.current_node()?;
        let parent = self.parent.ok_or(TransformError::NoParent { node })?;
        let index = self.child_index;
        match self.ast.children(parent).get(index) {
            Some(&held) if held == node => Ok((parent, index, node)),
            _ => Err(TransformError::StaleContext {
                node,
                parent,
                index,
            }),
        }
    }

    /// Put `node` in the current node's slot and continue visiting it in
    /// place of the old one.
    pub fn replace_node(&mut self, node: Node) -> Result<NodeId, TransformError> {
        let (parent, index, old) = self.current_slot()?;
        let id = self.ast.alloc(node);
        self.ast.node_mut(parent).children[index] = id;
        self.current_node = Some(id);
        trace!(target: "template.transform", "replaced {} with {}", old, id);
        Ok(id)
    }

    /// Splice the current node out of its parent. No further transforms,
    /// children or exit functions run for it.
    pub fn remove_node(&mut self) -> Result<(), TransformError> {
        let (parent, index, old) = self.current_slot()?;
        self.ast.node_mut(parent).children.remove(index);
        self.current_node = None;
        trace!(target: "template.transform", "removed {}", old);
        Ok(())
    }

    pub fn report(&mut self, error: ParseError) {
        log::warn!(target: "template.transform", "{}", error);
        self.diagnostics.push(error);
    }
}

/// Run `transforms` over the whole tree, returning the diagnostics they
/// reported.
pub fn transform(
    ast: &mut TemplateAst,
    transforms: &[Box<dyn NodeTransform>],
    options: &CompileOptions,
) -> Result<Vec<ParseError>, TransformError> {
    let root = ast.root();
    let mut ctx = TransformContext::new(ast, transforms, options);
    traverse_node(root, &mut ctx)?;
    debug!(
        target: "template.transform",
        "applied {} transforms, {} diagnostics",
        transforms.len(),
        ctx.diagnostics.len()
    );
    Ok(ctx.diagnostics)
}

pub fn traverse_node(node: NodeId, ctx: &mut TransformContext<'_>) -> Result<(), TransformError> {
    ctx.current_node = Some(node);
    let transforms = ctx.transforms;
    let mut exit_fns: SmallVec<[ExitFn; 4]> = SmallVec::new();

    for transform in transforms {
        let Some(current) = ctx.current_node else {
            return Ok(());
        };
        if let Some(on_exit) = transform.enter(current, ctx)? {
            exit_fns.push(on_exit);
        }
        if ctx.current_node.is_none() {
            return Ok(());
        }
    }

    let Some(current) = ctx.current_node else {
        return Ok(());
    };
    let parent = ctx.parent;
    let child_index = ctx.child_index;

    traverse_children(current, ctx)?;

    ctx.current_node = Some(current);
    ctx.parent = parent;
    ctx.child_index = child_index;
    while let Some(on_exit) = exit_fns.pop() {
        on_exit(ctx)?;
    }
    Ok(())
}

/// Children are addressed by live index: a child that removes itself
/// leaves its next sibling at the same index.
fn traverse_children(parent: NodeId, ctx: &mut TransformContext<'_>) -> Result<(), TransformError> {
    ctx.ancestors.push(parent);
    let mut i = 0;
    while i < ctx.ast.children(parent).len() {
        let child = ctx.ast.children(parent)[i];
        let len_before = ctx.ast.children(parent).len();
        ctx.parent = Some(parent);
        ctx.child_index = i;
        traverse_node(child, ctx)?;
        if ctx.ast.children(parent).len() >= len_before {
            i += 1;
        }
    }
    ctx.ancestors.pop();
    Ok(())
}
