//! Code-generation transforms
//!
//! Each transform attaches an output AST node to the template node it
//! handles, in the exit phase so that children are always annotated before
//! their parent.

use log::warn;

use super::attributes::check_attribute_names;
use super::comments::remove_comments;
use super::whitespace::condense_whitespace;
use super::{exit_fn, node_transform, NodeTransform, TransformContext, TransformResult};
use crate::error::TransformError;
use crate::ml_parser::ast::{NodeId, NodeKind, TemplateAst};
use crate::output::output_ast::{
    array_expression, call_expression, function_decl, identifier, return_statement,
    string_literal, JsNode,
};
use crate::parse_util::{ParseError, ParseErrorKind};

/// The transforms `compile` runs, in order.
pub fn default_transforms() -> Vec<Box<dyn NodeTransform>> {
    vec![
        node_transform(remove_comments),
        node_transform(condense_whitespace),
        node_transform(check_attribute_names),
        node_transform(transform_root),
        node_transform(transform_element),
        node_transform(transform_text),
        node_transform(transform_interpolation),
    ]
}

/// Output nodes attached to the children of `node`, in order.
fn children_js(ast: &TemplateAst, node: NodeId) -> Result<Vec<JsNode>, TransformError> {
    ast.children(node)
        .iter()
        .map(|&child| {
            ast.node(child)
                .js_node
                .clone()
                .ok_or(TransformError::MissingJsNode { node: child })
        })
        .collect()
}

pub fn transform_text(node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult {
    if !ctx.ast.node(node).is_text() {
        return Ok(None);
    }
    Ok(Some(exit_fn(move |ctx| {
        let literal = match &ctx.ast.node(node).kind {
            NodeKind::Text(text) => string_literal(text.content.clone()),
            _ => {
                return Err(TransformError::UnexpectedNodeKind {
                    node,
                    expected: "a text node",
                })
            }
        };
        ctx.ast.node_mut(node).js_node = Some(literal);
        Ok(())
    })))
}

/// An interpolation becomes an identifier; one with no expression is
/// reported and dropped.
pub fn transform_interpolation(node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult {
    let current = ctx.ast.node(node);
    let NodeKind::Interpolation(interpolation) = &current.kind else {
        return Ok(None);
    };
    if interpolation.expression.trim().is_empty() {
        let span = current.source_span.unwrap_or_default();
        ctx.report(ParseError::warning(ParseErrorKind::EmptyInterpolation, span));
        ctx.remove_node()?;
        return Ok(None);
    }
    Ok(Some(exit_fn(move |ctx| {
        let ident = match &ctx.ast.node(node).kind {
            NodeKind::Interpolation(interpolation) => identifier(interpolation.expression.trim()),
            _ => {
                return Err(TransformError::UnexpectedNodeKind {
                    node,
                    expected: "an interpolation",
                })
            }
        };
        ctx.ast.node_mut(node).js_node = Some(ident);
        Ok(())
    })))
}

/// `h(tag, child)` for a single child, `h(tag, [children...])` otherwise.
pub fn transform_element(node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult {
    if !ctx.ast.node(node).is_element() {
        return Ok(None);
    }
    Ok(Some(exit_fn(move |ctx| {
        let tag = ctx
            .ast
            .tag_of(node)
            .ok_or(TransformError::UnexpectedNodeKind {
                node,
                expected: "an element",
            })?
            .to_string();
        let mut children = children_js(ctx.ast, node)?;
        let children_arg = if children.len() == 1 {
            children.remove(0)
        } else {
            array_expression(children)
        };
        let call = call_expression(
            ctx.options.helper_name.as_str(),
            vec![string_literal(tag), children_arg],
        );
        ctx.ast.node_mut(node).js_node = Some(call);
        Ok(())
    })))
}

/// Wrap the root's single child in the render function. Any other number
/// of root children is returned as an array.
pub fn transform_root(node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult {
    if !matches!(ctx.ast.node(node).kind, NodeKind::Root) {
        return Ok(None);
    }
    Ok(Some(exit_fn(move |ctx| {
        let mut children = children_js(ctx.ast, node)?;
        let value = if children.len() == 1 {
            children.remove(0)
        } else {
            warn!(
                target: "template.transform",
                "template has {} root nodes, returning an array",
                children.len()
            );
            array_expression(children)
        };
        let render = function_decl(
            ctx.options.function_name.as_str(),
            Vec::new(),
            vec![return_statement(value)],
        );
        ctx.ast.node_mut(node).js_node = Some(render);
        Ok(())
    })))
}
