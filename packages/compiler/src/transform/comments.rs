//! Comment stripping
//!
//! Comments carry no runtime meaning in the generated render function and
//! are removed before code generation.

use super::{TransformContext, TransformResult};
use crate::ml_parser::ast::NodeId;

pub fn remove_comments(node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult {
    if ctx.ast.node(node).is_comment() {
        ctx.remove_node()?;
    }
    Ok(None)
}
