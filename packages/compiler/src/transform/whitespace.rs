//! Whitespace condensing
//!
//! Text nodes are rewritten using the following rules:
//! - consider spaces, tabs, form feeds and new lines as whitespace characters;
//! - drop whitespace-only text at the start or end of its parent, next to a
//!   comment, or between two elements when it contains a new line;
//! - any other whitespace-only text becomes a single space;
//! - for all other text nodes replace consecutive whitespace characters with one space.
//!
//! Text inside `pre`, `textarea` and raw-text elements is left untouched.

use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;

use super::{TransformContext, TransformResult};
use crate::config::WhitespaceStrategy;
use crate::ml_parser::ast::{NodeId, NodeKind, TemplateAst};
use crate::ml_parser::tags::is_whitespace_sensitive;

static NO_WS_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\t\r\n\x0C ]").unwrap());

static WS_REPLACE_REGEXP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\t\r\n\x0C ]+").unwrap());

enum Rewrite {
    Keep,
    Remove,
    Replace(String),
}

pub fn condense_whitespace(node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult {
    if ctx.options.whitespace == WhitespaceStrategy::Preserve {
        return Ok(None);
    }
    let Some(text) = ctx.ast.node(node).as_text() else {
        return Ok(None);
    };
    let Some(parent) = ctx.parent else {
        return Ok(None);
    };
    if in_whitespace_sensitive_element(ctx.ast, &ctx.ancestors) {
        return Ok(None);
    }

    let rewrite = if NO_WS_REGEXP.is_match(&text.content) {
        match process_whitespace(&text.content) {
            Cow::Owned(condensed) if condensed != text.content => Rewrite::Replace(condensed),
            _ => Rewrite::Keep,
        }
    } else if should_drop_blank(ctx.ast, parent, ctx.child_index, &text.content) {
        Rewrite::Remove
    } else if text.content != " " {
        Rewrite::Replace(" ".to_string())
    } else {
        Rewrite::Keep
    };

    match rewrite {
        Rewrite::Keep => {}
        Rewrite::Remove => ctx.remove_node()?,
        Rewrite::Replace(content) => {
            if let NodeKind::Text(text) = &mut ctx.ast.node_mut(node).kind {
                text.content = content;
            }
        }
    }
    Ok(None)
}

fn in_whitespace_sensitive_element(ast: &TemplateAst, ancestors: &[NodeId]) -> bool {
    ancestors
        .iter()
        .filter_map(|&id| ast.tag_of(id))
        .any(is_whitespace_sensitive)
}

fn should_drop_blank(ast: &TemplateAst, parent: NodeId, index: usize, content: &str) -> bool {
    let siblings = ast.children(parent);
    let prev = index
        .checked_sub(1)
        .and_then(|i| siblings.get(i))
        .map(|&id| ast.node(id));
    let next = siblings.get(index + 1).map(|&id| ast.node(id));

    match (prev, next) {
        (Some(prev), Some(next)) => {
            prev.is_comment()
                || next.is_comment()
                || (prev.is_element() && next.is_element() && content.contains('\n'))
        }
        _ => true,
    }
}

fn process_whitespace(text: &str) -> Cow<'_, str> {
    WS_REPLACE_REGEXP.replace_all(text, " ")
}
