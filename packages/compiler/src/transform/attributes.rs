//! Attribute name checks
//!
//! Names containing characters that would break out of an attribute when
//! the markup is rendered back to a string are reported as warnings.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{TransformContext, TransformResult};
use crate::ml_parser::ast::NodeId;
use crate::parse_util::{ParseError, ParseErrorKind, ParseSourceSpan};

static UNSAFE_ATTR_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[>/=\"'\u{0009}\u{000a}\u{000c}\u{0020}]").unwrap());

pub fn is_safe_attr_name(name: &str) -> bool {
    !UNSAFE_ATTR_NAME_RE.is_match(name)
}

pub fn check_attribute_names(node: NodeId, ctx: &mut TransformContext<'_>) -> TransformResult {
    let Some(element) = ctx.ast.node(node).as_element() else {
        return Ok(None);
    };
    let unsafe_names: Vec<(String, ParseSourceSpan)> = element
        .attributes
        .iter()
        .filter(|attr| !is_safe_attr_name(&attr.name))
        .map(|attr| (attr.name.clone(), attr.source_span.unwrap_or_default()))
        .collect();

    for (name, span) in unsafe_names {
        ctx.report(ParseError::warning(
            ParseErrorKind::UnsafeAttributeName { name },
            span,
        ));
    }
    Ok(None)
}
