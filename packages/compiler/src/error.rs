//! Compiler errors
//!
//! Structural problems in a template are reported as [`ParseError`]
//! diagnostics and never abort compilation. The errors here are the fatal
//! ones: the options cannot be emitted, a registered transform broke the
//! single-owner mutation contract of the transform engine, or the pipeline
//! produced no render function.
//!
//! [`ParseError`]: crate::parse_util::ParseError

use thiserror::Error;

use crate::ml_parser::ast::NodeId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransformError {
    #[error("no node is currently being visited")]
    NoCurrentNode,
    #[error("node {node} has no parent to mutate")]
    NoParent { node: NodeId },
    #[error("stale transform context: slot {index} of {parent} does not hold {node}")]
    StaleContext {
        node: NodeId,
        parent: NodeId,
        index: usize,
    },
    #[error("child {node} has no generated code attached")]
    MissingJsNode { node: NodeId },
    #[error("node {node} is not {expected}")]
    UnexpectedNodeKind { node: NodeId, expected: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("option \"{option}\" must be a JavaScript identifier, got {value:?}")]
    InvalidIdentifier { option: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error("the root node has no render function attached")]
    MissingRenderFunction,
}

pub type Result<T, E = CompileError> = std::result::Result<T, E>;
