//! Template Compiler
//!
//! Compiles HTML-style templates with `{{ }}` interpolation into a render
//! function. The pipeline is tokenize → parse → transform → generate:
//!
//! - [`ml_parser`] turns source text into a [`TemplateAst`];
//! - [`transform`] rewrites the tree and attaches generated code to it;
//! - [`output`] extracts the render function and emits JavaScript.
//!
//! [`compile`] runs every stage with the default transforms.

pub mod chars;
pub mod compiler;
pub mod config;
pub mod error;
pub mod parse_util;

pub mod ml_parser;
pub mod output;
pub mod transform;

// Re-exports
pub use compiler::{compile, CompileResult};
pub use config::{CompileOptions, WhitespaceStrategy};
pub use error::{CompileError, ConfigError, TransformError};
pub use ml_parser::ast::{NodeId, TemplateAst};
pub use output::output_ast::JsNode;
pub use parse_util::{ParseError, ParseErrorKind, ParseErrorLevel};
