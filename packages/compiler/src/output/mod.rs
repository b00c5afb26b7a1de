//! Output Module
//!
//! Output AST, the render function extraction and the JavaScript emitter.

pub mod abstract_emitter;
pub mod abstract_js_emitter;
pub mod codegen;
pub mod output_ast;

pub use abstract_js_emitter::emit_js;
pub use codegen::{generate, generate_source};
pub use output_ast::JsNode;
