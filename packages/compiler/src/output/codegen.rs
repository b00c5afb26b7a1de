//! Render function extraction
//!
//! After the code-generation transforms have run, the root node carries the
//! complete render function. [`generate`] hands it out; [`generate_source`]
//! additionally renders it as JavaScript.

use log::debug;

use super::abstract_js_emitter::emit_js;
use super::output_ast::JsNode;
use crate::error::{CompileError, Result};
use crate::ml_parser::ast::TemplateAst;

pub fn generate(ast: &TemplateAst) -> Result<JsNode> {
    match &ast.node(ast.root()).js_node {
        Some(node @ JsNode::FunctionDecl(_)) => Ok(node.clone()),
        _ => Err(CompileError::MissingRenderFunction),
    }
}

pub fn generate_source(ast: &TemplateAst) -> Result<String> {
    let render = generate(ast)?;
    let code = emit_js(&render);
    debug!(target: "template.codegen", "emitted {} bytes", code.len());
    Ok(code)
}
