//! Compiler Main Module
//!
//! Runs the full pipeline: parse, transform, generate and emit.

use log::debug;

use crate::config::CompileOptions;
use crate::error::Result;
use crate::ml_parser::ast::TemplateAst;
use crate::ml_parser::parser::{parse, ParseTreeResult};
use crate::output::abstract_js_emitter::emit_js;
use crate::output::codegen::generate;
use crate::output::output_ast::JsNode;
use crate::parse_util::ParseError;
use crate::transform::{default_transforms, transform};

#[derive(Debug, Clone)]
pub struct CompileResult {
    /// Transformed template tree, with generated code attached
    pub ast: TemplateAst,
    /// The render function declaration
    pub render: JsNode,
    /// `render` as JavaScript source
    pub code: String,
    /// Parse and transform diagnostics, in the order they were found
    pub diagnostics: Vec<ParseError>,
}

/// Compile a template into a render function.
///
/// Structural problems in the template never fail compilation; they are
/// returned in [`CompileResult::diagnostics`] alongside a best-effort result.
/// Options naming something other than an identifier are rejected up front.
pub fn compile(source: &str, options: &CompileOptions) -> Result<CompileResult> {
    options.validate()?;

    let ParseTreeResult { mut ast, errors } = parse(source);
    let mut diagnostics = errors;

    let transforms = default_transforms();
    diagnostics.extend(transform(&mut ast, &transforms, options)?);

    let render = generate(&ast)?;
    let code = emit_js(&render);
    debug!(
        target: "template.compiler",
        "compiled template ({} bytes) with {} diagnostics",
        source.len(),
        diagnostics.len()
    );

    Ok(CompileResult {
        ast,
        render,
        code,
        diagnostics,
    })
}
