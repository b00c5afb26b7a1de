//! JavaScript Emitter Module
//!
//! Renders the output AST as JavaScript source. The mapping is structural:
//! string literals in single quotes, arrays in brackets, calls as
//! `callee(args)`, and function bodies indented by two spaces.

use crate::output::abstract_emitter::{escape_identifier, EmitterVisitorContext};
use crate::output::output_ast as o;

/// Emit `node` as JavaScript source.
pub fn emit_js(node: &o::JsNode) -> String {
    let mut visitor = JsEmitterVisitor::new();
    node.visit(&mut visitor);
    visitor.ctx.to_source()
}

pub struct JsEmitterVisitor {
    ctx: EmitterVisitorContext,
}

impl Default for JsEmitterVisitor {
    fn default() -> Self {
        JsEmitterVisitor::new()
    }
}

impl JsEmitterVisitor {
    pub fn new() -> Self {
        JsEmitterVisitor {
            ctx: EmitterVisitorContext::create_root(),
        }
    }

    pub fn into_source(self) -> String {
        self.ctx.to_source()
    }

    fn visit_params(&mut self, params: &[o::Identifier]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.ctx.print(", ", false);
            }
            self.ctx.print(&param.name, false);
        }
    }

    fn visit_all_expressions(&mut self, expressions: &[o::JsNode], separator: &str) {
        for (i, expr) in expressions.iter().enumerate() {
            if i > 0 {
                self.ctx.print(separator, false);
            }
            expr.visit(self);
        }
    }
}

impl o::JsVisitor for JsEmitterVisitor {
    type Output = ();

    fn visit_function_decl(&mut self, decl: &o::FunctionDecl) {
        self.ctx.print(&format!("function {}(", decl.id.name), false);
        self.visit_params(&decl.params);
        self.ctx.println(") {");
        self.ctx.inc_indent();
        for stmt in &decl.body {
            stmt.visit(self);
            if !self.ctx.line_is_empty() {
                self.ctx.println(";");
            }
        }
        self.ctx.dec_indent();
        self.ctx.print("}", false);
    }

    fn visit_identifier(&mut self, ident: &o::Identifier) {
        self.ctx.print(&ident.name, false);
    }

    fn visit_string_literal(&mut self, lit: &o::StringLiteral) {
        self.ctx.print(&escape_identifier(&lit.value, true), false);
    }

    fn visit_array_expression(&mut self, array: &o::ArrayExpression) {
        self.ctx.print("[", false);
        self.visit_all_expressions(&array.elements, ", ");
        self.ctx.print("]", false);
    }

    fn visit_call_expression(&mut self, call: &o::CallExpression) {
        self.ctx.print(&call.callee.name, false);
        self.ctx.print("(", false);
        self.visit_all_expressions(&call.arguments, ", ");
        self.ctx.print(")", false);
    }

    fn visit_return_statement(&mut self, stmt: &o::ReturnStatement) {
        self.ctx.print("return ", false);
        stmt.argument.visit(self);
        self.ctx.println(";");
    }
}
