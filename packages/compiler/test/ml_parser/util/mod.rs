#![allow(dead_code)]

/**
 * ML Parser Test Utilities
 *
 * Helpers turning trees, tokens and diagnostics into nested string vectors
 * so tests can compare them with plain literals.
 */
use template_compiler::ml_parser::ast::*;
use template_compiler::ml_parser::parser::ParseTreeResult;
use template_compiler::ml_parser::tokens::Token;
use template_compiler::parse_util::{ParseError, ParseLocation};

/// Build a row from string slices
pub fn row(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|p| p.to_string()).collect()
}

pub fn rows(parts: &[&[&str]]) -> Vec<Vec<String>> {
    parts.iter().map(|r| row(r)).collect()
}

struct Humanizer {
    depth: usize,
    result: Vec<Vec<String>>,
}

impl Humanizer {
    fn push(&mut self, kind: &str, value: &str) {
        self.result
            .push(vec![kind.to_string(), value.to_string(), self.depth.to_string()]);
    }
}

impl Visitor for Humanizer {
    fn visit_element(&mut self, ast: &TemplateAst, id: NodeId, element: &Element) {
        self.push("Element", &element.tag);
        for attr in &element.attributes {
            self.result
                .push(vec!["Attribute".to_string(), attr.name.clone(), attr.value.clone()]);
        }
        self.depth += 1;
        self.visit_children(ast, id);
        self.depth -= 1;
    }

    fn visit_text(&mut self, _ast: &TemplateAst, _id: NodeId, text: &Text) {
        self.push("Text", &text.content);
    }

    fn visit_comment(&mut self, _ast: &TemplateAst, _id: NodeId, comment: &Comment) {
        self.push("Comment", &comment.content);
    }

    fn visit_interpolation(&mut self, _ast: &TemplateAst, _id: NodeId, interpolation: &Interpolation) {
        self.push("Interpolation", &interpolation.expression);
    }
}

/// `[kind, name-or-content, depth]` per node; attributes as
/// `[Attribute, name, value]` right after their element.
pub fn humanize_ast(ast: &TemplateAst) -> Vec<Vec<String>> {
    let mut humanizer = Humanizer {
        depth: 0,
        result: Vec::new(),
    };
    humanizer.visit_node(ast, ast.root());
    humanizer.result
}

pub fn humanize_dom(result: &ParseTreeResult) -> Vec<Vec<String>> {
    humanize_ast(&result.ast)
}

pub fn humanize_line_column(location: &ParseLocation) -> String {
    format!("{}:{}", location.line, location.col)
}

/// `[message, line:col]` per diagnostic
pub fn humanize_errors(errors: &[ParseError]) -> Vec<Vec<String>> {
    errors
        .iter()
        .map(|e| vec![e.msg(), humanize_line_column(&e.span.start)])
        .collect()
}

/// `[TOKEN_TYPE, value]` per token, plus `name=value` entries for attributes
pub fn humanize_parts(tokens: &[Token]) -> Vec<Vec<String>> {
    tokens
        .iter()
        .map(|token| {
            let mut parts = vec![to_screaming_snake_case(&format!("{:?}", token.token_type()))];
            parts.push(token.value().to_string());
            if let Token::TagOpen {
                attributes,
                self_closing,
                ..
            } = token
            {
                parts.extend(attributes.iter().map(|a| format!("{}={}", a.name, a.value)));
                if *self_closing {
                    parts.push("/".to_string());
                }
            }
            parts
        })
        .collect()
}

fn to_screaming_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() && i > 0 {
            result.push('_');
        }
        result.push(c.to_ascii_uppercase());
    }
    result
}
