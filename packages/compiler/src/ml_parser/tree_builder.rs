//! Token tree builder
//!
//! Builds a [`TemplateAst`] from a token sequence using an explicit stack of
//! open elements. Unlike the structural parser it has no notion of content
//! modes: whatever the tokenizer produced is taken at face value.

use log::warn;

use super::ast::{Attribute, Element, Node, NodeId, NodeKind, TemplateAst};
use super::lexer::{tokenize_with_options, TokenizeOptions};
use super::parser::{ParseTreeResult, MAX_NESTING_DEPTH};
use super::tokens::Token;
use crate::parse_util::{ParseError, ParseErrorKind, ParseSourceSpan};

/// Tokenize `source` and build its tree
pub fn parse_tokens(source: &str, options: TokenizeOptions) -> ParseTreeResult {
    let tokenized = tokenize_with_options(source, options);
    let mut result = build_tree(tokenized.tokens);
    let mut errors = tokenized.errors;
    errors.append(&mut result.errors);
    result.errors = errors;
    result
}

pub fn build_tree(tokens: Vec<Token>) -> ParseTreeResult {
    let mut builder = TreeBuilder::new();
    for token in tokens {
        builder.consume(token);
    }
    builder.finish()
}

struct TreeBuilder {
    ast: TemplateAst,
    /// Open elements; the root is always at the bottom
    stack: Vec<NodeId>,
    /// Tags opened past the nesting limit; their content goes to the
    /// deepest open element
    flattened: Vec<String>,
    errors: Vec<ParseError>,
}

impl TreeBuilder {
    fn new() -> Self {
        let ast = TemplateAst::new();
        let root = ast.root();
        TreeBuilder {
            ast,
            stack: vec![root],
            flattened: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn parent(&self) -> NodeId {
        self.stack.last().copied().unwrap_or_else(|| self.ast.root())
    }

    fn add_to_parent(&mut self, node: Node) -> NodeId {
        let parent = self.parent();
        let id = self.ast.alloc(node);
        self.ast.append_child(parent, id);
        id
    }

    fn report(&mut self, kind: ParseErrorKind, span: ParseSourceSpan) {
        warn!(target: "template.parser", "{}: {}", span.start, kind);
        self.errors.push(ParseError::new(kind, span));
    }

    fn consume(&mut self, token: Token) {
        match token {
            Token::TagOpen {
                name,
                attributes,
                self_closing,
                source_span,
            } => {
                let attributes = attributes
                    .into_iter()
                    .map(|a| Attribute {
                        name: a.name,
                        value: a.value,
                        source_span: Some(a.source_span),
                    })
                    .collect();
                let too_deep = !self_closing && self.stack.len() > MAX_NESTING_DEPTH;
                if too_deep {
                    if self.flattened.is_empty() {
                        self.report(
                            ParseErrorKind::NestingTooDeep {
                                tag: name.clone(),
                                limit: MAX_NESTING_DEPTH,
                            },
                            source_span,
                        );
                    }
                    self.flattened.push(name.clone());
                }
                let element = Element {
                    tag: name,
                    attributes,
                    self_closing,
                };
                let id = self.add_to_parent(Node::new(NodeKind::Element(element)).with_span(source_span));
                if !self_closing && !too_deep {
                    self.stack.push(id);
                }
            }
            Token::TagClose { name, source_span } => self.close_element(&name, source_span),
            Token::Text {
                content,
                source_span,
            } => self.add_text(content, source_span),
            Token::Comment {
                content,
                source_span,
            } => {
                self.add_to_parent(Node::new(NodeKind::comment(content)).with_span(source_span));
            }
            Token::Interpolation {
                content,
                source_span,
            } => {
                self.add_to_parent(
                    Node::new(NodeKind::interpolation(content)).with_span(source_span),
                );
            }
        }
    }

    fn add_text(&mut self, content: String, source_span: ParseSourceSpan) {
        let parent = self.parent();
        if let Some(&last) = self.ast.children(parent).last() {
            let node = self.ast.node_mut(last);
            if let NodeKind::Text(text) = &mut node.kind {
                text.content.push_str(&content);
                if let Some(span) = node.source_span.as_mut() {
                    span.end = source_span.end;
                }
                return;
            }
        }
        self.add_to_parent(Node::new(NodeKind::text(content)).with_span(source_span));
    }

    fn close_element(&mut self, name: &str, source_span: ParseSourceSpan) {
        if self
            .flattened
            .last()
            .map_or(false, |tag| tag.eq_ignore_ascii_case(name))
        {
            self.flattened.pop();
            return;
        }
        let matching = self
            .stack
            .iter()
            .skip(1)
            .rposition(|&id| {
                self.ast
                    .tag_of(id)
                    .map_or(false, |tag| tag.eq_ignore_ascii_case(name))
            })
            .map(|pos| pos + 1);

        let Some(pos) = matching else {
            self.report(
                ParseErrorKind::UnmatchedClosingTag {
                    tag: name.to_string(),
                },
                source_span,
            );
            return;
        };

        for unclosed in self.stack.split_off(pos + 1) {
            self.report_unclosed(unclosed);
        }
        if let Some(id) = self.stack.pop() {
            if let Some(span) = self.ast.node_mut(id).source_span.as_mut() {
                span.end = source_span.end;
            }
        }
    }

    fn report_unclosed(&mut self, id: NodeId) {
        let tag = self.ast.tag_of(id).unwrap_or_default().to_string();
        let span = self.ast.node(id).source_span.unwrap_or_default();
        self.report(ParseErrorKind::MissingClosingTag { tag }, span);
    }

    fn finish(mut self) -> ParseTreeResult {
        let open = self.stack.split_off(1);
        for unclosed in open {
            self.report_unclosed(unclosed);
        }
        ParseTreeResult::new(self.ast, self.errors)
    }
}
