//! ML Parser
//!
//! Recursive-descent parser driving a cursor directly over the template
//! source. Which constructs are recognised depends on the current
//! [`TextMode`], selected from the content model of the enclosing element.
//! Open elements are tracked on an ancestor stack of [`NodeId`]s.

use log::{debug, warn};

use super::ast::{Attribute, Element, Node, NodeId, NodeKind, TemplateAst};
use super::entities::decode_html;
use super::tags::{get_content_type, TextMode};
use crate::chars;
use crate::parse_util::{ParseError, ParseErrorKind, ParseLocation, ParseSourceSpan};

/// Parse tree result
#[derive(Debug, Clone)]
pub struct ParseTreeResult {
    pub ast: TemplateAst,
    pub errors: Vec<ParseError>,
}

impl ParseTreeResult {
    pub fn new(ast: TemplateAst, errors: Vec<ParseError>) -> Self {
        ParseTreeResult { ast, errors }
    }
}

/// Elements nested deeper than this keep their content as text.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Parse a template into its tree. Structural problems are reported in
/// [`ParseTreeResult::errors`]; parsing itself never fails.
pub fn parse(source: &str) -> ParseTreeResult {
    Parser::new(source).parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagType {
    Start,
    End,
}

pub struct Parser<'a> {
    /// Unconsumed remainder of the template
    source: &'a str,
    location: ParseLocation,
    mode: TextMode,
    ast: TemplateAst,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str) -> Self {
        Parser {
            source,
            location: ParseLocation::default(),
            mode: TextMode::Data,
            ast: TemplateAst::new(),
            errors: Vec::new(),
        }
    }

    pub fn parse(mut self) -> ParseTreeResult {
        let mut ancestors = Vec::new();
        let children = self.parse_children(&mut ancestors);

        let root = self.ast.root();
        let end = self.location;
        let root_node = self.ast.node_mut(root);
        root_node.children = children;
        root_node.source_span = Some(ParseSourceSpan::new(ParseLocation::default(), end));

        debug!(
            target: "template.parser",
            "parsed {} nodes with {} errors",
            self.ast.len(),
            self.errors.len()
        );
        ParseTreeResult::new(self.ast, self.errors)
    }

    fn advance_by(&mut self, len: usize) {
        let (consumed, rest) = self.source.split_at(len);
        self.location.advance_over(consumed);
        self.source = rest;
    }

    fn advance_spaces(&mut self) {
        let len = self
            .source
            .find(|c: char| !chars::is_whitespace(c))
            .unwrap_or(self.source.len());
        self.advance_by(len);
    }

    fn span_from(&self, start: ParseLocation) -> ParseSourceSpan {
        ParseSourceSpan::new(start, self.location)
    }

    fn report(&mut self, kind: ParseErrorKind, span: ParseSourceSpan) {
        warn!(target: "template.parser", "{}: {}", span.start, kind);
        self.errors.push(ParseError::new(kind, span));
    }

    fn parse_children(&mut self, ancestors: &mut Vec<NodeId>) -> Vec<NodeId> {
        let mut nodes = Vec::new();

        while !self.is_end(ancestors) {
            let source = self.source;
            if self.mode == TextMode::Data {
                if source.starts_with("<!--") {
                    let node = self.parse_comment();
                    self.push_node(&mut nodes, node);
                    continue;
                }
                if source.starts_with("<![CDATA[") {
                    for node in self.parse_cdata(ancestors) {
                        self.push_node(&mut nodes, node);
                    }
                    continue;
                }
                if source.starts_with("</") && starts_with_letter(&source[2..]) {
                    // `is_end` did not match it against any open element
                    self.parse_unmatched_close_tag();
                    continue;
                }
                if source.starts_with(chars::LT) && starts_with_letter(&source[1..]) {
                    let node = self.parse_element(ancestors);
                    self.push_node(&mut nodes, node);
                    continue;
                }
                if source.starts_with("{{") {
                    let node = self.parse_interpolation();
                    self.push_node(&mut nodes, node);
                    continue;
                }
            }
            let node = self.parse_text();
            self.push_node(&mut nodes, node);
        }

        nodes
    }

    /// Append `node`, folding it into a preceding text node when both are text.
    fn push_node(&mut self, nodes: &mut Vec<NodeId>, node: NodeId) {
        if let Some(&prev) = nodes.last() {
            if self.ast.node(prev).is_text() {
                if let NodeKind::Text(text) = &self.ast.node(node).kind {
                    let content = text.content.clone();
                    let end = self.ast.node(node).source_span.map(|s| s.end);
                    let prev_node = self.ast.node_mut(prev);
                    if let NodeKind::Text(prev_text) = &mut prev_node.kind {
                        prev_text.content.push_str(&content);
                    }
                    if let (Some(span), Some(end)) = (prev_node.source_span.as_mut(), end) {
                        span.end = end;
                    }
                    return;
                }
            }
        }
        nodes.push(node);
    }

    fn is_end(&self, ancestors: &[NodeId]) -> bool {
        if self.source.is_empty() {
            return true;
        }
        match self.mode {
            TextMode::Data => ancestors.iter().rev().any(|&id| self.at_close_tag_of(id)),
            TextMode::RcData | TextMode::RawText => {
                ancestors.last().map_or(false, |&id| self.at_close_tag_of(id))
            }
            TextMode::CData => self.source.starts_with("]]>"),
        }
    }

    fn at_close_tag_of(&self, id: NodeId) -> bool {
        self.ast
            .tag_of(id)
            .map_or(false, |tag| starts_with_close_tag(self.source, tag))
    }

    fn parse_element(&mut self, ancestors: &mut Vec<NodeId>) -> NodeId {
        let start = self.location;
        let element = self.parse_tag(TagType::Start);
        let self_closing = element.self_closing;
        let tag = element.tag.clone();
        let id = self
            .ast
            .alloc(Node::new(NodeKind::Element(element)).with_span(self.span_from(start)));
        if self_closing {
            return id;
        }

        let children = if ancestors.len() >= MAX_NESTING_DEPTH {
            let span = self.span_from(start);
            self.report(
                ParseErrorKind::NestingTooDeep {
                    tag: tag.clone(),
                    limit: MAX_NESTING_DEPTH,
                },
                span,
            );
            self.parse_unnested_content(&tag).into_iter().collect()
        } else {
            let parent_mode = self.mode;
            self.mode = TextMode::from(get_content_type(&tag));

            ancestors.push(id);
            let children = self.parse_children(ancestors);
            ancestors.pop();
            self.mode = parent_mode;
            children
        };
        self.ast.node_mut(id).children = children;

        if starts_with_close_tag(self.source, &tag) {
            self.parse_tag(TagType::End);
        } else {
            let span = self.span_from(start);
            self.report(ParseErrorKind::MissingClosingTag { tag }, span);
        }

        let span = self.span_from(start);
        self.ast.node_mut(id).source_span = Some(span);
        id
    }

    /// Content of an element past the nesting limit: everything up to its
    /// balanced close tag, kept verbatim as a single text node.
    fn parse_unnested_content(&mut self, tag: &str) -> Option<NodeId> {
        let start = self.location;
        let source = self.source;
        let end = find_balanced_close(source, tag).unwrap_or(source.len());
        if end == 0 {
            return None;
        }
        self.advance_by(end);
        let text = Node::new(NodeKind::text(&source[..end])).with_span(self.span_from(start));
        Some(self.ast.alloc(text))
    }

    /// Parse `<name attrs>` or `</name>`. The caller guarantees the source
    /// starts with `<` (or `</`) followed by an ASCII letter.
    fn parse_tag(&mut self, tag_type: TagType) -> Element {
        let start = self.location;
        self.advance_by(if tag_type == TagType::Start { 1 } else { 2 });
        let name_len = self
            .source
            .find(chars::is_name_end)
            .unwrap_or(self.source.len());
        let tag = self.source[..name_len].to_string();
        self.advance_by(name_len);
        self.advance_spaces();

        let attributes = self.parse_attributes();

        let self_closing = self.source.starts_with("/>");
        if self_closing {
            self.advance_by(2);
        } else if self.source.starts_with(chars::GT) {
            self.advance_by(1);
        } else {
            let span = self.span_from(start);
            self.report(ParseErrorKind::EofInTag { tag: tag.clone() }, span);
        }

        Element {
            tag,
            attributes,
            self_closing: self_closing && tag_type == TagType::Start,
        }
    }

    fn parse_unmatched_close_tag(&mut self) {
        let start = self.location;
        let element = self.parse_tag(TagType::End);
        let span = self.span_from(start);
        self.report(ParseErrorKind::UnmatchedClosingTag { tag: element.tag }, span);
    }

    fn parse_attributes(&mut self) -> Vec<Attribute> {
        let mut attributes = Vec::new();

        while !self.source.is_empty()
            && !self.source.starts_with(chars::GT)
            && !self.source.starts_with("/>")
        {
            let start = self.location;
            let name_len = attribute_name_len(self.source);
            if name_len == 0 {
                // Stray `/` that does not close the tag
                self.advance_by(1);
                self.advance_spaces();
                continue;
            }
            let name = self.source[..name_len].to_string();
            self.advance_by(name_len);
            self.advance_spaces();

            let mut value = String::new();
            if self.source.starts_with(chars::EQ) {
                self.advance_by(1);
                self.advance_spaces();
                value = self.parse_attribute_value(&name, start);
            }
            self.advance_spaces();

            attributes.push(Attribute {
                name,
                value,
                source_span: Some(self.span_from(start)),
            });
        }

        attributes
    }

    fn parse_attribute_value(&mut self, name: &str, start: ParseLocation) -> String {
        let raw = match self.source.chars().next() {
            Some(quote) if chars::is_quote(quote) => {
                self.advance_by(1);
                match self.source.find(quote) {
                    Some(end) => {
                        let raw = &self.source[..end];
                        self.advance_by(end + 1);
                        raw
                    }
                    None => {
                        let raw = self.source;
                        self.advance_by(raw.len());
                        let span = self.span_from(start);
                        self.report(
                            ParseErrorKind::UnterminatedAttributeValue {
                                name: name.to_string(),
                            },
                            span,
                        );
                        raw
                    }
                }
            }
            _ => {
                let end = self
                    .source
                    .find(chars::is_unquoted_value_end)
                    .unwrap_or(self.source.len());
                let raw = &self.source[..end];
                self.advance_by(end);
                raw
            }
        };
        decode_html(raw, true).into_owned()
    }

    fn parse_text(&mut self) -> NodeId {
        let start = self.location;
        let source = self.source;
        let end = match self.mode {
            TextMode::CData => source.find("]]>").unwrap_or(source.len()),
            mode => {
                // Start after the first char so a `<` that opens nothing still
                // makes progress as text
                let first = source.chars().next().map_or(0, char::len_utf8);
                let mut end = source.len();
                let mut delimiters = vec!["<"];
                if mode == TextMode::Data {
                    delimiters.push("{{");
                }
                for delimiter in delimiters {
                    if let Some(index) = source[first..].find(delimiter) {
                        end = end.min(first + index);
                    }
                }
                end
            }
        };

        let raw = &source[..end];
        self.advance_by(end);
        let content = if self.mode.decodes_entities() {
            decode_html(raw, false).into_owned()
        } else {
            raw.to_string()
        };
        self.ast
            .alloc(Node::new(NodeKind::text(content)).with_span(self.span_from(start)))
    }

    fn parse_interpolation(&mut self) -> NodeId {
        let start = self.location;
        self.advance_by(2);
        let expression = match self.source.find("}}") {
            Some(end) => {
                let expression = self.source[..end].to_string();
                self.advance_by(end + 2);
                expression
            }
            None => {
                let expression = self.source.to_string();
                self.advance_by(expression.len());
                let span = self.span_from(start);
                self.report(ParseErrorKind::UnterminatedInterpolation, span);
                expression
            }
        };
        self.ast.alloc(
            Node::new(NodeKind::interpolation(expression)).with_span(self.span_from(start)),
        )
    }

    fn parse_comment(&mut self) -> NodeId {
        let start = self.location;
        self.advance_by(4);
        let content = match self.source.find("-->") {
            Some(end) => {
                let content = self.source[..end].to_string();
                self.advance_by(end + 3);
                content
            }
            None => {
                let content = self.source.to_string();
                self.advance_by(content.len());
                let span = self.span_from(start);
                self.report(ParseErrorKind::UnterminatedComment, span);
                content
            }
        };
        self.ast
            .alloc(Node::new(NodeKind::comment(content)).with_span(self.span_from(start)))
    }

    /// Parse `<![CDATA[ ... ]]>`; its content becomes text spliced into the
    /// enclosing children.
    fn parse_cdata(&mut self, ancestors: &mut Vec<NodeId>) -> Vec<NodeId> {
        let start = self.location;
        self.advance_by(9);

        let parent_mode = self.mode;
        self.mode = TextMode::CData;
        let nodes = self.parse_children(ancestors);
        self.mode = parent_mode;

        if self.source.starts_with("]]>") {
            self.advance_by(3);
        } else {
            let span = self.span_from(start);
            self.report(ParseErrorKind::UnterminatedCdata, span);
        }
        nodes
    }
}

fn starts_with_letter(s: &str) -> bool {
    s.chars().next().map_or(false, chars::is_ascii_letter)
}

/// `</tag` (ASCII case-insensitive) followed by whitespace, `/`, `>` or the
/// end of input.
fn starts_with_close_tag(source: &str, tag: &str) -> bool {
    let Some(rest) = source.strip_prefix("</") else {
        return false;
    };
    match rest.get(..tag.len()) {
        Some(name) if name.eq_ignore_ascii_case(tag) => rest[tag.len()..]
            .chars()
            .next()
            .map_or(true, chars::is_name_end),
        _ => false,
    }
}

/// `<tag` (ASCII case-insensitive) followed by a name terminator or the end
/// of input.
fn starts_with_open_tag(source: &str, tag: &str) -> bool {
    let Some(rest) = source.strip_prefix(chars::LT) else {
        return false;
    };
    match rest.get(..tag.len()) {
        Some(name) if name.eq_ignore_ascii_case(tag) => rest[tag.len()..]
            .chars()
            .next()
            .map_or(true, chars::is_name_end),
        _ => false,
    }
}

/// Offset of the close tag for `tag` that balances the opening already
/// consumed, skipping nested elements of the same name.
fn find_balanced_close(source: &str, tag: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut pos = 0;
    while let Some(offset) = source[pos..].find(chars::LT) {
        let at = pos + offset;
        let rest = &source[at..];
        if starts_with_close_tag(rest, tag) {
            if depth == 0 {
                return Some(at);
            }
            depth -= 1;
        } else if starts_with_open_tag(rest, tag) {
            let self_closing = rest
                .find(chars::GT)
                .map_or(false, |gt| rest[..gt].ends_with(chars::SLASH));
            if !self_closing {
                depth += 1;
            }
        }
        pos = at + 1;
    }
    None
}

/// Length of the attribute name at the start of `source`, zero if none.
/// The first character may be `=`; later ones may not.
fn attribute_name_len(source: &str) -> usize {
    let mut chars_iter = source.char_indices();
    match chars_iter.next() {
        Some((_, first)) if !chars::is_name_end(first) => chars_iter
            .find(|&(_, c)| chars::is_attr_name_end(c))
            .map_or(source.len(), |(i, _)| i),
        _ => 0,
    }
}
