//! ML Parser Lexer
//!
//! Finite-state tokenizer converting template source into a flat token
//! sequence.
//!
//! The minimal level knows four token shapes: tag open, tag close, text and
//! nothing else. Only ASCII letters are accepted in names and text; any
//! character outside the class a state accepts is consumed and dropped.
//!
//! The extended level (see [`TokenizeOptions::extended`]) accepts the full
//! template grammar: attributes, self-closing tags, comments, `{{ }}`
//! interpolation, CDATA sections and character references.

use log::trace;

use super::entities::decode_html;
use super::tokens::{Token, TokenAttribute};
use crate::chars;
use crate::parse_util::{ParseError, ParseErrorKind, ParseLocation, ParseSourceSpan};

/// Tokenization result
#[derive(Debug, Clone)]
pub struct TokenizeResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<ParseError>,
}

/// Tokenization options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizeOptions {
    /// Recognise attributes, comments, interpolation and CDATA
    pub extended: bool,
    /// Decode character references in text and attribute values
    pub decode_entities: bool,
}

impl TokenizeOptions {
    pub fn minimal() -> Self {
        TokenizeOptions::default()
    }

    pub fn extended() -> Self {
        TokenizeOptions {
            extended: true,
            decode_entities: true,
        }
    }
}

/// Tokenize with the minimal state machine
pub fn tokenize(source: &str) -> TokenizeResult {
    tokenize_with_options(source, TokenizeOptions::minimal())
}

pub fn tokenize_with_options(source: &str, options: TokenizeOptions) -> TokenizeResult {
    let mut tokenizer = Tokenizer::new(source, options);
    tokenizer.tokenize();

    let tokens = if options.extended {
        merge_text_tokens(tokenizer.tokens)
    } else {
        tokenizer.tokens
    };
    TokenizeResult {
        tokens,
        errors: tokenizer.errors,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Initial,
    TagOpen,
    TagName,
    Text,
    TagEnd,
    TagEndName,
    AfterTagEndName,
    BeforeAttributeName,
    AttributeName,
    AfterAttributeName,
    BeforeAttributeValue,
    AttributeValueQuoted(char),
    AttributeValueUnquoted,
    SelfClosingStartTag,
}

struct Tokenizer<'a> {
    source: &'a str,
    pos: usize,
    location: ParseLocation,
    state: State,
    options: TokenizeOptions,
    token_start: ParseLocation,
    buffer: String,
    tag_name: String,
    attributes: Vec<TokenAttribute>,
    attr_name: String,
    attr_start: ParseLocation,
    tokens: Vec<Token>,
    errors: Vec<ParseError>,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str, options: TokenizeOptions) -> Self {
        Tokenizer {
            source,
            pos: 0,
            location: ParseLocation::default(),
            state: State::Initial,
            options,
            token_start: ParseLocation::default(),
            buffer: String::new(),
            tag_name: String::new(),
            attributes: Vec::new(),
            attr_name: String::new(),
            attr_start: ParseLocation::default(),
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            self.advance_by(ch.len_utf8());
        }
    }

    fn advance_by(&mut self, len: usize) {
        let consumed = &self.source[self.pos..self.pos + len];
        self.location.advance_over(consumed);
        self.pos += len;
    }

    fn span_from(&self, start: ParseLocation) -> ParseSourceSpan {
        ParseSourceSpan::new(start, self.location)
    }

    fn is_text_char(&self, ch: char) -> bool {
        self.options.extended || chars::is_ascii_letter(ch)
    }

    fn is_tag_name_char(&self, ch: char) -> bool {
        if self.options.extended {
            !chars::is_name_end(ch)
        } else {
            chars::is_ascii_letter(ch)
        }
    }

    fn tokenize(&mut self) {
        while let Some(ch) = self.peek() {
            self.step(ch);
        }
        self.finish();
    }

    fn step(&mut self, ch: char) {
        let extended = self.options.extended;
        match self.state {
            State::Initial => {
                if ch == chars::LT {
                    self.token_start = self.location;
                    self.state = State::TagOpen;
                    self.advance();
                } else if extended && self.rest().starts_with("{{") {
                    self.consume_interpolation();
                } else if self.is_text_char(ch) {
                    self.token_start = self.location;
                    self.state = State::Text;
                    self.buffer.push(ch);
                    self.advance();
                } else {
                    self.drop_char(ch);
                }
            }
            State::Text => {
                if ch == chars::LT {
                    self.emit_text();
                    self.token_start = self.location;
                    self.state = State::TagOpen;
                    self.advance();
                } else if extended && self.rest().starts_with("{{") {
                    self.emit_text();
                    self.state = State::Initial;
                    self.consume_interpolation();
                } else if self.is_text_char(ch) {
                    self.buffer.push(ch);
                    self.advance();
                } else {
                    self.drop_char(ch);
                }
            }
            State::TagOpen => {
                if chars::is_ascii_letter(ch) {
                    self.tag_name.push(ch);
                    self.state = State::TagName;
                    self.advance();
                } else if ch == chars::SLASH {
                    self.state = State::TagEnd;
                    self.advance();
                } else if extended && self.rest().starts_with("!--") {
                    self.consume_comment();
                } else if extended && self.rest().starts_with("![CDATA[") {
                    self.consume_cdata();
                } else if extended {
                    // A `<` that opens nothing is text; reconsume `ch` as text
                    self.buffer.push(chars::LT);
                    self.state = State::Text;
                } else {
                    self.drop_char(ch);
                }
            }
            State::TagName => {
                if ch == chars::GT {
                    self.advance();
                    self.emit_tag_open(false);
                } else if extended && chars::is_whitespace(ch) {
                    self.state = State::BeforeAttributeName;
                    self.advance();
                } else if extended && ch == chars::SLASH {
                    self.state = State::SelfClosingStartTag;
                    self.advance();
                } else if self.is_tag_name_char(ch) {
                    self.tag_name.push(ch);
                    self.advance();
                } else {
                    self.drop_char(ch);
                }
            }
            State::TagEnd => {
                if chars::is_ascii_letter(ch) {
                    self.tag_name.push(ch);
                    self.state = State::TagEndName;
                    self.advance();
                } else {
                    self.drop_char(ch);
                }
            }
            State::TagEndName => {
                if ch == chars::GT {
                    self.advance();
                    self.emit_tag_close();
                } else if self.is_tag_name_char(ch) {
                    self.tag_name.push(ch);
                    self.advance();
                } else if extended {
                    self.state = State::AfterTagEndName;
                    self.advance();
                } else {
                    self.drop_char(ch);
                }
            }
            State::AfterTagEndName => {
                if ch == chars::GT {
                    self.advance();
                    self.emit_tag_close();
                } else {
                    self.drop_char(ch);
                }
            }
            State::BeforeAttributeName => {
                if chars::is_whitespace(ch) {
                    self.advance();
                } else if ch == chars::GT {
                    self.advance();
                    self.emit_tag_open(false);
                } else if ch == chars::SLASH {
                    self.state = State::SelfClosingStartTag;
                    self.advance();
                } else {
                    self.start_attribute(ch);
                }
            }
            State::AttributeName => {
                if ch == chars::EQ {
                    self.state = State::BeforeAttributeValue;
                    self.advance();
                } else if chars::is_whitespace(ch) {
                    self.state = State::AfterAttributeName;
                    self.advance();
                } else if ch == chars::GT {
                    self.push_attribute();
                    self.advance();
                    self.emit_tag_open(false);
                } else if ch == chars::SLASH {
                    self.push_attribute();
                    self.state = State::SelfClosingStartTag;
                    self.advance();
                } else {
                    self.attr_name.push(ch);
                    self.advance();
                }
            }
            State::AfterAttributeName => {
                if chars::is_whitespace(ch) {
                    self.advance();
                } else if ch == chars::EQ {
                    self.state = State::BeforeAttributeValue;
                    self.advance();
                } else if ch == chars::GT {
                    self.push_attribute();
                    self.advance();
                    self.emit_tag_open(false);
                } else if ch == chars::SLASH {
                    self.push_attribute();
                    self.state = State::SelfClosingStartTag;
                    self.advance();
                } else {
                    self.push_attribute();
                    self.start_attribute(ch);
                }
            }
            State::BeforeAttributeValue => {
                if chars::is_whitespace(ch) {
                    self.advance();
                } else if chars::is_quote(ch) {
                    self.state = State::AttributeValueQuoted(ch);
                    self.advance();
                } else if ch == chars::GT {
                    self.push_attribute();
                    self.advance();
                    self.emit_tag_open(false);
                } else {
                    self.buffer.push(ch);
                    self.state = State::AttributeValueUnquoted;
                    self.advance();
                }
            }
            State::AttributeValueQuoted(quote) => {
                self.advance();
                if ch == quote {
                    self.push_attribute();
                    self.state = State::BeforeAttributeName;
                } else {
                    self.buffer.push(ch);
                }
            }
            State::AttributeValueUnquoted => {
                if chars::is_whitespace(ch) {
                    self.push_attribute();
                    self.state = State::BeforeAttributeName;
                    self.advance();
                } else if ch == chars::GT {
                    self.push_attribute();
                    self.advance();
                    self.emit_tag_open(false);
                } else {
                    self.buffer.push(ch);
                    self.advance();
                }
            }
            State::SelfClosingStartTag => {
                if ch == chars::GT {
                    self.advance();
                    self.emit_tag_open(true);
                } else {
                    // Stray `/` inside a tag; reconsume as attribute input
                    self.state = State::BeforeAttributeName;
                }
            }
        }
    }

    fn finish(&mut self) {
        match self.state {
            State::Initial => {}
            State::Text => self.emit_text(),
            State::TagOpen if self.options.extended => {
                self.buffer.push(chars::LT);
                self.emit_text();
            }
            _ if !self.options.extended => {
                trace!(target: "template.lexer", "discarding unfinished {:?} at end of input", self.state);
            }
            State::AttributeValueQuoted(_) => {
                let name = std::mem::take(&mut self.attr_name);
                let span = self.span_from(self.attr_start);
                self.errors.push(ParseError::new(
                    ParseErrorKind::UnterminatedAttributeValue { name },
                    span,
                ));
            }
            _ => {
                let tag = std::mem::take(&mut self.tag_name);
                let span = self.span_from(self.token_start);
                self.errors
                    .push(ParseError::new(ParseErrorKind::EofInTag { tag }, span));
            }
        }
        self.state = State::Initial;
    }

    fn drop_char(&mut self, ch: char) {
        trace!(target: "template.lexer", "dropping {:?} in state {:?}", ch, self.state);
        self.advance();
    }

    fn start_attribute(&mut self, ch: char) {
        self.attr_start = self.location;
        self.attr_name.push(ch);
        self.state = State::AttributeName;
        self.advance();
    }

    fn push_attribute(&mut self) {
        let name = std::mem::take(&mut self.attr_name);
        let raw = std::mem::take(&mut self.buffer);
        let value = if self.options.decode_entities {
            decode_html(&raw, true).into_owned()
        } else {
            raw
        };
        self.attributes.push(TokenAttribute {
            name,
            value,
            source_span: self.span_from(self.attr_start),
        });
    }

    fn emit_text(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        let raw = std::mem::take(&mut self.buffer);
        let content = if self.options.decode_entities {
            decode_html(&raw, false).into_owned()
        } else {
            raw
        };
        let source_span = self.span_from(self.token_start);
        self.tokens.push(Token::Text {
            content,
            source_span,
        });
    }

    fn emit_tag_open(&mut self, self_closing: bool) {
        let source_span = self.span_from(self.token_start);
        self.tokens.push(Token::TagOpen {
            name: std::mem::take(&mut self.tag_name),
            attributes: std::mem::take(&mut self.attributes),
            self_closing,
            source_span,
        });
        self.state = State::Initial;
    }

    fn emit_tag_close(&mut self) {
        let source_span = self.span_from(self.token_start);
        self.tokens.push(Token::TagClose {
            name: std::mem::take(&mut self.tag_name),
            source_span,
        });
        self.state = State::Initial;
    }

    /// Consume from the current position to `terminator` (or the end of
    /// input) and return the enclosed content plus whether it was closed.
    fn consume_delimited(&mut self, opener_len: usize, terminator: &str) -> (String, bool) {
        self.advance_by(opener_len);
        let rest = self.rest();
        match rest.find(terminator) {
            Some(end) => {
                let content = rest[..end].to_string();
                self.advance_by(end + terminator.len());
                (content, true)
            }
            None => {
                let content = rest.to_string();
                self.advance_by(rest.len());
                (content, false)
            }
        }
    }

    /// At `{{`
    fn consume_interpolation(&mut self) {
        let start = self.location;
        let (content, closed) = self.consume_delimited(2, "}}");
        let source_span = self.span_from(start);
        if !closed {
            self.errors.push(ParseError::new(
                ParseErrorKind::UnterminatedInterpolation,
                source_span,
            ));
        }
        self.tokens.push(Token::Interpolation {
            content,
            source_span,
        });
    }

    /// At `!--`, with the `<` already consumed
    fn consume_comment(&mut self) {
        let (content, closed) = self.consume_delimited(3, "-->");
        let source_span = self.span_from(self.token_start);
        if !closed {
            self.errors.push(ParseError::new(
                ParseErrorKind::UnterminatedComment,
                source_span,
            ));
        }
        self.tokens.push(Token::Comment {
            content,
            source_span,
        });
        self.state = State::Initial;
    }

    /// At `![CDATA[`, with the `<` already consumed
    fn consume_cdata(&mut self) {
        let (content, closed) = self.consume_delimited(8, "]]>");
        let source_span = self.span_from(self.token_start);
        if !closed {
            self.errors.push(ParseError::new(
                ParseErrorKind::UnterminatedCdata,
                source_span,
            ));
        }
        if !content.is_empty() {
            self.tokens.push(Token::Text {
                content,
                source_span,
            });
        }
        self.state = State::Initial;
    }
}

fn merge_text_tokens(src: Vec<Token>) -> Vec<Token> {
    let mut dst: Vec<Token> = Vec::with_capacity(src.len());
    for token in src {
        if let (
            Some(Token::Text {
                content: prev,
                source_span: prev_span,
            }),
            Token::Text {
                content,
                source_span,
            },
        ) = (dst.last_mut(), &token)
        {
            prev.push_str(content);
            prev_span.end = source_span.end;
            continue;
        }
        dst.push(token);
    }
    dst
}
