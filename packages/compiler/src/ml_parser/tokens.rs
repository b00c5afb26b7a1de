//! ML Parser Tokens

use crate::parse_util::ParseSourceSpan;
use serde::Serialize;

/// Token types for template tokenization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TokenType {
    TagOpen,
    TagClose,
    Text,
    Comment,
    Interpolation,
}

/// An attribute carried by a [`Token::TagOpen`] (extended tokenization only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenAttribute {
    pub name: String,
    pub value: String,
    pub source_span: ParseSourceSpan,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum Token {
    TagOpen {
        name: String,
        attributes: Vec<TokenAttribute>,
        self_closing: bool,
        source_span: ParseSourceSpan,
    },
    TagClose {
        name: String,
        source_span: ParseSourceSpan,
    },
    Text {
        content: String,
        source_span: ParseSourceSpan,
    },
    Comment {
        content: String,
        source_span: ParseSourceSpan,
    },
    Interpolation {
        content: String,
        source_span: ParseSourceSpan,
    },
}

impl Token {
    pub fn token_type(&self) -> TokenType {
        match self {
            Token::TagOpen { .. } => TokenType::TagOpen,
            Token::TagClose { .. } => TokenType::TagClose,
            Token::Text { .. } => TokenType::Text,
            Token::Comment { .. } => TokenType::Comment,
            Token::Interpolation { .. } => TokenType::Interpolation,
        }
    }

    /// Tag name or textual content
    pub fn value(&self) -> &str {
        match self {
            Token::TagOpen { name, .. } | Token::TagClose { name, .. } => name,
            Token::Text { content, .. }
            | Token::Comment { content, .. }
            | Token::Interpolation { content, .. } => content,
        }
    }

    pub fn source_span(&self) -> &ParseSourceSpan {
        match self {
            Token::TagOpen { source_span, .. }
            | Token::TagClose { source_span, .. }
            | Token::Text { source_span, .. }
            | Token::Comment { source_span, .. }
            | Token::Interpolation { source_span, .. } => source_span,
        }
    }
}
