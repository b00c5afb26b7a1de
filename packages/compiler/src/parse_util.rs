//! Parse Utilities
//!
//! Source locations, spans and the diagnostics reported while parsing and
//! transforming a template.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

use crate::chars;

/// A position inside the template source. `line` and `col` are zero-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseLocation {
    pub offset: usize,
    pub line: usize,
    pub col: usize,
}

impl ParseLocation {
    pub fn new(offset: usize, line: usize, col: usize) -> Self {
        ParseLocation { offset, line, col }
    }

    /// Moves the location past `consumed`, which must be the text that
    /// immediately follows the current position.
    pub fn advance_over(&mut self, consumed: &str) {
        for ch in consumed.chars() {
            self.offset += ch.len_utf8();
            if ch == chars::LF {
                self.line += 1;
                self.col = 0;
            } else {
                self.col += 1;
            }
        }
    }
}

impl fmt::Display for ParseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseSourceSpan {
    pub start: ParseLocation,
    pub end: ParseLocation,
}

impl ParseSourceSpan {
    pub fn new(start: ParseLocation, end: ParseLocation) -> Self {
        ParseSourceSpan { start, end }
    }

    /// Zero-width span at `location`
    pub fn point(location: ParseLocation) -> Self {
        ParseSourceSpan::new(location, location)
    }

    /// The covered slice of `source`
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.start.offset..self.end.offset).unwrap_or("")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorLevel {
    Warning,
    Error,
}

impl fmt::Display for ParseErrorLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseErrorLevel::Warning => f.write_str("warning"),
            ParseErrorLevel::Error => f.write_str("error"),
        }
    }
}

/// Recoverable conditions detected in a template.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ParseErrorKind {
    #[error("Element \"{tag}\" is missing its closing tag")]
    MissingClosingTag { tag: String },
    #[error("Unexpected closing tag \"{tag}\"")]
    UnmatchedClosingTag { tag: String },
    #[error("Attribute \"{name}\" is missing the closing quote of its value")]
    UnterminatedAttributeValue { name: String },
    #[error("Interpolation is missing its closing \"}}}}\" delimiter")]
    UnterminatedInterpolation,
    #[error("Comment is missing its closing \"-->\"")]
    UnterminatedComment,
    #[error("CDATA section is missing its closing \"]]>\"")]
    UnterminatedCdata,
    #[error("Unexpected end of input inside tag \"{tag}\"")]
    EofInTag { tag: String },
    #[error("Unsafe attribute name \"{name}\"")]
    UnsafeAttributeName { name: String },
    #[error("Element \"{tag}\" is nested deeper than {limit} levels; its content is kept as text")]
    NestingTooDeep { tag: String, limit: usize },
    #[error("Interpolation has no expression")]
    EmptyInterpolation,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: ParseSourceSpan,
    pub level: ParseErrorLevel,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: ParseSourceSpan) -> Self {
        ParseError {
            kind,
            span,
            level: ParseErrorLevel::Error,
        }
    }

    pub fn warning(kind: ParseErrorKind, span: ParseSourceSpan) -> Self {
        ParseError {
            kind,
            span,
            level: ParseErrorLevel::Warning,
        }
    }

    pub fn msg(&self) -> String {
        self.kind.to_string()
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: {}", self.span.start, self.level, self.kind)
    }
}
