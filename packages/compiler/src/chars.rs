//! Character Codes
//!
//! Character constants and classification helpers shared by the lexer,
//! the structural parser and the entity decoder.

// Special characters
pub const TAB: char = '\t';
pub const LF: char = '\n'; // Line feed
pub const FF: char = '\x0C';
pub const CR: char = '\r'; // Carriage return
pub const SPACE: char = ' ';
pub const REPLACEMENT: char = '\u{FFFD}';

// Punctuation
pub const DQ: char = '"';
pub const HASH: char = '#';
pub const AMPERSAND: char = '&';
pub const SQ: char = '\'';
pub const SLASH: char = '/';
pub const SEMICOLON: char = ';';
pub const LT: char = '<';
pub const EQ: char = '=';
pub const GT: char = '>';

/// Check if character is markup whitespace (tab, LF, FF, CR, space)
pub fn is_whitespace(ch: char) -> bool {
    ch == SPACE || ch == TAB || ch == LF || ch == FF || ch == CR
}

/// Check if character is a digit
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if character is ASCII letter
pub fn is_ascii_letter(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

/// Check if character is ASCII hex digit
pub fn is_ascii_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// Check if character is a quote usable around attribute values
pub fn is_quote(ch: char) -> bool {
    ch == SQ || ch == DQ
}

/// Tag names run until whitespace, `/` or `>`
pub fn is_name_end(ch: char) -> bool {
    is_whitespace(ch) || ch == SLASH || ch == GT
}

/// Attribute names additionally stop at `=`
pub fn is_attr_name_end(ch: char) -> bool {
    is_name_end(ch) || ch == EQ
}

/// Unquoted attribute values stop at whitespace or `>`
pub fn is_unquoted_value_end(ch: char) -> bool {
    is_whitespace(ch) || ch == GT
}
