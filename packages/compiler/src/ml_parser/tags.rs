//! ML Parser Tags
//!
//! Content models of elements and the text modes the parser switches between.

/// Tag content types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContentType {
    /// No nested markup, no character references (`style`, `xmp`, ...)
    RawText,
    /// No nested markup, character references decoded (`textarea`, `title`)
    EscapableRawText,
    ParsableData,
}

/// Parser text mode; selects which constructs are recognised in the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextMode {
    Data,
    RcData,
    RawText,
    CData,
}

impl TextMode {
    /// Whether character references are decoded in this mode
    pub fn decodes_entities(self) -> bool {
        matches!(self, TextMode::Data | TextMode::RcData)
    }
}

impl From<TagContentType> for TextMode {
    fn from(content_type: TagContentType) -> Self {
        match content_type {
            TagContentType::RawText => TextMode::RawText,
            TagContentType::EscapableRawText => TextMode::RcData,
            TagContentType::ParsableData => TextMode::Data,
        }
    }
}

const RAW_TEXT_TAGS: &[&str] = &["style", "xmp", "iframe", "noembed", "noframes", "noscript"];

const ESCAPABLE_RAW_TEXT_TAGS: &[&str] = &["textarea", "title"];

/// Elements whose text is rendered verbatim and never condensed
const WHITESPACE_SENSITIVE_TAGS: &[&str] = &["pre", "textarea"];

pub fn get_content_type(tag_name: &str) -> TagContentType {
    let is = |names: &[&str]| names.iter().any(|n| n.eq_ignore_ascii_case(tag_name));
    if is(ESCAPABLE_RAW_TEXT_TAGS) {
        TagContentType::EscapableRawText
    } else if is(RAW_TEXT_TAGS) {
        TagContentType::RawText
    } else {
        TagContentType::ParsableData
    }
}

pub fn is_whitespace_sensitive(tag_name: &str) -> bool {
    WHITESPACE_SENSITIVE_TAGS
        .iter()
        .any(|n| n.eq_ignore_ascii_case(tag_name))
        || get_content_type(tag_name) != TagContentType::ParsableData
}
