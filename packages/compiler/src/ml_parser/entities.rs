//! Character reference decoding
//!
//! Named references are resolved against a small table of the most common
//! entities. Numeric references are sanitized: NUL, out-of-range and
//! surrogate code points become U+FFFD, and C1 control code points are
//! remapped through the Windows-1252 replacement table.

use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;

use crate::chars;

/// Named references. Entries without `;` are the legacy forms that are
/// also recognised without a terminating semicolon.
pub static NAMED_ENTITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("amp;", "&");
    m.insert("amp", "&");
    m.insert("lt;", "<");
    m.insert("lt", "<");
    m.insert("gt;", ">");
    m.insert("gt", ">");
    m.insert("quot;", "\"");
    m.insert("quot", "\"");
    m.insert("apos;", "'");
    m.insert("nbsp;", "\u{00A0}");
    m.insert("nbsp", "\u{00A0}");
    m.insert("copy;", "\u{00A9}");
    m.insert("copy", "\u{00A9}");
    m.insert("reg;", "\u{00AE}");
    m.insert("reg", "\u{00AE}");
    m.insert("trade;", "\u{2122}");
    m.insert("hellip;", "\u{2026}");
    m.insert("mdash;", "\u{2014}");
    m.insert("ndash;", "\u{2013}");
    m.insert("lsquo;", "\u{2018}");
    m.insert("rsquo;", "\u{2019}");
    m.insert("ldquo;", "\u{201C}");
    m.insert("rdquo;", "\u{201D}");
    m.insert("laquo;", "\u{00AB}");
    m.insert("raquo;", "\u{00BB}");
    m.insert("times;", "\u{00D7}");
    m.insert("divide;", "\u{00F7}");
    m.insert("deg;", "\u{00B0}");
    m.insert("middot;", "\u{00B7}");
    m.insert("euro;", "\u{20AC}");
    m.insert("cent;", "\u{00A2}");
    m.insert("pound;", "\u{00A3}");
    m.insert("yen;", "\u{00A5}");
    m.insert("sect;", "\u{00A7}");
    m.insert("para;", "\u{00B6}");
    m
});

static MAX_NAME_LENGTH: Lazy<usize> =
    Lazy::new(|| NAMED_ENTITIES.keys().map(|k| k.len()).max().unwrap_or(0));

/// Replacements for numeric references in the C1 control range
pub static CCR_REPLACEMENTS: Lazy<HashMap<u32, u32>> = Lazy::new(|| {
    HashMap::from([
        (0x80, 0x20ac),
        (0x82, 0x201a),
        (0x83, 0x0192),
        (0x84, 0x201e),
        (0x85, 0x2026),
        (0x86, 0x2020),
        (0x87, 0x2021),
        (0x88, 0x02c6),
        (0x89, 0x2030),
        (0x8a, 0x0160),
        (0x8b, 0x2039),
        (0x8c, 0x0152),
        (0x8e, 0x017d),
        (0x91, 0x2018),
        (0x92, 0x2019),
        (0x93, 0x201c),
        (0x94, 0x201d),
        (0x95, 0x2022),
        (0x96, 0x2013),
        (0x97, 0x2014),
        (0x98, 0x02dc),
        (0x99, 0x2122),
        (0x9a, 0x0161),
        (0x9b, 0x203a),
        (0x9c, 0x0153),
        (0x9e, 0x017e),
        (0x9f, 0x0178),
    ])
});

/// Decode character references in `raw`.
///
/// With `as_attr`, a named reference lacking its `;` that is directly
/// followed by `=` or an ASCII alphanumeric is left as written.
pub fn decode_html(raw: &str, as_attr: bool) -> Cow<'_, str> {
    if !raw.contains(chars::AMPERSAND) {
        return Cow::Borrowed(raw);
    }

    let mut decoded = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(amp) = rest.find(chars::AMPERSAND) {
        decoded.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let consumed = if rest[1..].starts_with(chars::HASH) {
            decode_numeric(rest, &mut decoded)
        } else {
            decode_named(rest, as_attr, &mut decoded)
        };
        rest = &rest[consumed..];
    }
    decoded.push_str(rest);

    Cow::Owned(decoded)
}

/// `input` starts with `&`. Returns the number of bytes consumed.
fn decode_named(input: &str, as_attr: bool, out: &mut String) -> usize {
    let body = &input[1..];
    let candidate_len = body
        .char_indices()
        .find(|&(_, c)| !c.is_ascii_alphanumeric())
        .map(|(i, c)| if c == chars::SEMICOLON { i + 1 } else { i })
        .unwrap_or(body.len());

    let mut length = candidate_len.min(*MAX_NAME_LENGTH);
    while length > 0 {
        let name = &body[..length];
        if let Some(value) = NAMED_ENTITIES.get(name) {
            let terminated = name.ends_with(chars::SEMICOLON);
            let next = body[length..].chars().next();
            let ambiguous = next.map_or(false, |c| c == chars::EQ || c.is_ascii_alphanumeric());
            if as_attr && !terminated && ambiguous {
                out.push(chars::AMPERSAND);
                out.push_str(name);
            } else {
                out.push_str(value);
            }
            return 1 + length;
        }
        length -= 1;
    }

    out.push(chars::AMPERSAND);
    1
}

/// `input` starts with `&#`. Returns the number of bytes consumed.
fn decode_numeric(input: &str, out: &mut String) -> usize {
    let hex = matches!(input.as_bytes().get(2), Some(b'x') | Some(b'X'));
    let digits_start = if hex { 3 } else { 2 };
    let digits = &input[digits_start..];
    let digits_len = digits
        .find(|c: char| {
            if hex {
                !chars::is_ascii_hex_digit(c)
            } else {
                !chars::is_digit(c)
            }
        })
        .unwrap_or(digits.len());

    if digits_len == 0 {
        out.push_str(&input[..digits_start]);
        return digits_start;
    }

    let radix = if hex { 16 } else { 10 };
    // Overflowing u32 is necessarily beyond the Unicode range
    let cp = u32::from_str_radix(&digits[..digits_len], radix).unwrap_or(u32::MAX);
    out.push(sanitize_code_point(cp));

    let mut consumed = digits_start + digits_len;
    if input[consumed..].starts_with(chars::SEMICOLON) {
        consumed += 1;
    }
    consumed
}

pub fn sanitize_code_point(cp: u32) -> char {
    if cp == 0 || cp > 0x10ffff || (0xd800..=0xdfff).contains(&cp) {
        return chars::REPLACEMENT;
    }
    let cp = if is_noncharacter(cp) {
        cp
    } else if is_replaceable_control(cp) {
        CCR_REPLACEMENTS.get(&cp).copied().unwrap_or(cp)
    } else {
        cp
    };
    char::from_u32(cp).unwrap_or(chars::REPLACEMENT)
}

fn is_noncharacter(cp: u32) -> bool {
    (0xfdd0..=0xfdef).contains(&cp) || (cp & 0xfffe) == 0xfffe
}

/// Controls except TAB, LF and FF. CR is included.
fn is_replaceable_control(cp: u32) -> bool {
    (0x01..=0x08).contains(&cp)
        || cp == 0x0b
        || (0x0d..=0x1f).contains(&cp)
        || (0x7f..=0x9f).contains(&cp)
}
