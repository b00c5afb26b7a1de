/**
 * Character Reference Tests
 */

#[cfg(test)]
mod tests {
    use std::borrow::Cow;
    use template_compiler::ml_parser::entities::{decode_html, sanitize_code_point};

    mod named {
        use super::*;

        #[test]
        fn should_decode_terminated_references() {
            assert_eq!(decode_html("&lt;div&gt; &quot;x&quot; &apos;", false), "<div> \"x\" '");
            assert_eq!(decode_html("&copy; 2024 &mdash; all", false), "\u{a9} 2024 \u{2014} all");
        }

        #[test]
        fn should_decode_legacy_references_without_semicolon_in_text() {
            assert_eq!(decode_html("a &amp b", false), "a & b");
            assert_eq!(decode_html("&copy=1", false), "\u{a9}=1");
            assert_eq!(decode_html("&ltx", false), "<x");
        }

        #[test]
        fn should_keep_unknown_references() {
            assert_eq!(decode_html("&unknown; & &;", false), "&unknown; & &;");
        }
    }

    mod attribute_values {
        use super::*;

        #[test]
        fn should_keep_unterminated_references_followed_by_name_chars() {
            assert_eq!(decode_html("?a=1&copy=2", true), "?a=1&copy=2");
            assert_eq!(decode_html("&ampx", true), "&ampx");
        }

        #[test]
        fn should_decode_other_references() {
            assert_eq!(decode_html("a&amp;b", true), "a&b");
            assert_eq!(decode_html("&amp x", true), "& x");
            assert_eq!(decode_html("x&lt", true), "x<");
        }
    }

    mod numeric {
        use super::*;

        #[test]
        fn should_decode_decimal_and_hex_references() {
            assert_eq!(decode_html("&#65;&#x42;&#X43;", false), "ABC");
            assert_eq!(decode_html("&#128512;", false), "\u{1F600}");
        }

        #[test]
        fn should_accept_missing_semicolons() {
            assert_eq!(decode_html("&#65B", false), "AB");
        }

        #[test]
        fn should_keep_references_without_digits() {
            assert_eq!(decode_html("&#; &#x;", false), "&#; &#x;");
        }

        #[test]
        fn should_replace_null_and_out_of_range_code_points() {
            assert_eq!(decode_html("&#0;", false), "\u{FFFD}");
            assert_eq!(decode_html("&#x110000;", false), "\u{FFFD}");
            assert_eq!(decode_html("&#99999999999;", false), "\u{FFFD}");
        }

        #[test]
        fn should_replace_surrogates() {
            assert_eq!(decode_html("&#xD800;", false), "\u{FFFD}");
            assert_eq!(decode_html("&#xDFFF;", false), "\u{FFFD}");
        }

        #[test]
        fn should_remap_c1_controls() {
            assert_eq!(decode_html("&#x80;", false), "\u{20AC}");
            assert_eq!(decode_html("&#x99;", false), "\u{2122}");
            assert_eq!(decode_html("&#x9F;", false), "\u{178}");
        }

        #[test]
        fn should_keep_unmapped_controls_and_noncharacters() {
            assert_eq!(sanitize_code_point(0x81), '\u{81}');
            assert_eq!(sanitize_code_point(0x0b), '\u{0b}');
            assert_eq!(sanitize_code_point(0xfffe), '\u{fffe}');
        }

        #[test]
        fn should_keep_allowed_whitespace_controls() {
            assert_eq!(decode_html("&#9;&#10;&#12;", false), "\t\n\x0C");
        }
    }

    mod identity {
        use super::*;

        #[test]
        fn should_borrow_text_without_ampersands() {
            for input in ["", "plain", "a < b", "{{ x }}", "\u{00A0}"] {
                assert!(matches!(decode_html(input, false), Cow::Borrowed(s) if s == input));
                assert!(matches!(decode_html(input, true), Cow::Borrowed(s) if s == input));
            }
        }

        #[test]
        fn should_be_idempotent_on_decoded_output_without_ampersands() {
            let once = decode_html("&lt;p&gt; &#65;", false).into_owned();
            assert_eq!(decode_html(&once, false), once);
        }
    }
}
