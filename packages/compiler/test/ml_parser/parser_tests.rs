/**
 * Structural Parser Tests
 *
 * Trees are compared in humanized form: `[kind, value, depth]` rows.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{humanize_dom, humanize_errors, rows};
    use template_compiler::ml_parser::ast::NodeKind;
    use template_compiler::ml_parser::parser::{parse, ParseTreeResult, MAX_NESTING_DEPTH};
    use template_compiler::parse_util::ParseErrorKind;

    fn parse_ok(source: &str) -> ParseTreeResult {
        let result = parse(source);
        assert!(
            result.errors.is_empty(),
            "unexpected errors for {:?}: {:?}",
            source,
            result.errors
        );
        result
    }

    fn error_kinds(result: &ParseTreeResult) -> Vec<ParseErrorKind> {
        result.errors.iter().map(|e| e.kind.clone()).collect()
    }

    mod text_nodes {
        use super::*;

        #[test]
        fn should_parse_root_level_text_nodes() {
            assert_eq!(humanize_dom(&parse_ok("a")), rows(&[&["Text", "a", "0"]]));
        }

        #[test]
        fn should_parse_text_nodes_inside_regular_elements() {
            assert_eq!(
                humanize_dom(&parse_ok("<div>a</div>")),
                rows(&[&["Element", "div", "0"], &["Text", "a", "1"]])
            );
        }

        #[test]
        fn should_keep_a_lone_lt_as_text() {
            assert_eq!(
                humanize_dom(&parse_ok("<p>1 < 2</p>")),
                rows(&[&["Element", "p", "0"], &["Text", "1 < 2", "1"]])
            );
        }

        #[test]
        fn should_decode_entities_in_text() {
            assert_eq!(
                humanize_dom(&parse_ok("<p>a &amp; b &#60; &#x3e;</p>")),
                rows(&[&["Element", "p", "0"], &["Text", "a & b < >", "1"]])
            );
        }

        #[test]
        fn should_keep_doctype_like_markup_as_text() {
            assert_eq!(
                humanize_dom(&parse_ok("<!DOCTYPE html>")),
                rows(&[&["Text", "<!DOCTYPE html>", "0"]])
            );
        }
    }

    mod elements {
        use super::*;

        #[test]
        fn should_mirror_source_nesting() {
            assert_eq!(
                humanize_dom(&parse_ok("<div><p>A</p><p>B</p></div>")),
                rows(&[
                    &["Element", "div", "0"],
                    &["Element", "p", "1"],
                    &["Text", "A", "2"],
                    &["Element", "p", "1"],
                    &["Text", "B", "2"],
                ])
            );
        }

        #[test]
        fn should_parse_self_closing_elements() {
            let result = parse_ok("<img src=\"x\"/>");
            let ast = &result.ast;
            let img = ast.children(ast.root())[0];
            match &ast.node(img).kind {
                NodeKind::Element(element) => {
                    assert_eq!(element.tag, "img");
                    assert!(element.self_closing);
                    assert_eq!(element.attributes.len(), 1);
                    assert_eq!(element.attributes[0].name, "src");
                    assert_eq!(element.attributes[0].value, "x");
                }
                other => panic!("expected element, got {:?}", other),
            }
            assert!(ast.children(img).is_empty());
        }

        #[test]
        fn should_not_parse_children_of_self_closing_elements() {
            assert_eq!(
                humanize_dom(&parse_ok("<div><br/>text</div>")),
                rows(&[
                    &["Element", "div", "0"],
                    &["Element", "br", "1"],
                    &["Text", "text", "1"],
                ])
            );
        }

        #[test]
        fn should_match_closing_tags_case_insensitively() {
            assert_eq!(
                humanize_dom(&parse_ok("<DIV>a</div>")),
                rows(&[&["Element", "DIV", "0"], &["Text", "a", "1"]])
            );
        }

        #[test]
        fn should_accept_whitespace_before_closing_bracket() {
            assert_eq!(
                humanize_dom(&parse_ok("<div >a</div >")),
                rows(&[&["Element", "div", "0"], &["Text", "a", "1"]])
            );
        }

        #[test]
        fn should_not_close_on_a_longer_tag_name() {
            let result = parse("<a></ab></a>");
            assert_eq!(
                error_kinds(&result),
                vec![ParseErrorKind::UnmatchedClosingTag {
                    tag: "ab".to_string()
                }]
            );
            assert_eq!(humanize_dom(&result), rows(&[&["Element", "a", "0"]]));
        }
    }

    mod attributes {
        use super::*;

        #[test]
        fn should_parse_quoted_and_unquoted_values() {
            assert_eq!(
                humanize_dom(&parse_ok("<div id=\"a\" class='b c' data-x=y></div>")),
                rows(&[
                    &["Element", "div", "0"],
                    &["Attribute", "id", "a"],
                    &["Attribute", "class", "b c"],
                    &["Attribute", "data-x", "y"],
                ])
            );
        }

        #[test]
        fn should_parse_attributes_without_values() {
            assert_eq!(
                humanize_dom(&parse_ok("<button disabled required></button>")),
                rows(&[
                    &["Element", "button", "0"],
                    &["Attribute", "disabled", ""],
                    &["Attribute", "required", ""],
                ])
            );
        }

        #[test]
        fn should_allow_whitespace_around_equals() {
            assert_eq!(
                humanize_dom(&parse_ok("<div :id = \"dynamicId\" @click=\"handler\"></div>")),
                rows(&[
                    &["Element", "div", "0"],
                    &["Attribute", ":id", "dynamicId"],
                    &["Attribute", "@click", "handler"],
                ])
            );
        }

        #[test]
        fn should_decode_entities_in_values_with_attribute_rules() {
            assert_eq!(
                humanize_dom(&parse_ok("<a href=\"?a=1&amp;b=2&copy=3&lt;\"></a>")),
                rows(&[
                    &["Element", "a", "0"],
                    &["Attribute", "href", "?a=1&b=2&copy=3<"],
                ])
            );
        }

        #[test]
        fn should_report_unterminated_quotes() {
            let result = parse("<div id=\"abc></div>");
            assert_eq!(
                error_kinds(&result),
                vec![
                    ParseErrorKind::UnterminatedAttributeValue {
                        name: "id".to_string()
                    },
                    ParseErrorKind::EofInTag {
                        tag: "div".to_string()
                    },
                    ParseErrorKind::MissingClosingTag {
                        tag: "div".to_string()
                    },
                ]
            );
            assert_eq!(
                humanize_dom(&result),
                rows(&[&["Element", "div", "0"], &["Attribute", "id", "abc></div>"]])
            );
        }
    }

    mod content_modes {
        use super::*;

        #[test]
        fn should_not_parse_interpolation_in_rcdata() {
            assert_eq!(
                humanize_dom(&parse_ok("<textarea>{{ not interpolated }}</textarea>")),
                rows(&[
                    &["Element", "textarea", "0"],
                    &["Text", "{{ not interpolated }}", "1"],
                ])
            );
        }

        #[test]
        fn should_not_parse_tags_in_rcdata_but_decode_entities() {
            assert_eq!(
                humanize_dom(&parse_ok("<title><b>&amp;</b></title>")),
                rows(&[&["Element", "title", "0"], &["Text", "<b>&</b>", "1"]])
            );
        }

        #[test]
        fn should_not_decode_entities_in_rawtext() {
            assert_eq!(
                humanize_dom(&parse_ok("<style>a > b { content: '&amp;' }</style>")),
                rows(&[
                    &["Element", "style", "0"],
                    &["Text", "a > b { content: '&amp;' }", "1"],
                ])
            );
        }

        #[test]
        fn should_only_close_rawtext_on_its_own_tag() {
            assert_eq!(
                humanize_dom(&parse_ok("<div><noscript></div></noscript></div>")),
                rows(&[
                    &["Element", "div", "0"],
                    &["Element", "noscript", "1"],
                    &["Text", "</div>", "2"],
                ])
            );
        }

        #[test]
        fn should_restore_data_mode_after_rawtext_element() {
            assert_eq!(
                humanize_dom(&parse_ok("<div><xmp><p></xmp><p>{{ x }}</p></div>")),
                rows(&[
                    &["Element", "div", "0"],
                    &["Element", "xmp", "1"],
                    &["Text", "<p>", "2"],
                    &["Element", "p", "1"],
                    &["Interpolation", " x ", "2"],
                ])
            );
        }
    }

    mod interpolation {
        use super::*;

        #[test]
        fn should_parse_interpolation_between_text() {
            assert_eq!(
                humanize_dom(&parse_ok("<p>Hello {{ name }}!</p>")),
                rows(&[
                    &["Element", "p", "0"],
                    &["Text", "Hello ", "1"],
                    &["Interpolation", " name ", "1"],
                    &["Text", "!", "1"],
                ])
            );
        }

        #[test]
        fn should_report_unterminated_interpolation() {
            let result = parse("<p>{{ name</p>");
            assert_eq!(
                error_kinds(&result),
                vec![
                    ParseErrorKind::UnterminatedInterpolation,
                    ParseErrorKind::MissingClosingTag {
                        tag: "p".to_string()
                    },
                ]
            );
            assert_eq!(
                humanize_dom(&result),
                rows(&[&["Element", "p", "0"], &["Interpolation", " name</p>", "1"]])
            );
        }
    }

    mod comments_and_cdata {
        use super::*;

        #[test]
        fn should_parse_comments() {
            assert_eq!(
                humanize_dom(&parse_ok("<div><!-- note --></div>")),
                rows(&[&["Element", "div", "0"], &["Comment", " note ", "1"]])
            );
        }

        #[test]
        fn should_report_unterminated_comments() {
            let result = parse("<!-- open");
            assert_eq!(error_kinds(&result), vec![ParseErrorKind::UnterminatedComment]);
            assert_eq!(humanize_dom(&result), rows(&[&["Comment", " open", "0"]]));
        }

        #[test]
        fn should_splice_cdata_text_into_parent() {
            assert_eq!(
                humanize_dom(&parse_ok("<p>a<![CDATA[<b>&amp;</b>]]>c</p>")),
                rows(&[&["Element", "p", "0"], &["Text", "a<b>&amp;</b>c", "1"]])
            );
        }

        #[test]
        fn should_report_unterminated_cdata() {
            let result = parse("<![CDATA[x");
            assert_eq!(error_kinds(&result), vec![ParseErrorKind::UnterminatedCdata]);
            assert_eq!(humanize_dom(&result), rows(&[&["Text", "x", "0"]]));
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_recover_from_missing_close_tag() {
            let result = parse("<div><span></div>");
            assert_eq!(
                humanize_errors(&result.errors),
                rows(&[&["Element \"span\" is missing its closing tag", "0:5"]])
            );
            assert_eq!(
                humanize_dom(&result),
                rows(&[&["Element", "div", "0"], &["Element", "span", "1"]])
            );
        }

        #[test]
        fn should_keep_content_past_the_nesting_limit_as_text() {
            let depth = MAX_NESTING_DEPTH + 2;
            let source = format!(
                "{}<b>x</b>{}<i></i>",
                "<div>".repeat(depth),
                "</div>".repeat(depth)
            );
            let result = parse(&source);
            assert_eq!(
                humanize_errors(&result.errors),
                rows(&[&[
                    "Element \"div\" is nested deeper than 256 levels; its content is kept as text",
                    "0:1280"
                ]])
            );

            let mut expected: Vec<Vec<String>> = (0..=MAX_NESTING_DEPTH)
                .map(|d| vec!["Element".to_string(), "div".to_string(), d.to_string()])
                .collect();
            expected.push(vec![
                "Text".to_string(),
                "<div><b>x</b></div>".to_string(),
                (MAX_NESTING_DEPTH + 1).to_string(),
            ]);
            expected.push(vec!["Element".to_string(), "i".to_string(), "0".to_string()]);
            assert_eq!(humanize_dom(&result), expected);
        }

        #[test]
        fn should_report_and_skip_unmatched_close_tags() {
            let result = parse("<div>a</p>b</div>");
            assert_eq!(
                humanize_errors(&result.errors),
                rows(&[&["Unexpected closing tag \"p\"", "0:6"]])
            );
            assert_eq!(
                humanize_dom(&result),
                rows(&[&["Element", "div", "0"], &["Text", "ab", "1"]])
            );
        }

        #[test]
        fn should_report_missing_close_tag_at_end_of_input() {
            let result = parse("<div><p>x");
            assert_eq!(
                error_kinds(&result),
                vec![
                    ParseErrorKind::MissingClosingTag {
                        tag: "p".to_string()
                    },
                    ParseErrorKind::MissingClosingTag {
                        tag: "div".to_string()
                    },
                ]
            );
        }

        #[test]
        fn should_track_line_and_column() {
            let result = parse("<div>\n  <span>\n</div>");
            assert_eq!(
                humanize_errors(&result.errors),
                rows(&[&["Element \"span\" is missing its closing tag", "1:2"]])
            );
        }
    }

    mod source_spans {
        use super::*;

        #[test]
        fn should_cover_the_whole_element() {
            let source = "<p>x</p><b>y</b>";
            let result = parse_ok(source);
            let ast = &result.ast;
            let spans: Vec<&str> = ast
                .children(ast.root())
                .iter()
                .map(|&id| ast.node(id).source_span.unwrap().text(source))
                .collect();
            assert_eq!(spans, vec!["<p>x</p>", "<b>y</b>"]);
        }
    }
}
