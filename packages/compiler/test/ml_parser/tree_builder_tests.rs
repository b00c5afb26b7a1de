/**
 * Tree Builder Tests
 *
 * On well-formed markup the token pipeline and the structural parser
 * must build the same tree.
 */

#[path = "util/mod.rs"]
mod utils;

#[cfg(test)]
mod tests {
    use super::utils::{humanize_dom, humanize_errors, rows};
    use template_compiler::ml_parser::lexer::{tokenize, TokenizeOptions};
    use template_compiler::ml_parser::parser::parse;
    use template_compiler::ml_parser::tree_builder::{build_tree, parse_tokens};

    const WELL_FORMED: &[&str] = &[
        "<div><p>Vue</p><p>Template</p></div>",
        "<div id=\"app\" class='a b'>Hello {{ name }}!</div>",
        "<ul><li>a</li><li>b &amp; c &#x41;</li></ul>",
        "<img src=\"x\"/><br/>text",
        "<div><!-- note --><span>x</span></div>",
        "<p>1 < 2</p>",
        "<p>a<![CDATA[<b>]]>c</p>",
        "<DIV>upper</div>",
        "<button disabled :id = \"dynamicId\"></button>",
    ];

    mod agreement {
        use super::*;

        #[test]
        fn should_build_the_same_tree_as_the_parser() {
            for source in WELL_FORMED {
                let from_tokens = parse_tokens(source, TokenizeOptions::extended());
                let parsed = parse(source);
                assert!(from_tokens.errors.is_empty(), "{}: {:?}", source, from_tokens.errors);
                assert!(parsed.errors.is_empty(), "{}: {:?}", source, parsed.errors);
                assert_eq!(humanize_dom(&from_tokens), humanize_dom(&parsed), "{}", source);
            }
        }

        #[test]
        fn should_build_the_same_element_spans_as_the_parser() {
            let source = "<div><p>Vue</p></div>";
            let from_tokens = parse_tokens(source, TokenizeOptions::extended()).ast;
            let parsed = parse(source).ast;
            let div_a = from_tokens.children(from_tokens.root())[0];
            let div_b = parsed.children(parsed.root())[0];
            assert_eq!(
                from_tokens.node(div_a).source_span.map(|s| s.text(source)),
                Some(source)
            );
            assert_eq!(
                parsed.node(div_b).source_span.map(|s| s.text(source)),
                Some(source)
            );
        }

        #[test]
        fn should_build_from_minimal_tokens() {
            let source = "<div><p>Vue</p><p>Template</p></div>";
            assert_eq!(
                humanize_dom(&build_tree(tokenize(source).tokens)),
                humanize_dom(&parse(source))
            );
        }
    }

    mod errors {
        use super::*;

        #[test]
        fn should_close_unclosed_children_on_an_outer_close_tag() {
            let result = parse_tokens("<div><span>x</div>", TokenizeOptions::extended());
            assert_eq!(
                humanize_errors(&result.errors),
                rows(&[&["Element \"span\" is missing its closing tag", "0:5"]])
            );
            assert_eq!(
                humanize_dom(&result),
                rows(&[
                    &["Element", "div", "0"],
                    &["Element", "span", "1"],
                    &["Text", "x", "2"],
                ])
            );
        }

        #[test]
        fn should_ignore_unmatched_close_tags() {
            let result = parse_tokens("<p>a</b>c</p>", TokenizeOptions::extended());
            assert_eq!(
                humanize_errors(&result.errors),
                rows(&[&["Unexpected closing tag \"b\"", "0:4"]])
            );
            assert_eq!(
                humanize_dom(&result),
                rows(&[&["Element", "p", "0"], &["Text", "ac", "1"]])
            );
        }

        #[test]
        fn should_report_lexer_errors_before_tree_errors() {
            let result = parse_tokens("<p>{{ x", TokenizeOptions::extended());
            let messages: Vec<String> = result.errors.iter().map(|e| e.msg()).collect();
            assert_eq!(
                messages,
                vec![
                    "Interpolation is missing its closing \"}}\" delimiter".to_string(),
                    "Element \"p\" is missing its closing tag".to_string(),
                ]
            );
        }
    }
}
