//! Integration tests for the block consumers and the top-level driver.

use mailstyle_css::parser::{BlockTag, CSSParser, ConsumedBlock};
use mailstyle_css::tokenizer::{CSSToken, VecTokenSource};
use mailstyle_css::{MAX_NESTING, ParseErrorKind, ParserOptions, Selector, parse_css};

/// Helper to consume `input` with default options
fn consume(input: &str) -> (ConsumedBlock, CSSParser) {
    let mut parser = CSSParser::new();
    let top = parser.consume_css_blocks(input);
    (top, parser)
}

/// A rule whose consumers reach exactly `depth` levels. The qualified rule
/// counts as level 1, so this is a selector followed by `depth - 1` braces.
fn nested_braces(depth: usize) -> String {
    let braces = depth - 1;
    format!("p{}{}", "{".repeat(braces), "}".repeat(braces))
}

fn tags(blocks: &[ConsumedBlock]) -> Vec<BlockTag> {
    blocks.iter().map(ConsumedBlock::tag).collect()
}

#[test]
fn test_simple_rule_shape() {
    let (top, parser) = consume("p { color: red; }");
    assert!(parser.error().is_none());
    assert_eq!(top.tag(), BlockTag::TopBlock);
    assert_eq!(tags(top.blocks_or_empty()), vec![BlockTag::QualifiedRule]);

    let rule = &top.blocks_or_empty()[0];
    assert_eq!(tags(rule.blocks_or_empty()), vec![BlockTag::Component, BlockTag::SimpleBlock]);
    assert_eq!(rule.blocks_or_empty()[0].token_or_empty(), &CSSToken::ident("p"));

    let body = &rule.blocks_or_empty()[1];
    let tokens: Vec<&CSSToken> = body.blocks_or_empty().iter().map(ConsumedBlock::token_or_empty).collect();
    assert_eq!(tokens, vec![
        &CSSToken::ident("color"),
        &CSSToken::Colon,
        &CSSToken::ident("red"),
        &CSSToken::Semicolon,
    ]);
}

#[test]
fn test_function_arguments_are_flattened() {
    let (top, _) = consume("a { color: rgb(1, 2 3) }");
    let body = &top.blocks_or_empty()[0].blocks_or_empty()[1];
    let func = body.blocks_or_empty()[2].function_or_none().unwrap();

    assert_eq!(func.function, CSSToken::function("rgb"));
    let args: Vec<&CSSToken> = func.args.iter().map(ConsumedBlock::token_or_empty).collect();
    assert_eq!(args, vec![&CSSToken::integer(1), &CSSToken::integer(2), &CSSToken::integer(3)]);
    assert!(func.args.iter().all(|a| a.tag() == BlockTag::FunctionArg));
}

#[test]
fn test_nested_function_argument() {
    let (top, _) = consume("a { width: calc(1 + min(2, 3)) }");
    let body = &top.blocks_or_empty()[0].blocks_or_empty()[1];
    let calc = body.blocks_or_empty()[2].function_or_none().unwrap();

    assert_eq!(calc.args.len(), 2);
    let min = calc.args[1].function_or_none().unwrap();
    assert_eq!(min.function, CSSToken::function("min"));
    assert_eq!(min.args.len(), 2);
}

#[test]
fn test_parens_and_brackets_become_simple_blocks() {
    let (top, _) = consume("a[href] (b) {}");
    let rule = &top.blocks_or_empty()[0];
    assert_eq!(tags(rule.blocks_or_empty()), vec![
        BlockTag::Component,
        BlockTag::SimpleBlock,
        BlockTag::SimpleBlock,
        BlockTag::SimpleBlock,
    ]);
    assert_eq!(rule.blocks_or_empty()[1].blocks_or_empty()[0].token_or_empty(), &CSSToken::ident("href"));
}

#[test]
fn test_qualified_rule_ends_after_its_block() {
    let (top, _) = consume("a { } b { }");
    assert_eq!(tags(top.blocks_or_empty()), vec![BlockTag::QualifiedRule, BlockTag::QualifiedRule]);
}

#[test]
fn test_empty_input() {
    for input in ["", "   \n\t", "/* only a comment */"] {
        let (top, parser) = consume(input);
        assert_eq!(top.size(), 0, "input {input:?}");
        assert!(parser.error().is_none());
        assert!(CSSParser::new().consume_input(input).is_none());
    }
}

#[test]
fn test_empty_input_is_invalid_syntax_at_the_boundary() {
    let err = parse_css("").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::InvalidSyntax);
    assert_eq!(err.message, "cannot parse input");
}

#[test]
fn test_recursion_depth_at_ceiling_succeeds() {
    let (top, parser) = consume(&nested_braces(MAX_NESTING));
    assert!(parser.error().is_none());
    assert_eq!(top.size(), 1);
    assert!(parse_css(&nested_braces(MAX_NESTING)).is_ok());
}

#[test]
fn test_recursion_depth_past_ceiling_fails() {
    let (top, parser) = consume(&nested_braces(MAX_NESTING + 1));
    assert_eq!(parser.error().map(|e| e.kind), Some(ParseErrorKind::BadNesting));
    assert_eq!(top.size(), 0);

    let err = parse_css(&nested_braces(MAX_NESTING + 1)).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::BadNesting);
    assert_eq!(err.to_string(), "CSS parse error (bad nesting): max nesting reached, ignore style");
}

#[test]
fn test_brace_counts_around_ceiling() {
    // `p` is level 1, each `{` adds one.
    assert!(parse_css(&format!("p{}", "{".repeat(MAX_NESTING - 1))).is_ok());
    let err = parse_css(&format!("p{}", "{".repeat(MAX_NESTING))).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::BadNesting);
}

#[test]
fn test_unclosed_parens_fail_with_bad_nesting() {
    let input = format!("p{}", "(".repeat(25));
    let err = parse_css(&input).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::BadNesting);

    let mut parser = CSSParser::new();
    assert!(parser.consume_input(&input).is_none());
}

#[test]
fn test_deep_function_nesting_fails() {
    let input = format!("p {{ x: {} }}", "f(".repeat(30));
    assert_eq!(parse_css(&input).unwrap_err().kind, ParseErrorKind::BadNesting);
}

#[test]
fn test_custom_ceiling() {
    let options = ParserOptions { max_nesting: 3 };

    let mut parser = CSSParser::with_options(options);
    let _ = parser.consume_css_blocks("p { a { } }");
    assert!(parser.error().is_none());

    let _ = parser.consume_css_blocks("p { { { } } }");
    assert_eq!(parser.error().map(|e| e.kind), Some(ParseErrorKind::BadNesting));
}

#[test]
fn test_parser_is_reusable_after_failure() {
    let mut parser = CSSParser::new();
    assert!(parser.consume_input(&"{".repeat(40)).is_none());
    assert!(parser.error().is_some());

    let sheet = parser.consume_input("p { color: red }").unwrap();
    assert!(parser.error().is_none());
    assert_eq!(sheet.len(), 1);
}

#[test]
fn test_take_error() {
    let mut parser = CSSParser::new();
    let _ = parser.consume_css_blocks(&"(".repeat(40));
    assert_eq!(parser.take_error().map(|e| e.kind), Some(ParseErrorKind::BadNesting));
    assert!(parser.error().is_none());
}

#[test]
fn test_valid_leading_rule_survives_failing_tail() {
    let input = format!("p {{ color: red }} a {}", "{".repeat(30));

    let (top, parser) = consume(&input);
    assert_eq!(top.size(), 1);
    assert_eq!(parser.error().map(|e| e.kind), Some(ParseErrorKind::BadNesting));

    let sheet = parse_css(&input).unwrap();
    assert_eq!(sheet.len(), 1);
    assert!(sheet.declarations_for(&Selector::tag("p")).is_some());
}

#[test]
fn test_parsing_is_deterministic() {
    let input = "a, b { color: rgb(1, 2, 3) } @media x { p { y: z } } c { width: 1px }";
    let (first, _) = consume(input);
    let (second, _) = consume(input);
    assert_eq!(first, second);
    assert_eq!(first.debug_str(), second.debug_str());

    let json = |s: &str| serde_json::to_string(&parse_css(s).unwrap()).unwrap();
    assert_eq!(json(input), json(input));
}

#[test]
fn test_nested_rule_is_parsed_without_error() {
    let (top, parser) = consume("div { p { color: red } }");
    assert!(parser.error().is_none());
    assert_eq!(top.size(), 1);

    let sheet = parse_css("div { p { color: red } }").unwrap();
    assert!(sheet.declarations_for(&Selector::tag("p")).is_none());
}

#[test]
fn test_at_rules() {
    let (top, parser) = consume("@import url(x.css); @media screen { p { color: red } }");
    assert!(parser.error().is_none());
    assert_eq!(tags(top.blocks_or_empty()), vec![BlockTag::AtRule, BlockTag::AtRule]);
    assert_eq!(
        top.blocks_or_empty()[0].blocks_or_empty()[0].token_or_empty(),
        &CSSToken::at_keyword("import")
    );

    let sheet = parse_css("@import x; @media screen { p { color: red } }").unwrap();
    assert!(sheet.is_empty());

    let sheet = parse_css("@import x; p { color: red }").unwrap();
    assert_eq!(sheet.len(), 1);
}

#[test]
fn test_cdo_cdc_are_ignored() {
    let (top, parser) = consume("<!-- p { color: red } -->");
    assert!(parser.error().is_none());

    // The trailing `-->` opens a rule that ends empty at EOF.
    assert_eq!(tags(top.blocks_or_empty()), vec![BlockTag::QualifiedRule, BlockTag::QualifiedRule]);
    assert_eq!(top.blocks_or_empty()[0].size(), 2);
    assert!(top.blocks_or_empty()[1].is_empty());
    assert_eq!(parse_css("<!-- p { color: red } -->").unwrap().len(), 1);
}

#[test]
fn test_unterminated_block_is_kept() {
    let sheet = parse_css("em { color: red").unwrap();
    assert_eq!(sheet.len(), 1);
}

#[test]
fn test_scripted_token_source() {
    let tokens = vec![
        CSSToken::ident("a"),
        CSSToken::LeftBrace,
        CSSToken::Whitespace,
        CSSToken::ident("b"),
        CSSToken::RightBrace,
        CSSToken::at_keyword("x"),
        CSSToken::Semicolon,
    ];
    let mut parser = CSSParser::new();
    let top = parser.consume_token_blocks(VecTokenSource::new(tokens));

    assert!(parser.error().is_none());
    assert_eq!(tags(top.blocks_or_empty()), vec![BlockTag::QualifiedRule, BlockTag::AtRule]);
    assert_eq!(top.blocks_or_empty()[1].size(), 1);
}

#[test]
fn test_options_serde() {
    let options: ParserOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(options, ParserOptions::default());
    assert_eq!(options.max_nesting, MAX_NESTING);

    let options: ParserOptions = serde_json::from_str(r#"{"max_nesting": 5}"#).unwrap();
    assert_eq!(options.max_nesting, 5);
}
