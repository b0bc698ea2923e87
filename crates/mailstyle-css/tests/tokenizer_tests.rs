//! Integration tests for the CSS tokenizer.

use mailstyle_css::tokenizer::{
    CSSToken, CSSTokenizer, HashType, Numeric, NumericType, TokenSource, VecTokenSource, tokenize,
};

/// Helper to tokenize a string and drop whitespace tokens
fn significant(input: &str) -> Vec<CSSToken> {
    tokenize(input).into_iter().filter(|t| !t.is_whitespace()).collect()
}

#[test]
fn test_whitespace() {
    let tokens = tokenize("   \t\n  ");
    assert_eq!(tokens, vec![CSSToken::Whitespace, CSSToken::EOF]);
}

#[test]
fn test_comments_are_skipped() {
    let tokens = tokenize("/* a */p/* b */");
    assert_eq!(tokens, vec![CSSToken::ident("p"), CSSToken::EOF]);
}

#[test]
fn test_unterminated_comment() {
    assert_eq!(tokenize("p /* never closed"), vec![
        CSSToken::ident("p"),
        CSSToken::Whitespace,
        CSSToken::EOF
    ]);
}

#[test]
fn test_simple_rule() {
    assert_eq!(significant("p { color: red; }"), vec![
        CSSToken::ident("p"),
        CSSToken::LeftBrace,
        CSSToken::ident("color"),
        CSSToken::Colon,
        CSSToken::ident("red"),
        CSSToken::Semicolon,
        CSSToken::RightBrace,
        CSSToken::EOF,
    ]);
}

#[test]
fn test_function_and_at_keyword() {
    assert_eq!(significant("@media rgb(1)"), vec![
        CSSToken::at_keyword("media"),
        CSSToken::function("rgb"),
        CSSToken::integer(1),
        CSSToken::RightParen,
        CSSToken::EOF,
    ]);
}

#[test]
fn test_hash_types() {
    let tokens = tokenize("#main #123");
    assert_eq!(tokens[0], CSSToken::hash_id("main"));
    assert_eq!(tokens[2], CSSToken::Hash {
        value: "123".to_string(),
        hash_type: HashType::Unrestricted,
    });
}

#[test]
fn test_numeric_tokens() {
    let tokens = significant("10px 50% -1 0.5 +2");
    assert_eq!(tokens[0], CSSToken::dimension(Numeric::integer(10), "px"));
    assert_eq!(tokens[1], CSSToken::Percentage(Numeric::integer(50)));
    assert_eq!(tokens[2], CSSToken::integer(-1));
    match &tokens[3] {
        CSSToken::Number(n) => {
            assert_eq!(n.numeric_type, NumericType::Number);
            assert!((n.value - 0.5).abs() < f64::EPSILON);
            assert_eq!(n.int_value, None);
        }
        other => panic!("Expected Number token, got {other}"),
    }
    assert_eq!(tokens[4], CSSToken::integer(2));
}

#[test]
fn test_cdo_cdc() {
    assert_eq!(significant("<!-- p -->"), vec![
        CSSToken::CDO,
        CSSToken::ident("p"),
        CSSToken::CDC,
        CSSToken::EOF
    ]);
}

#[test]
fn test_strings() {
    let tokens = tokenize("'a\\'b' \"x\ny");
    assert_eq!(tokens[0], CSSToken::String("a'b".to_string()));
    assert_eq!(tokens[2], CSSToken::BadString);
}

#[test]
fn test_url_tokens() {
    assert_eq!(tokenize("url(x.png)")[0], CSSToken::Url("x.png".to_string()));
    assert_eq!(tokenize("url( x.png )")[0], CSSToken::Url("x.png".to_string()));
    assert_eq!(tokenize("url(a b)")[0], CSSToken::BadUrl);
    assert_eq!(tokenize("url('x.png')")[0], CSSToken::function("url"));
}

#[test]
fn test_important_is_delim_and_ident() {
    assert_eq!(significant("!important"), vec![
        CSSToken::Delim('!'),
        CSSToken::ident("important"),
        CSSToken::EOF
    ]);
}

#[test]
fn test_escapes_in_ident() {
    assert_eq!(tokenize("\\41 b")[0], CSSToken::ident("Ab"));
}

#[test]
fn test_pushback_restores_one_token() {
    let mut tokenizer = CSSTokenizer::new("a b");
    let first = tokenizer.next_token();
    assert_eq!(first, CSSToken::ident("a"));

    tokenizer.pushback_token(first);
    assert_eq!(tokenizer.next_token(), CSSToken::ident("a"));
    assert_eq!(tokenizer.next_token(), CSSToken::Whitespace);
    assert_eq!(tokenizer.next_token(), CSSToken::ident("b"));
}

#[test]
fn test_eof_is_idempotent() {
    let mut tokenizer = CSSTokenizer::new("a");
    let _ = tokenizer.next_token();
    for _ in 0..5 {
        assert_eq!(tokenizer.next_token(), CSSToken::EOF);
    }

    let mut source = VecTokenSource::new(vec![CSSToken::Comma]);
    assert_eq!(source.next_token(), CSSToken::Comma);
    assert_eq!(source.next_token(), CSSToken::EOF);
    assert_eq!(source.next_token(), CSSToken::EOF);
}

#[test]
fn test_into_tokens_ends_with_eof() {
    let tokens = CSSTokenizer::new("a{}").into_tokens();
    assert_eq!(tokens.last(), Some(&CSSToken::EOF));
    assert_eq!(tokens.len(), 4);
}
