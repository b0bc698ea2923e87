//! Integration tests for the consumed-block tree.

use mailstyle_css::parser::{BlockContent, BlockCursor, BlockTag, ConsumedBlock, EOF_BLOCK};
use mailstyle_css::tokenizer::CSSToken;

fn leaf(name: &str) -> ConsumedBlock {
    ConsumedBlock::with_token(BlockTag::Component, CSSToken::ident(name))
}

#[test]
fn test_new_block_is_empty() {
    let block = ConsumedBlock::new(BlockTag::SimpleBlock);
    assert!(block.is_empty());
    assert_eq!(block.size(), 0);
    assert!(block.blocks_or_empty().is_empty());
    assert_eq!(block.token_or_empty(), &CSSToken::EOF);
    assert!(block.function_or_none().is_none());
}

#[test]
fn test_attach_turns_empty_into_list() {
    let mut block = ConsumedBlock::new(BlockTag::QualifiedRule);
    assert!(block.attach_block(leaf("a")));
    assert!(block.attach_block(leaf("b")));

    assert!(!block.is_empty());
    assert_eq!(block.size(), 2);
    assert!(matches!(block.content(), BlockContent::Blocks(children) if children.len() == 2));
    assert_eq!(block.blocks_or_empty()[1].token_or_empty(), &CSSToken::ident("b"));
}

#[test]
fn test_attach_to_leaf_fails() {
    let mut block = leaf("a");
    assert!(!block.attach_block(leaf("b")));
    assert_eq!(block, leaf("a"));
    assert_eq!(block.size(), 1);
}

#[test]
fn test_attach_to_function_fails() {
    let mut func = ConsumedBlock::function(CSSToken::function("rgb"));
    assert!(!func.attach_block(leaf("b")));
    assert_eq!(func.size(), 0);
}

#[test]
fn test_function_arguments() {
    let mut func = ConsumedBlock::function(CSSToken::function("rgb"));
    assert_eq!(func.tag(), BlockTag::Function);
    assert!(func.add_function_argument(ConsumedBlock::with_token(
        BlockTag::FunctionArg,
        CSSToken::integer(1)
    )));

    let record = func.function_or_none().unwrap();
    assert_eq!(record.function, CSSToken::function("rgb"));
    assert_eq!(record.args.len(), 1);
    assert_eq!(func.size(), 1);
}

#[test]
fn test_add_argument_to_non_function_fails() {
    let mut block = ConsumedBlock::new(BlockTag::SimpleBlock);
    assert!(!block.add_function_argument(leaf("a")));
    assert!(block.is_empty());
}

#[test]
fn test_eof_sentinel() {
    assert!(EOF_BLOCK.is_eof());
    assert_eq!(EOF_BLOCK.tag(), BlockTag::EofBlock);
    assert!(EOF_BLOCK.is_empty());
    assert!(!leaf("a").is_eof());
}

#[test]
fn test_tag_names() {
    assert_eq!(BlockTag::TopBlock.to_string(), "top");
    assert_eq!(BlockTag::QualifiedRule.to_string(), "qualified rule");
    assert_eq!(BlockTag::AtRule.to_string(), "at rule");
    assert_eq!(BlockTag::SimpleBlock.to_string(), "simple block");
    assert_eq!(BlockTag::Function.to_string(), "function");
    assert_eq!(BlockTag::FunctionArg.to_string(), "function arg");
    assert_eq!(BlockTag::Component.to_string(), "component");
    assert_eq!(BlockTag::EofBlock.to_string(), "eof");
}

#[test]
fn test_debug_str() {
    assert_eq!(leaf("a").debug_str(), r#""type": "component", "value": "<ident:a>""#);

    let mut rule = ConsumedBlock::new(BlockTag::QualifiedRule);
    let _ = rule.attach_block(leaf("a"));
    let _ = rule.attach_block(ConsumedBlock::new(BlockTag::SimpleBlock));
    assert_eq!(
        rule.debug_str(),
        r#""type": "qualified rule", "value": [{"type": "component", "value": "<ident:a>"}, {"type": "simple block", "value": "empty"}]"#
    );

    let mut func = ConsumedBlock::function(CSSToken::function("f"));
    let _ = func.add_function_argument(ConsumedBlock::with_token(
        BlockTag::FunctionArg,
        CSSToken::integer(1),
    ));
    assert_eq!(
        func.debug_str(),
        r#""type": "function", "value": { "content": {"token": "<function:f(>", "arguments": [{"type": "function arg", "value": "<number:1>"}]}}"#
    );
}

#[test]
fn test_cursor_returns_eof_forever() {
    let blocks = [leaf("a"), leaf("b")];
    let mut cursor = BlockCursor::new(&blocks);

    assert_eq!(cursor.next_block().token_or_empty(), &CSSToken::ident("a"));
    assert_eq!(cursor.next_block().token_or_empty(), &CSSToken::ident("b"));
    for _ in 0..3 {
        assert!(cursor.next_block().is_eof());
    }
}

#[test]
fn test_cursor_over_nothing() {
    let mut cursor = BlockCursor::new(&[]);
    assert!(std::ptr::eq(cursor.next_block(), &EOF_BLOCK));
}
