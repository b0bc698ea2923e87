//! Turning consumed rules into a [`StyleSheet`].

use std::cell::RefCell;
use std::rc::Rc;

use mailstyle_common::warning::warn_once;
use tracing::debug;

use super::block::{BlockCursor, BlockTag, ConsumedBlock};
use super::consumer::CSSParser;
use crate::declaration::process_declaration_tokens;
use crate::selector::process_selector_tokens;
use crate::stylesheet::StyleSheet;
use crate::tokenizer::CSSToken;

impl CSSParser {
    /// Consume `input` and extract its rules.
    ///
    /// `None` means no rule was consumed at all; [`CSSParser::error`] tells
    /// whether that was caused by a failure.
    pub fn consume_input(&mut self, input: &str) -> Option<StyleSheet> {
        let top = self.consume_css_blocks(input);
        extract_rules(&top)
    }
}

/// Build a style sheet from the children of a top-level block.
///
/// Returns `None` if `top` has no children. Rules that yield no selector or
/// no declaration are skipped silently; at-rules are skipped with a warning.
#[must_use]
pub fn extract_rules(top: &ConsumedBlock) -> Option<StyleSheet> {
    let rules = top.blocks_or_empty();
    if rules.is_empty() {
        debug!("no rules consumed");
        return None;
    }

    let mut sheet = StyleSheet::new();
    for rule in rules {
        match rule.tag() {
            BlockTag::QualifiedRule => extract_rule(rule, &mut sheet),
            BlockTag::AtRule => match at_rule_name(rule) {
                Some(name) => {
                    let _ = warn_once("CSS", &format!("at-rule '@{name}' is not supported"));
                }
                None => debug!(len = rule.size(), "skipped at-rule without a name"),
            },
            tag => debug!(tag = %tag, "unexpected top-level block"),
        }
    }

    debug!(selectors = sheet.len(), "extracted rules");
    Some(sheet)
}

/// The name of an at-rule, taken from its leading at-keyword.
fn at_rule_name(rule: &ConsumedBlock) -> Option<&str> {
    match rule.blocks_or_empty().first()?.token_or_empty() {
        CSSToken::AtKeyword(name) => Some(name),
        _ => None,
    }
}

fn extract_rule(rule: &ConsumedBlock, sheet: &mut StyleSheet) {
    let children = rule.blocks_or_empty();
    if children.len() <= 1 || children[0].tag() != BlockTag::Component {
        return;
    }

    let Some(body) = children.iter().position(|c| c.tag() == BlockTag::SimpleBlock) else {
        return;
    };

    let mut preamble = BlockCursor::new(&children[..body]);
    let selectors = process_selector_tokens(|| preamble.next_block());
    if selectors.is_empty() {
        return;
    }

    let mut contents = BlockCursor::new(children[body].blocks_or_empty());
    let Some(declarations) = process_declaration_tokens(|| contents.next_block()) else {
        return;
    };
    if declarations.is_empty() {
        return;
    }

    let shared = Rc::new(RefCell::new(declarations));
    for selector in selectors {
        sheet.add_selector_rule(selector, &shared);
    }
}
