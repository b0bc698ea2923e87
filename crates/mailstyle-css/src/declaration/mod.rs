//! Declaration interpretation.
//!
//! [§ 5.4.6 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations),
//! run over the children of a rule's `{}` block. Only properties that change
//! what a reader of the message sees are kept; the rest are skipped with a
//! one-time warning.

/// Color values and their notations.
pub mod color;
/// Units, keywords, and the value enum.
pub mod value;

use std::str::FromStr;

use mailstyle_common::warning::warn_once;
use serde::Serialize;
use strum_macros::{Display, EnumString};

pub use color::CssColor;
pub use value::{CssDisplay, CssUnit, CssValue, CssVisibility};

use crate::parser::{BlockCursor, BlockTag, CSSParser, ConsumedBlock};
use crate::tokenizer::CSSToken;

/// The properties the interpreter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum CssProperty {
    /// `color`
    Color,
    /// `background-color`
    BackgroundColor,
    /// `background` shorthand; only its color is kept.
    Background,
    /// `font` shorthand; sizes and colors are kept.
    Font,
    /// `font-size`
    FontSize,
    /// `width`
    Width,
    /// `height`
    Height,
    /// `display`
    Display,
    /// `visibility`
    Visibility,
    /// `opacity`
    Opacity,
}

impl CssProperty {
    /// Keep the values this property can use.
    fn interpret(self, values: &[&ConsumedBlock]) -> Vec<CssValue> {
        match self {
            Self::Color | Self::BackgroundColor | Self::Background => {
                first_of(values, CssValue::color_from_block)
            }
            Self::Font => values
                .iter()
                .filter_map(|block| {
                    CssValue::dimension_from_block(block).or_else(|| CssValue::color_from_block(block))
                })
                .collect(),
            Self::FontSize | Self::Width | Self::Height => {
                first_of(values, CssValue::dimension_from_block)
            }
            Self::Display => first_of(values, CssValue::display_from_block),
            Self::Visibility => first_of(values, CssValue::visibility_from_block),
            Self::Opacity => first_of(values, CssValue::opacity_from_block),
        }
    }
}

fn first_of(values: &[&ConsumedBlock], parse: fn(&ConsumedBlock) -> Option<CssValue>) -> Vec<CssValue> {
    values.iter().find_map(|block| parse(block)).into_iter().collect()
}

/// [§ 2 Declarations](https://www.w3.org/TR/css-syntax-3/#declaration)
///
/// One property with its interpreted values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CssRule {
    /// The property name.
    pub property: CssProperty,
    /// Interpreted values, in source order.
    pub values: Vec<CssValue>,
    /// Set by `!important`.
    pub important: bool,
}

impl CssRule {
    /// A rule with the given values.
    #[must_use]
    pub const fn new(property: CssProperty, values: Vec<CssValue>, important: bool) -> Self {
        Self {
            property,
            values,
            important,
        }
    }
}

/// The declarations of one rule block, at most one per property.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DeclarationBlock {
    rules: Vec<CssRule>,
}

impl DeclarationBlock {
    /// An empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
    ///
    /// Add `rule`, replacing an earlier rule for the same property. An
    /// important rule is only replaced by another important one. Returns
    /// `false` if `rule` was discarded.
    pub fn add_rule(&mut self, rule: CssRule) -> bool {
        match self.rules.iter_mut().find(|r| r.property == rule.property) {
            Some(existing) if existing.important && !rule.important => false,
            Some(existing) => {
                *existing = rule;
                true
            }
            None => {
                self.rules.push(rule);
                true
            }
        }
    }

    /// Apply [`DeclarationBlock::add_rule`] for every rule of `other`.
    pub fn merge_block(&mut self, other: &Self) {
        for rule in &other.rules {
            let _ = self.add_rule(rule.clone());
        }
    }

    /// The rule for `property`.
    #[must_use]
    pub fn get(&self, property: CssProperty) -> Option<&CssRule> {
        self.rules.iter().find(|r| r.property == property)
    }

    /// Rules in insertion order.
    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, CssRule> {
        self.rules.iter()
    }

    /// Number of rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// True if no rule was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a DeclarationBlock {
    type Item = &'a CssRule;
    type IntoIter = std::slice::Iter<'a, CssRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

enum State<'a> {
    ExpectProperty,
    ExpectColon(CssProperty),
    Values {
        property: CssProperty,
        values: Vec<&'a ConsumedBlock>,
        important: bool,
        bang: bool,
    },
    SkipToSemicolon,
}

/// Close a declaration, adding it to `block` if any value applies.
fn finish_declaration(
    block: &mut DeclarationBlock,
    property: CssProperty,
    values: &[&ConsumedBlock],
    important: bool,
) {
    let values = property.interpret(values);
    if !values.is_empty() {
        let _ = block.add_rule(CssRule::new(property, values, important));
    }
}

/// Interpret declarations handed over one block at a time.
///
/// `next` must return [`EOF_BLOCK`](crate::parser::EOF_BLOCK) once the
/// blocks are exhausted. Returns `None` if no declaration survived.
#[must_use]
pub fn process_declaration_tokens<'a, F>(mut next: F) -> Option<DeclarationBlock>
where
    F: FnMut() -> &'a ConsumedBlock,
{
    let mut block = DeclarationBlock::new();
    let mut state = State::ExpectProperty;

    loop {
        let item = next();
        if item.is_eof() {
            if let State::Values {
                property,
                values,
                important,
                ..
            } = state
            {
                finish_declaration(&mut block, property, &values, important);
            }
            break;
        }

        let token = item.token_or_empty();
        let is_component = item.tag() == BlockTag::Component;

        state = match state {
            State::ExpectProperty => match token {
                CSSToken::Ident(name) if is_component => match CssProperty::from_str(name) {
                    Ok(property) => State::ExpectColon(property),
                    Err(_) => {
                        let _ = warn_once("CSS", &format!("unsupported property '{name}'"));
                        State::SkipToSemicolon
                    }
                },
                CSSToken::Semicolon => State::ExpectProperty,
                _ => State::SkipToSemicolon,
            },
            State::ExpectColon(property) => match token {
                CSSToken::Colon => State::Values {
                    property,
                    values: Vec::new(),
                    important: false,
                    bang: false,
                },
                CSSToken::Semicolon => State::ExpectProperty,
                _ => State::SkipToSemicolon,
            },
            State::SkipToSemicolon => match token {
                CSSToken::Semicolon => State::ExpectProperty,
                _ => State::SkipToSemicolon,
            },
            State::Values {
                property,
                mut values,
                mut important,
                mut bang,
            } => match token {
                CSSToken::Semicolon => {
                    finish_declaration(&mut block, property, &values, important);
                    State::ExpectProperty
                }
                _ => {
                    match token {
                        CSSToken::Delim('!') => bang = true,
                        CSSToken::Ident(word) if bang && word.eq_ignore_ascii_case("important") => {
                            important = true;
                            bang = false;
                        }
                        _ => {
                            bang = false;
                            values.push(item);
                        }
                    }
                    State::Values {
                        property,
                        values,
                        important,
                        bang,
                    }
                }
            },
        };
    }

    (!block.is_empty()).then_some(block)
}

/// Parse the text of an inline `style` attribute, e.g. `color: red; width: 0`.
#[must_use]
pub fn parse_css_declaration(input: &str) -> Option<DeclarationBlock> {
    let top = CSSParser::new().consume_css_blocks(input);

    match top.blocks_or_empty().first() {
        Some(rule) if rule.tag() == BlockTag::QualifiedRule => {
            let mut cursor = BlockCursor::new(rule.blocks_or_empty());
            process_declaration_tokens(|| cursor.next_block())
        }
        _ => None,
    }
}
