//! Selector interpretation.
//!
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/), reduced to what a
//! mail filter needs: type, class, id and universal selectors plus the
//! ancestors or compound parts they depend on. Pseudo-classes make a
//! selector unusable and it is dropped; attribute selectors are ignored.

use std::fmt;
use std::mem;

use serde::Serialize;
use strum_macros::Display;

use crate::parser::{BlockCursor, BlockTag, CSSParser, ConsumedBlock};
use crate::tokenizer::CSSToken;

/// [§ 5 Elemental selectors](https://www.w3.org/TR/selectors-4/#elemental-selectors)
/// [§ 6 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-selectors)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SelectorKind {
    /// "A type selector is the name of a document language element type"
    Tag,
    /// `.name`
    Class,
    /// `#name`
    Id,
    /// "The universal selector is a special type selector, that represents
    /// an element of any element type."
    All,
}

/// One simple selector and the selectors it depends on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Selector {
    /// What is matched.
    pub kind: SelectorKind,
    /// Tag name (lower-cased), class name or id. `*` for [`SelectorKind::All`].
    pub value: String,
    /// Selectors that must also hold for an element to match, outermost
    /// first. These come from compound (`p.note`) and descendant (`div p`)
    /// forms, which are not told apart.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<Self>,
}

impl Selector {
    /// A selector with no dependencies.
    #[must_use]
    pub fn new(kind: SelectorKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
            dependencies: Vec::new(),
        }
    }

    /// A type selector; the name is lower-cased.
    #[must_use]
    pub fn tag(name: &str) -> Self {
        Self::new(SelectorKind::Tag, name.to_ascii_lowercase())
    }

    /// A class selector.
    #[must_use]
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(SelectorKind::Class, name)
    }

    /// An id selector.
    #[must_use]
    pub fn id(name: impl Into<String>) -> Self {
        Self::new(SelectorKind::Id, name)
    }

    /// The universal selector.
    #[must_use]
    pub fn all() -> Self {
        Self::new(SelectorKind::All, "*")
    }

    fn write_simple(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SelectorKind::Tag | SelectorKind::All => f.write_str(&self.value),
            SelectorKind::Class => write!(f, ".{}", self.value),
            SelectorKind::Id => write!(f, "#{}", self.value),
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for dep in &self.dependencies {
            dep.write_simple(f)?;
            f.write_str(" ")?;
        }
        self.write_simple(f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a simple selector, a combinator or a comma.
    Start,
    /// After a `.` delim.
    ExpectClass,
    /// After a `#` delim.
    ExpectId,
    /// After a pseudo-class; waiting for the next comma.
    SkipToComma,
}

/// Interpret a selector list handed over one block at a time.
///
/// `next` must return [`EOF_BLOCK`](crate::parser::EOF_BLOCK) once the
/// blocks are exhausted. Selectors completed before an unsupported token are
/// kept; the one being built when it arrives is discarded.
#[must_use]
pub fn process_selector_tokens<'a, F>(mut next: F) -> Vec<Selector>
where
    F: FnMut() -> &'a ConsumedBlock,
{
    let mut selectors = Vec::new();
    let mut current: Option<Selector> = None;
    let mut state = State::Start;

    loop {
        let block = next();

        match block.tag() {
            BlockTag::Component => {}
            BlockTag::EofBlock => {
                if state == State::Start {
                    selectors.extend(current.take());
                }
                break;
            }
            // `[attr]` and anything inside a pseudo-class.
            BlockTag::SimpleBlock if state == State::Start => continue,
            _ if state == State::SkipToComma => continue,
            _ => break,
        }

        let token = block.token_or_empty();
        match state {
            State::SkipToComma => {
                if *token == CSSToken::Comma {
                    state = State::Start;
                }
            }
            State::ExpectClass | State::ExpectId => {
                let CSSToken::Ident(name) = token else {
                    break;
                };
                let selector = if state == State::ExpectClass {
                    Selector::class(name.as_str())
                } else {
                    Selector::id(name.as_str())
                };
                push_simple(&mut current, selector);
                state = State::Start;
            }
            State::Start => match token {
                CSSToken::Ident(name) => push_simple(&mut current, Selector::tag(name)),
                CSSToken::Hash { value, .. } => push_simple(&mut current, Selector::id(value.as_str())),
                CSSToken::Delim('.') => state = State::ExpectClass,
                CSSToken::Delim('#') => state = State::ExpectId,
                CSSToken::Delim('*') => push_simple(&mut current, Selector::all()),
                CSSToken::Delim('>' | '+' | '~') => {}
                CSSToken::Colon => {
                    current = None;
                    state = State::SkipToComma;
                }
                CSSToken::Comma => selectors.extend(current.take()),
                _ => break,
            },
        }
    }

    selectors
}

/// Make `selector` the one being built; the previous one becomes its last
/// dependency.
fn push_simple(current: &mut Option<Selector>, mut selector: Selector) {
    if let Some(mut prev) = current.take() {
        selector.dependencies = mem::take(&mut prev.dependencies);
        selector.dependencies.push(prev);
    }
    *current = Some(selector);
}

/// Parse standalone selector text such as `div p, .note`.
#[must_use]
pub fn parse_selectors(input: &str) -> Vec<Selector> {
    let top = CSSParser::new().consume_css_blocks(input);

    match top.blocks_or_empty().first() {
        Some(rule) if rule.tag() == BlockTag::QualifiedRule => {
            let mut cursor = BlockCursor::new(rule.blocks_or_empty());
            process_selector_tokens(|| cursor.next_block())
        }
        _ => Vec::new(),
    }
}
