//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Default nesting ceiling shared by all block consumers.
pub const MAX_NESTING: usize = 20;

/// Tunables for [`CSSParser`](crate::parser::CSSParser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserOptions {
    /// How deep the block consumers may recurse before the input is
    /// rejected with [`ParseErrorKind::BadNesting`](crate::ParseErrorKind::BadNesting).
    pub max_nesting: usize,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_nesting: MAX_NESTING,
        }
    }
}
