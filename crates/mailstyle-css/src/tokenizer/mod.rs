//! CSS tokenizer module.

/// CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod token;
/// Lazy CSS tokenizer and the token-source interface.
#[allow(clippy::module_inception)]
pub mod tokenizer;

pub use token::{CSSToken, HashType, Numeric, NumericType};
pub use tokenizer::{CSSTokenizer, TokenSource, VecTokenSource, tokenize};
