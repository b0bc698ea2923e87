//! CSS block consumer.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)

/// The consumed-block tree.
pub mod block;
/// The five block consumers, the driver and [`CSSParser`].
pub mod consumer;
/// Rule extraction into a style sheet.
pub mod extract;

pub use block::{BlockContent, BlockCursor, BlockTag, ConsumedBlock, EOF_BLOCK, FunctionBlock};
pub use consumer::{BlockConsumer, CSSParser, ParseContext};
pub use extract::extract_rules;
