//! CSS front end for mail content filtering.
//!
//! Style sheets found in messages are untrusted input. This crate turns them
//! into a small table of selectors and the declarations that affect what a
//! reader sees, while keeping work bounded for hostile input.
//!
//! # Scope
//!
//! - **CSS Tokenizer** ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization))
//!   - Lazy, on-demand token stream with one token of pushback
//!   - Comment handling and escape sequences
//!
//! - **Block consumer** ([§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing))
//!   - Rules, simple blocks, functions and component values as a generic tree
//!   - A hard nesting ceiling ([`MAX_NESTING`] by default)
//!   - Valid leading rules are kept when trailing input fails
//!
//! - **Selectors** ([Selectors Level 4](https://www.w3.org/TR/selectors-4/))
//!   - Type, class, ID and universal selectors with their ancestors
//!
//! - **Declarations**
//!   - `color`, `background`, `font`, sizes, `display`, `visibility`, `opacity`
//!   - Hex, named, `rgb()` and `hsl()` colors
//!
//! # Not Yet Implemented
//!
//! - At-rule contents (`@media` blocks are consumed and skipped)
//! - Pseudo-classes and attribute selector matching
//!
//! # Example
//!
//! ```
//! use mailstyle_css::{CssProperty, Selector, parse_css};
//!
//! let sheet = parse_css("p, .note { color: red; }").unwrap();
//! assert_eq!(sheet.len(), 2);
//!
//! let decls = sheet.declarations_for(&Selector::tag("p")).unwrap();
//! assert!(decls.borrow().get(CssProperty::Color).is_some());
//! ```

/// Declaration interpretation.
pub mod declaration;
/// Error types.
pub mod error;
/// Parser configuration.
pub mod options;
/// Block consumers per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
pub mod parser;
/// Selector interpretation per [Selectors Level 4](https://www.w3.org/TR/selectors-4/).
pub mod selector;
/// The extracted style sheet.
pub mod stylesheet;
/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

// Re-exports for convenience
pub use declaration::{
    CssColor, CssDisplay, CssProperty, CssRule, CssUnit, CssValue, CssVisibility, DeclarationBlock,
    parse_css_declaration,
};
pub use error::{ParseError, ParseErrorKind, Result};
pub use options::{MAX_NESTING, ParserOptions};
pub use parser::{BlockTag, CSSParser, ConsumedBlock};
pub use selector::{Selector, SelectorKind, parse_selectors};
pub use stylesheet::{SharedDeclarations, StyleSheet};
pub use tokenizer::{CSSToken, CSSTokenizer};

/// Parse a style sheet with default options.
///
/// # Errors
///
/// Fails if no rule could be consumed: with the consumer's error when there
/// was one (for example [`ParseErrorKind::BadNesting`]), otherwise with
/// [`ParseErrorKind::InvalidSyntax`].
pub fn parse_css(input: &str) -> Result<StyleSheet> {
    parse_css_with_options(input, ParserOptions::default())
}

/// Parse a style sheet with explicit options.
///
/// # Errors
///
/// See [`parse_css`].
pub fn parse_css_with_options(input: &str, options: ParserOptions) -> Result<StyleSheet> {
    let mut parser = CSSParser::with_options(options);

    match parser.consume_input(input) {
        Some(sheet) => Ok(sheet),
        None => Err(parser
            .take_error()
            .unwrap_or_else(|| ParseError::invalid_syntax("cannot parse input"))),
    }
}
