//! CSS Token types per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Tokens are consumed at most once by the block consumers. Each token owns
//! its payload, so a token moved into the consumed-block tree needs no
//! reference back into the source text.

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<hash-token>` with the type flag set to 'id'... or 'unrestricted'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// The value would start an ident sequence.
    Id,
    /// Anything else.
    Unrestricted,
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// "A `<number-token>` has a type flag set to either 'integer' or 'number'."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    /// No fractional part and no exponent.
    Integer,
    /// The literal had a fractional part or an exponent.
    Number,
}

/// A numeric payload shared by number, percentage, and dimension tokens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Numeric {
    /// The converted value.
    pub value: f64,
    /// The exact value when the literal was an integer that fits in `i64`.
    pub int_value: Option<i64>,
    /// The type flag.
    pub numeric_type: NumericType,
}

impl Numeric {
    /// An integer numeric value.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn integer(value: i64) -> Self {
        Self {
            value: value as f64,
            int_value: Some(value),
            numeric_type: NumericType::Integer,
        }
    }

    /// A non-integer numeric value.
    #[must_use]
    pub const fn number(value: f64) -> Self {
        Self {
            value,
            int_value: None,
            numeric_type: NumericType::Number,
        }
    }
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
///
/// One syntax token produced by [`CSSTokenizer`](super::CSSTokenizer).
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// `<ident-token>`
    Ident(String),
    /// `<function-token>`, the name without the trailing `(`.
    Function(String),
    /// `<at-keyword-token>`, the name without the leading `@`.
    AtKeyword(String),
    /// `<hash-token>`, the value without the leading `#`.
    Hash {
        /// The name after `#`.
        value: String,
        /// Whether the value is a valid identifier.
        hash_type: HashType,
    },
    /// `<string-token>`, unquoted and unescaped.
    String(String),
    /// `<bad-string-token>`: a string interrupted by a newline.
    BadString,
    /// `<url-token>` for an unquoted `url(...)`.
    Url(String),
    /// `<bad-url-token>`
    BadUrl,
    /// `<delim-token>`
    Delim(char),
    /// `<number-token>`
    Number(Numeric),
    /// `<percentage-token>`
    Percentage(Numeric),
    /// `<dimension-token>`
    Dimension {
        /// The number before the unit.
        numeric: Numeric,
        /// The unit exactly as written.
        unit: String,
    },
    /// `<whitespace-token>`
    Whitespace,
    /// `<CDO-token>` (`<!--`)
    CDO,
    /// `<CDC-token>` (`-->`)
    CDC,
    /// `<colon-token>`
    Colon,
    /// `<semicolon-token>`
    Semicolon,
    /// `<comma-token>`
    Comma,
    /// `<[-token>`
    LeftBracket,
    /// `<]-token>`
    RightBracket,
    /// `<(-token>`
    LeftParen,
    /// `<)-token>`
    RightParen,
    /// `<{-token>`
    LeftBrace,
    /// `<}-token>`
    RightBrace,
    /// End of input. Returned again on every read past the end.
    EOF,
}

impl CSSToken {
    /// Create a new ident token.
    #[must_use]
    pub fn ident(value: impl Into<String>) -> Self {
        Self::Ident(value.into())
    }

    /// Create a new function token.
    #[must_use]
    pub fn function(name: impl Into<String>) -> Self {
        Self::Function(name.into())
    }

    /// Create a new at-keyword token.
    #[must_use]
    pub fn at_keyword(value: impl Into<String>) -> Self {
        Self::AtKeyword(value.into())
    }

    /// Create a new hash token with id type.
    #[must_use]
    pub fn hash_id(value: impl Into<String>) -> Self {
        Self::Hash {
            value: value.into(),
            hash_type: HashType::Id,
        }
    }

    /// Create a new integer number token.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Number(Numeric::integer(value))
    }

    /// Create a new dimension token.
    #[must_use]
    pub fn dimension(numeric: Numeric, unit: impl Into<String>) -> Self {
        Self::Dimension {
            numeric,
            unit: unit.into(),
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }

    /// Returns true if this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, Self::Whitespace)
    }

    /// For `{`, `(` and `[` return the token that closes the block.
    #[must_use]
    pub const fn closing_token(&self) -> Option<Self> {
        match self {
            Self::LeftBrace => Some(Self::RightBrace),
            Self::LeftParen => Some(Self::RightParen),
            Self::LeftBracket => Some(Self::RightBracket),
            _ => None,
        }
    }

    /// The delimiter character, if this is a delim token.
    #[must_use]
    pub const fn delim(&self) -> Option<char> {
        match self {
            Self::Delim(c) => Some(*c),
            _ => None,
        }
    }

    /// The textual payload of ident-like tokens, or `None`.
    #[must_use]
    pub fn string_value(&self) -> Option<&str> {
        match self {
            Self::Ident(v)
            | Self::Function(v)
            | Self::AtKeyword(v)
            | Self::String(v)
            | Self::Url(v)
            | Self::Hash { value: v, .. } => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for CSSToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(v) => write!(f, "<ident:{v}>"),
            Self::Function(v) => write!(f, "<function:{v}(>"),
            Self::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            Self::Hash { value, hash_type } => {
                let t = match hash_type {
                    HashType::Id => "id",
                    HashType::Unrestricted => "unrestricted",
                };
                write!(f, "<hash:#{value} ({t})>")
            }
            Self::String(v) => write!(f, "<string:\"{v}\">"),
            Self::BadString => f.write_str("<bad-string>"),
            Self::Url(v) => write!(f, "<url:{v}>"),
            Self::BadUrl => f.write_str("<bad-url>"),
            Self::Delim(c) => write!(f, "<delim:{c}>"),
            Self::Number(n) => write!(f, "<number:{}>", n.value),
            Self::Percentage(n) => write!(f, "<percentage:{}%>", n.value),
            Self::Dimension { numeric, unit } => write!(f, "<dimension:{}{unit}>", numeric.value),
            Self::Whitespace => f.write_str("<whitespace>"),
            Self::CDO => f.write_str("<CDO>"),
            Self::CDC => f.write_str("<CDC>"),
            Self::Colon => f.write_str("<colon>"),
            Self::Semicolon => f.write_str("<semicolon>"),
            Self::Comma => f.write_str("<comma>"),
            Self::LeftBracket => f.write_str("<[>"),
            Self::RightBracket => f.write_str("<]>"),
            Self::LeftParen => f.write_str("<(>"),
            Self::RightParen => f.write_str("<)>"),
            Self::LeftBrace => f.write_str("<{>"),
            Self::RightBrace => f.write_str("<}>"),
            Self::EOF => f.write_str("<EOF>"),
        }
    }
}
