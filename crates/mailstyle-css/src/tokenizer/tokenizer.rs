use super::token::{CSSToken, HashType, Numeric, NumericType};

/// The interface the block consumers read tokens through.
///
/// Exactly one token of pushback is supported: a pushed-back token is
/// returned by the next call to [`TokenSource::next_token`]. Once the end of
/// input is reached, every further call returns [`CSSToken::EOF`] again.
pub trait TokenSource {
    /// Return the next token, or EOF.
    fn next_token(&mut self) -> CSSToken;

    /// Restore `token` so that it is returned by the next `next_token` call.
    ///
    /// Pushing back twice without reading in between replaces the first
    /// token.
    fn pushback_token(&mut self, token: CSSToken);
}

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// A lazy CSS tokenizer: tokens are lexed on demand by
/// [`TokenSource::next_token`], so a consumer that stops early never pays
/// for the rest of the input.
pub struct CSSTokenizer {
    /// The preprocessed input
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Token restored by `pushback_token`
    pushback: Option<CSSToken>,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: preprocess(input),
            position: 0,
            pushback: None,
        }
    }

    /// Lex the whole input, returning every token up to and including EOF.
    #[must_use]
    pub fn into_tokens(mut self) -> Vec<CSSToken> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                return tokens;
            }
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CSSToken {
        self.consume_comments();

        let Some(c) = self.consume() else {
            return CSSToken::EOF;
        };

        match c {
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }
            '"' | '\'' => self.consume_string_token(c),
            '#' => self.consume_hash(),
            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,
            ',' => CSSToken::Comma,
            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,
            '[' => CSSToken::LeftBracket,
            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,
            '+' | '.' => {
                if self.starts_number(Some(c), 0) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim(c)
                }
            }
            '-' => {
                if self.starts_number(Some('-'), 0) {
                    self.reconsume();
                    self.consume_numeric_token()
                } else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    self.position += 2;
                    CSSToken::CDC
                } else if self.starts_ident(Some('-'), 0) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('-')
                }
            }
            '<' => {
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    self.position += 3;
                    CSSToken::CDO
                } else {
                    CSSToken::Delim('<')
                }
            }
            '@' => {
                if self.starts_ident(self.peek(), 1) {
                    CSSToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CSSToken::Delim('@')
                }
            }
            '\\' => {
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('\\')
                }
            }
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }
            c => CSSToken::Delim(c),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.position += 2;
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        self.position += 1;
                        break;
                    }
                    Some(_) => {}
                    None => return,
                }
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }
    }

    /// `#` followed by a name is a hash token, otherwise a delim.
    fn consume_hash(&mut self) -> CSSToken {
        if self.peek().is_some_and(is_ident_code_point)
            || is_valid_escape(self.peek(), self.peek_at(1))
        {
            let hash_type = if self.starts_ident(self.peek(), 1) {
                HashType::Id
            } else {
                HashType::Unrestricted
            };
            CSSToken::Hash {
                value: self.consume_ident_sequence(),
                hash_type,
            }
        } else {
            CSSToken::Delim('#')
        }
    }

    /// [§ 4.3.4 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string_token(&mut self, ending: char) -> CSSToken {
        let mut value = String::new();

        loop {
            match self.consume() {
                Some(c) if c == ending => return CSSToken::String(value),
                // Unterminated at EOF is still a string.
                None => return CSSToken::String(value),
                Some('\n') => {
                    self.reconsume();
                    return CSSToken::BadString;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => self.position += 1,
                    Some(_) => value.push(self.consume_escaped_code_point()),
                },
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.5 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric_token(&mut self) -> CSSToken {
        let numeric = self.consume_number();

        if self.starts_ident(self.peek(), 1) {
            CSSToken::Dimension {
                numeric,
                unit: self.consume_ident_sequence(),
            }
        } else if self.peek() == Some('%') {
            self.position += 1;
            CSSToken::Percentage(numeric)
        } else {
            CSSToken::Number(numeric)
        }
    }

    /// [§ 4.3.6 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like_token(&mut self) -> CSSToken {
        let name = self.consume_ident_sequence();

        if self.peek() != Some('(') {
            return CSSToken::Ident(name);
        }
        self.position += 1;

        if name.eq_ignore_ascii_case("url") {
            self.consume_whitespace();
            if !matches!(self.peek(), Some('"' | '\'')) {
                return self.consume_url_token();
            }
        }
        CSSToken::Function(name)
    }

    /// [§ 4.3.7 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url_token(&mut self) -> CSSToken {
        let mut value = String::new();

        loop {
            match self.consume() {
                Some(')') | None => return CSSToken::Url(value),
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    return match self.peek() {
                        Some(')') => {
                            self.position += 1;
                            CSSToken::Url(value)
                        }
                        None => CSSToken::Url(value),
                        Some(_) => {
                            self.consume_bad_url_remnants();
                            CSSToken::BadUrl
                        }
                    };
                }
                Some('"' | '\'' | '(') => {
                    self.consume_bad_url_remnants();
                    return CSSToken::BadUrl;
                }
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escaped_code_point());
                    } else {
                        self.consume_bad_url_remnants();
                        return CSSToken::BadUrl;
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') if is_valid_escape(Some('\\'), self.peek()) => {
                    let _ = self.consume_escaped_code_point();
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();

        while let Some(c) = self.peek() {
            if is_ident_code_point(c) {
                self.position += 1;
                result.push(c);
            } else if is_valid_escape(Some(c), self.peek_at(1)) {
                self.position += 1;
                result.push(self.consume_escaped_code_point());
            } else {
                break;
            }
        }

        result
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> Numeric {
        let start = self.position;
        let mut numeric_type = NumericType::Integer;

        if matches!(self.peek(), Some('+' | '-')) {
            self.position += 1;
        }
        self.consume_digits();

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
            self.consume_digits();
            numeric_type = NumericType::Number;
        }

        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_at(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_at(digit_at).is_some_and(|c| c.is_ascii_digit()) {
                self.position += digit_at;
                self.consume_digits();
                numeric_type = NumericType::Number;
            }
        }

        let repr: String = self.input[start..self.position].iter().collect();
        let value = repr.parse().unwrap_or(0.0);
        let int_value = match numeric_type {
            NumericType::Integer => repr.parse().ok(),
            NumericType::Number => None,
        };

        Numeric {
            value,
            int_value,
            numeric_type,
        }
    }

    fn consume_digits(&mut self) {
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.position += 1;
        }
    }

    /// [§ 4.3.13 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    ///
    /// The backslash has already been consumed.
    fn consume_escaped_code_point(&mut self) -> char {
        let Some(c) = self.consume() else {
            return char::REPLACEMENT_CHARACTER;
        };
        let Some(first) = c.to_digit(16) else {
            return c;
        };

        let mut code_point = first;
        for _ in 0..5 {
            match self.peek().and_then(|c| c.to_digit(16)) {
                Some(digit) => {
                    code_point = code_point * 16 + digit;
                    self.position += 1;
                }
                None => break,
            }
        }
        if self.peek().is_some_and(is_whitespace) {
            self.position += 1;
        }

        match code_point {
            0 => char::REPLACEMENT_CHARACTER,
            cp => char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER),
        }
    }

    /// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
    ///
    /// `first` is the first code point; `offset` is where the second one
    /// sits relative to the current position.
    fn starts_ident(&self, first: Option<char>, offset: usize) -> bool {
        match first {
            Some('-') => {
                let second = self.peek_at(offset);
                second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                    || is_valid_escape(second, self.peek_at(offset + 1))
            }
            Some('\\') => is_valid_escape(Some('\\'), self.peek_at(offset)),
            Some(c) => is_ident_start_code_point(c),
            None => false,
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn starts_number(&self, first: Option<char>, offset: usize) -> bool {
        let is_digit = |c: Option<char>| c.is_some_and(|c| c.is_ascii_digit());
        match first {
            Some('+' | '-') => {
                let second = self.peek_at(offset);
                is_digit(second) || (second == Some('.') && is_digit(self.peek_at(offset + 1)))
            }
            Some('.') => is_digit(self.peek_at(offset)),
            c => is_digit(c),
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied()?;
        self.position += 1;
        Some(c)
    }

    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

impl TokenSource for CSSTokenizer {
    fn next_token(&mut self) -> CSSToken {
        match self.pushback.take() {
            Some(token) => token,
            None => self.consume_token(),
        }
    }

    fn pushback_token(&mut self, token: CSSToken) {
        self.pushback = Some(token);
    }
}

/// A token source over a pre-made list of tokens.
///
/// Useful to drive the block consumers with token streams the tokenizer
/// would never produce.
#[derive(Debug, Default)]
pub struct VecTokenSource {
    tokens: std::vec::IntoIter<CSSToken>,
    pushback: Option<CSSToken>,
}

impl VecTokenSource {
    /// Create a source yielding `tokens`, then EOF forever.
    #[must_use]
    pub fn new(tokens: Vec<CSSToken>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            pushback: None,
        }
    }
}

impl TokenSource for VecTokenSource {
    fn next_token(&mut self) -> CSSToken {
        self.pushback
            .take()
            .or_else(|| self.tokens.next())
            .unwrap_or(CSSToken::EOF)
    }

    fn pushback_token(&mut self, token: CSSToken) {
        self.pushback = Some(token);
    }
}

/// Tokenize `input` completely.
#[must_use]
pub fn tokenize(input: &str) -> Vec<CSSToken> {
    CSSTokenizer::new(input).into_tokens()
}

/// [§ 3.3 Preprocessing the input stream](https://www.w3.org/TR/css-syntax-3/#input-preprocessing)
///
/// CR, FF and CR LF become LF; NUL becomes U+FFFD.
fn preprocess(input: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(input.len());
    let mut chars = input.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                let _ = chars.next_if_eq(&'\n');
                out.push('\n');
            }
            '\x0C' => out.push('\n'),
            '\0' => out.push(char::REPLACEMENT_CHARACTER),
            c => out.push(c),
        }
    }
    out
}

/// [§ 4.2 Definitions - whitespace](https://www.w3.org/TR/css-syntax-3/#whitespace)
const fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ')
}

/// [§ 4.2 Definitions - ident-start code point](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
const fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// [§ 4.2 Definitions - ident code point](https://www.w3.org/TR/css-syntax-3/#ident-code-point)
const fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second.is_some_and(|c| c != '\n')
}
