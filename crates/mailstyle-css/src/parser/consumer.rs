//! Block consumers per [§ 5.4 Parser Algorithms](https://www.w3.org/TR/css-syntax-3/#parser-algorithms).
//!
//! Five mutually recursive productions (component value, function, simple
//! block, qualified rule, at-rule) build a [`ConsumedBlock`] tree from a
//! [`TokenSource`]. They share one [`ParseContext`]:
//!
//! - a recursion depth with a hard ceiling, so hostile nesting is rejected
//!   instead of exhausting the stack;
//! - an EOF latch: once any consumer sees EOF, every consumer on the stack
//!   stops reading and unwinds;
//! - an error slot holding the first failure.
//!
//! Every consumer fails fast: an error from a nested production is returned
//! immediately with `?`.

use tracing::{debug, warn};

use super::block::{BlockTag, ConsumedBlock};
use crate::error::{ParseError, Result};
use crate::options::ParserOptions;
use crate::tokenizer::{CSSToken, CSSTokenizer, TokenSource};

/// State shared by all consumers during one parse.
#[derive(Debug)]
pub struct ParseContext {
    depth: usize,
    max_nesting: usize,
    eof: bool,
    error: Option<ParseError>,
}

impl ParseContext {
    /// A fresh context allowing `max_nesting` levels.
    #[must_use]
    pub const fn new(max_nesting: usize) -> Self {
        Self {
            depth: 0,
            max_nesting,
            eof: false,
            error: None,
        }
    }

    /// Current recursion depth.
    #[must_use]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// True once EOF has been seen.
    #[must_use]
    pub const fn eof(&self) -> bool {
        self.eof
    }

    /// The first error recorded, if any.
    #[must_use]
    pub const fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Record `error` unless an earlier one is already held.
    fn fail(&mut self, error: ParseError) -> ParseError {
        if self.error.is_none() {
            self.error = Some(error.clone());
        }
        error
    }
}

/// The consumers themselves: a token source plus the shared context.
pub struct BlockConsumer<'a, T: TokenSource> {
    tokens: &'a mut T,
    ctx: &'a mut ParseContext,
}

impl<'a, T: TokenSource> BlockConsumer<'a, T> {
    /// Consumers reading from `tokens` and sharing `ctx`.
    #[must_use]
    pub const fn new(tokens: &'a mut T, ctx: &'a mut ParseContext) -> Self {
        Self { tokens, ctx }
    }

    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    ///
    /// Drive the consumers over the whole input. Stops at EOF or at the
    /// first failure; rules collected before a failure are kept.
    pub fn consume_stylesheet(&mut self) -> ConsumedBlock {
        let mut top = ConsumedBlock::new(BlockTag::TopBlock);

        while !self.ctx.eof {
            let result = match self.next_token() {
                CSSToken::Whitespace => Ok(()),
                CSSToken::EOF => {
                    self.ctx.eof = true;
                    Ok(())
                }
                token @ CSSToken::AtKeyword(_) => {
                    self.tokens.pushback_token(token);
                    self.consume_at_rule(&mut top)
                }
                token => {
                    self.tokens.pushback_token(token);
                    self.consume_qualified_rule(&mut top)
                }
            };

            if let Err(err) = result {
                debug!(error = %err, rules = top.size(), "stop consuming rules");
                break;
            }
        }

        top
    }

    /// [§ 5.4.9 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    ///
    /// Produces at most one block and attaches it to `parent`. Whitespace is
    /// skipped; EOF produces nothing.
    pub fn consume_component_value(&mut self, parent: &mut ConsumedBlock) -> Result<()> {
        self.nested("component", parent.tag(), |this| {
            let mut block = None;

            while block.is_none() && !this.ctx.eof {
                match this.next_token() {
                    CSSToken::EOF => this.ctx.eof = true,
                    CSSToken::Whitespace => {}
                    token @ CSSToken::Function(_) => {
                        let mut func = ConsumedBlock::function(token);
                        this.consume_function(&mut func)?;
                        block = Some(func);
                    }
                    token => match token.closing_token() {
                        Some(end) => {
                            // The opening token is already consumed, so the
                            // new block is filled directly.
                            let mut simple = ConsumedBlock::new(BlockTag::SimpleBlock);
                            this.consume_simple_block(&mut simple, &end, true)?;
                            block = Some(simple);
                        }
                        None => {
                            block = Some(ConsumedBlock::with_token(BlockTag::Component, token));
                        }
                    },
                }
            }

            if let Some(block) = block {
                attach(parent, block);
            }
            Ok(())
        })
    }

    /// [§ 5.4.10 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    ///
    /// Reads up to the closing `)`. Commas, delims and stray `(` between
    /// arguments are dropped; every other token is one argument, a nested
    /// function token is one nested function argument.
    pub fn consume_function(&mut self, func: &mut ConsumedBlock) -> Result<()> {
        self.nested("function", func.tag(), |this| {
            while !this.ctx.eof {
                match this.next_token() {
                    CSSToken::EOF => this.ctx.eof = true,
                    CSSToken::RightParen => break,
                    CSSToken::Whitespace
                    | CSSToken::Comma
                    | CSSToken::Delim(_)
                    | CSSToken::LeftParen => {}
                    token @ CSSToken::Function(_) => {
                        let mut inner = ConsumedBlock::function(token);
                        this.consume_function(&mut inner)?;
                        add_argument(func, inner);
                    }
                    token => add_argument(func, ConsumedBlock::with_token(BlockTag::FunctionArg, token)),
                }
            }
            Ok(())
        })
    }

    /// [§ 5.4.8 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    ///
    /// Reads component values until `end` or EOF. With `consume_current`
    /// the values go straight into `parent` (whose opening token the caller
    /// already consumed) and no depth level is used; otherwise a new simple
    /// block is built and attached to `parent`.
    pub fn consume_simple_block(
        &mut self,
        parent: &mut ConsumedBlock,
        end: &CSSToken,
        consume_current: bool,
    ) -> Result<()> {
        if consume_current {
            return self.consume_block_contents(parent, end);
        }

        self.nested("simple block", parent.tag(), |this| {
            let mut block = ConsumedBlock::new(BlockTag::SimpleBlock);
            this.consume_block_contents(&mut block, end)?;
            attach(parent, block);
            Ok(())
        })
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    ///
    /// Component values up to the first `{`, then that block, then stop.
    pub fn consume_qualified_rule(&mut self, parent: &mut ConsumedBlock) -> Result<()> {
        self.consume_rule(parent, BlockTag::QualifiedRule)
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// Like a qualified rule, but a bare `;` also ends it.
    pub fn consume_at_rule(&mut self, parent: &mut ConsumedBlock) -> Result<()> {
        self.consume_rule(parent, BlockTag::AtRule)
    }

    fn consume_rule(&mut self, parent: &mut ConsumedBlock, tag: BlockTag) -> Result<()> {
        self.nested(tag.into(), parent.tag(), |this| {
            let mut rule = ConsumedBlock::new(tag);

            while !this.ctx.eof {
                match this.next_token() {
                    CSSToken::EOF => this.ctx.eof = true,
                    // <!-- and --> are ignored wherever a rule starts.
                    CSSToken::CDO | CSSToken::CDC | CSSToken::Whitespace => {}
                    CSSToken::LeftBrace => {
                        this.consume_simple_block(&mut rule, &CSSToken::RightBrace, false)?;
                        break;
                    }
                    CSSToken::Semicolon if tag == BlockTag::AtRule => break,
                    token => {
                        this.tokens.pushback_token(token);
                        this.consume_component_value(&mut rule)?;
                    }
                }
            }

            if parent.tag() == BlockTag::TopBlock {
                attach(parent, rule);
            } else {
                debug!(tag = %tag, parent = %parent.tag(), "nested rule not retained");
            }
            Ok(())
        })
    }

    fn consume_block_contents(&mut self, target: &mut ConsumedBlock, end: &CSSToken) -> Result<()> {
        while !self.ctx.eof {
            let token = self.next_token();
            if token == *end {
                break;
            }

            match token {
                CSSToken::EOF => self.ctx.eof = true,
                CSSToken::Whitespace => {}
                token => {
                    self.tokens.pushback_token(token);
                    self.consume_component_value(target)?;
                }
            }
        }
        Ok(())
    }

    /// Run `consume` one nesting level deeper.
    ///
    /// The depth is restored on every exit path, including failures.
    fn nested<F>(&mut self, production: &'static str, parent: BlockTag, consume: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.ctx.depth += 1;
        debug!(production, parent = %parent, depth = self.ctx.depth, "consume block");

        let result = if self.ctx.depth > self.ctx.max_nesting {
            warn!(production, depth = self.ctx.depth, "max nesting reached, ignore style");
            Err(self.ctx.fail(ParseError::bad_nesting()))
        } else {
            consume(self)
        };

        self.ctx.depth -= 1;
        result
    }

    fn next_token(&mut self) -> CSSToken {
        let token = self.tokens.next_token();
        #[cfg(feature = "consumer-trace")]
        tracing::trace!(token = %token, depth = self.ctx.depth, "next token");
        token
    }
}

fn attach(parent: &mut ConsumedBlock, block: ConsumedBlock) {
    let tag = block.tag();
    let len = block.size();
    if parent.attach_block(block) {
        debug!(tag = %tag, len, parent = %parent.tag(), "attached block");
    } else {
        debug!(tag = %tag, parent = %parent.tag(), "parent cannot hold children, block dropped");
    }
}

fn add_argument(func: &mut ConsumedBlock, block: ConsumedBlock) {
    if !func.add_function_argument(block) {
        debug!(tag = %func.tag(), "not a function, argument dropped");
    }
}

/// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
///
/// Owns the settings and the outcome of the last parse. The token source and
/// the parse context live only for the duration of one call.
#[derive(Debug, Default)]
pub struct CSSParser {
    options: ParserOptions,
    error: Option<ParseError>,
}

impl CSSParser {
    /// A parser with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser with explicit options.
    #[must_use]
    pub const fn with_options(options: ParserOptions) -> Self {
        Self {
            options,
            error: None,
        }
    }

    /// The options in use.
    #[must_use]
    pub const fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Tokenize `input` and build the consumed-block tree.
    ///
    /// Always returns the top-level block, possibly partial; a failure is
    /// available from [`CSSParser::error`] afterwards.
    pub fn consume_css_blocks(&mut self, input: &str) -> ConsumedBlock {
        self.consume_token_blocks(CSSTokenizer::new(input))
    }

    /// Build the consumed-block tree from an arbitrary token source.
    pub fn consume_token_blocks<T: TokenSource>(&mut self, mut tokens: T) -> ConsumedBlock {
        let mut ctx = ParseContext::new(self.options.max_nesting);
        let top = BlockConsumer::new(&mut tokens, &mut ctx).consume_stylesheet();
        debug_assert_eq!(ctx.depth, 0, "consumer depth must unwind to zero");

        self.error = ctx.error;
        top
    }

    /// The first error of the last parse.
    #[must_use]
    pub const fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Take the first error of the last parse.
    pub const fn take_error(&mut self) -> Option<ParseError> {
        self.error.take()
    }
}
