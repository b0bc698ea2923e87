//! The consumed-block tree.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing) produces rules
//! built from component values. The block consumers record that structure
//! generically: every node is a [`ConsumedBlock`] whose [`BlockTag`] says
//! which grammar production made it and whose [`BlockContent`] holds either
//! nothing, one token, a list of children, or a function call.
//!
//! Each node owns its children; the whole tree is dropped top-down with its
//! root.

use strum_macros::{Display, IntoStaticStr};

use crate::tokenizer::CSSToken;

/// The grammar production a block was made by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
pub enum BlockTag {
    /// The root container returned by the driver.
    #[strum(serialize = "top")]
    TopBlock,
    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    #[strum(serialize = "qualified rule")]
    QualifiedRule,
    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    #[strum(serialize = "at rule")]
    AtRule,
    /// [§ 5.4.7 Consume a simple block](https://www.w3.org/TR/css-syntax-3/#consume-simple-block)
    #[strum(serialize = "simple block")]
    SimpleBlock,
    /// [§ 5.4.8 Consume a function](https://www.w3.org/TR/css-syntax-3/#consume-function)
    #[strum(serialize = "function")]
    Function,
    /// One argument of a function.
    #[strum(serialize = "function arg")]
    FunctionArg,
    /// A single preserved token.
    #[strum(serialize = "component")]
    Component,
    /// The "no more input" marker handed out by [`BlockCursor`].
    #[strum(serialize = "eof")]
    EofBlock,
}

/// A function call: the `<function-token>` and its arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionBlock {
    /// The function token carrying the name.
    pub function: CSSToken,
    /// Arguments, one block per argument token or nested function.
    pub args: Vec<ConsumedBlock>,
}

/// The payload of a [`ConsumedBlock`].
///
/// The variant is fixed when the block is constructed; the only change ever
/// made afterwards is `Empty` turning into `Blocks` on the first
/// [`ConsumedBlock::attach_block`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum BlockContent {
    /// Nothing yet, or the EOF sentinel.
    #[default]
    Empty,
    /// A leaf made from exactly one token.
    Token(CSSToken),
    /// An ordered list of child blocks.
    Blocks(Vec<ConsumedBlock>),
    /// A function call.
    Function(FunctionBlock),
}

/// One node of the consumed-block tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumedBlock {
    tag: BlockTag,
    content: BlockContent,
}

/// Returned by [`BlockCursor::next_block`] once the blocks are exhausted.
pub static EOF_BLOCK: ConsumedBlock = ConsumedBlock {
    tag: BlockTag::EofBlock,
    content: BlockContent::Empty,
};

/// Returned by [`ConsumedBlock::token_or_empty`] for non-leaf blocks.
static EOF_TOKEN: CSSToken = CSSToken::EOF;

impl ConsumedBlock {
    /// An empty block.
    #[must_use]
    pub const fn new(tag: BlockTag) -> Self {
        Self {
            tag,
            content: BlockContent::Empty,
        }
    }

    /// A leaf block holding `token`.
    #[must_use]
    pub const fn with_token(tag: BlockTag, token: CSSToken) -> Self {
        Self {
            tag,
            content: BlockContent::Token(token),
        }
    }

    /// A function block named by `function`, with no arguments yet.
    #[must_use]
    pub const fn function(function: CSSToken) -> Self {
        Self {
            tag: BlockTag::Function,
            content: BlockContent::Function(FunctionBlock {
                function,
                args: Vec::new(),
            }),
        }
    }

    /// The production that made this block.
    #[must_use]
    pub const fn tag(&self) -> BlockTag {
        self.tag
    }

    /// The block's payload.
    #[must_use]
    pub const fn content(&self) -> &BlockContent {
        &self.content
    }

    /// Append `block` to the children.
    ///
    /// Valid only while the content is empty or a list; an empty block
    /// becomes a list. Returns `false` and drops `block` without touching
    /// `self` for leaf and function blocks.
    pub fn attach_block(&mut self, block: Self) -> bool {
        if self.is_empty() {
            self.content = BlockContent::Blocks(Vec::new());
        }

        match &mut self.content {
            BlockContent::Blocks(children) => {
                children.push(block);
                true
            }
            _ => false,
        }
    }

    /// Append `block` to a function's arguments.
    ///
    /// Returns `false` if this is not a function block.
    pub fn add_function_argument(&mut self, block: Self) -> bool {
        match &mut self.content {
            BlockContent::Function(func) => {
                func.args.push(block);
                true
            }
            _ => false,
        }
    }

    /// The children, or an empty slice if this block has none.
    #[must_use]
    pub fn blocks_or_empty(&self) -> &[Self] {
        match &self.content {
            BlockContent::Blocks(children) => children,
            _ => &[],
        }
    }

    /// The leaf token, or an EOF token if this is not a leaf.
    #[must_use]
    pub fn token_or_empty(&self) -> &CSSToken {
        match &self.content {
            BlockContent::Token(token) => token,
            _ => &EOF_TOKEN,
        }
    }

    /// The function record, if this is a function block.
    #[must_use]
    pub const fn function_or_none(&self) -> Option<&FunctionBlock> {
        match &self.content {
            BlockContent::Function(func) => Some(func),
            _ => None,
        }
    }

    /// Number of children (or arguments); 1 for a leaf, 0 when empty.
    #[must_use]
    pub fn size(&self) -> usize {
        match &self.content {
            BlockContent::Empty => 0,
            BlockContent::Token(_) => 1,
            BlockContent::Blocks(children) => children.len(),
            BlockContent::Function(func) => func.args.len(),
        }
    }

    /// True if nothing was ever attached.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self.content, BlockContent::Empty)
    }

    /// True for the EOF sentinel.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.tag, BlockTag::EofBlock)
    }

    /// A JSON-like dump of the block and everything below it.
    ///
    /// For diagnostics only; the format is not stable.
    #[must_use]
    pub fn debug_str(&self) -> String {
        let mut out = String::new();
        self.write_debug(&mut out);
        out
    }

    fn write_debug(&self, out: &mut String) {
        out.push_str("\"type\": \"");
        out.push_str(self.tag.into());
        out.push_str("\", \"value\": ");

        match &self.content {
            BlockContent::Empty => out.push_str("\"empty\""),
            BlockContent::Token(token) => {
                out.push('"');
                out.push_str(&token.to_string());
                out.push('"');
            }
            BlockContent::Blocks(children) => write_debug_list(children, out),
            BlockContent::Function(func) => {
                out.push_str("{ \"content\": {\"token\": \"");
                out.push_str(&func.function.to_string());
                out.push_str("\", \"arguments\": ");
                write_debug_list(&func.args, out);
                out.push_str("}}");
            }
        }
    }
}

fn write_debug_list(blocks: &[ConsumedBlock], out: &mut String) {
    out.push('[');
    for (i, block) in blocks.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push('{');
        block.write_debug(out);
        out.push('}');
    }
    out.push(']');
}

/// A pull cursor over a run of sibling blocks.
///
/// Hands an interpreter one block at a time without exposing the tree.
/// After the last block every call returns [`EOF_BLOCK`]; a cursor cannot be
/// rewound.
#[derive(Debug)]
pub struct BlockCursor<'a> {
    blocks: std::slice::Iter<'a, ConsumedBlock>,
}

impl<'a> BlockCursor<'a> {
    /// A cursor over `blocks`.
    #[must_use]
    pub fn new(blocks: &'a [ConsumedBlock]) -> Self {
        Self {
            blocks: blocks.iter(),
        }
    }

    /// The next block, or the EOF sentinel.
    pub fn next_block(&mut self) -> &'a ConsumedBlock {
        self.blocks.next().unwrap_or(&EOF_BLOCK)
    }
}
