//! Declaration values.

use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString};

use super::color::CssColor;
use crate::parser::ConsumedBlock;
use crate::tokenizer::CSSToken;

/// [§ 6 Distance Units](https://www.w3.org/TR/css-values-4/#lengths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CssUnit {
    /// "1px = 1/96th of 1in"
    Px,
    /// Relative to the element's font size.
    Em,
    /// Relative to the root font size.
    Rem,
    /// Points, 1/72 in.
    Pt,
    /// Picas, 12pt.
    Pc,
    /// Centimeters.
    Cm,
    /// Millimeters.
    Mm,
    /// Inches.
    In,
    /// x-height.
    Ex,
    /// Width of "0".
    Ch,
    /// 1% of the viewport width.
    Vw,
    /// 1% of the viewport height.
    Vh,
    /// `<percentage>`
    #[strum(serialize = "%")]
    Percent,
}

/// [CSS Display § 2](https://www.w3.org/TR/css-display-3/#the-display-properties)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
#[serde(rename_all = "kebab-case")]
pub enum CssDisplay {
    /// `inline`
    Inline,
    /// `block`
    Block,
    /// `inline-block`
    InlineBlock,
    /// `flex`
    Flex,
    /// `inline-flex`
    InlineFlex,
    /// `grid`
    Grid,
    /// `table`
    Table,
    /// `table-row`
    TableRow,
    /// `table-cell`
    TableCell,
    /// `list-item`
    ListItem,
    /// `contents`
    Contents,
    /// `none`: the element is not rendered at all.
    None,
}

/// [CSS Display § 4](https://www.w3.org/TR/css-display-3/#visibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum CssVisibility {
    /// `visible`
    Visible,
    /// `hidden`
    Hidden,
    /// `collapse`
    Collapse,
}

/// One interpreted value of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CssValue {
    /// A color.
    Color(CssColor),
    /// A length or percentage.
    Dimension {
        /// The number as written.
        value: f64,
        /// Its unit.
        unit: CssUnit,
    },
    /// A plain number.
    Number(f64),
    /// A `display` keyword.
    Display(CssDisplay),
    /// A `visibility` keyword.
    Visibility(CssVisibility),
}

impl CssValue {
    /// A color from a hash, color keyword or color function.
    #[must_use]
    pub fn color_from_block(block: &ConsumedBlock) -> Option<Self> {
        CssColor::from_block(block).map(Self::Color)
    }

    /// A dimension or percentage. A unitless `0` is read as `0px`.
    #[must_use]
    pub fn dimension_from_block(block: &ConsumedBlock) -> Option<Self> {
        match block.token_or_empty() {
            CSSToken::Dimension { numeric, unit } => CssUnit::from_str(unit)
                .ok()
                .map(|unit| Self::Dimension {
                    value: numeric.value,
                    unit,
                }),
            CSSToken::Percentage(n) => Some(Self::Dimension {
                value: n.value,
                unit: CssUnit::Percent,
            }),
            CSSToken::Number(n) if n.int_value == Some(0) => Some(Self::Dimension {
                value: 0.0,
                unit: CssUnit::Px,
            }),
            _ => None,
        }
    }

    /// A number or percentage, read as a fraction clamped to `[0, 1]`.
    #[must_use]
    pub fn opacity_from_block(block: &ConsumedBlock) -> Option<Self> {
        let value = match block.token_or_empty() {
            CSSToken::Number(n) => n.value,
            CSSToken::Percentage(n) => n.value / 100.0,
            _ => return None,
        };
        Some(Self::Number(value.clamp(0.0, 1.0)))
    }

    /// A `display` keyword.
    #[must_use]
    pub fn display_from_block(block: &ConsumedBlock) -> Option<Self> {
        match block.token_or_empty() {
            CSSToken::Ident(name) => CssDisplay::from_str(name).ok().map(Self::Display),
            _ => None,
        }
    }

    /// A `visibility` keyword.
    #[must_use]
    pub fn visibility_from_block(block: &ConsumedBlock) -> Option<Self> {
        match block.token_or_empty() {
            CSSToken::Ident(name) => CssVisibility::from_str(name).ok().map(Self::Visibility),
            _ => None,
        }
    }

    /// The color, if this is one.
    #[must_use]
    pub const fn as_color(&self) -> Option<CssColor> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }
}
