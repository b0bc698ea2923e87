//! CSS Color values.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)

use serde::Serialize;

use crate::parser::{BlockContent, ConsumedBlock, FunctionBlock};
use crate::tokenizer::CSSToken;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color with an alpha channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CssColor {
    /// "the red color channel" (0-255)
    pub r: u8,
    /// "the green color channel" (0-255)
    pub g: u8,
    /// "the blue color channel" (0-255)
    pub b: u8,
    /// "the alpha channel" (0-255, 255 = fully opaque)
    pub alpha: u8,
}

/// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
///
/// The basic set plus the extended keywords commonly seen in mail.
const NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aqua", [0, 255, 255]),
    ("black", [0, 0, 0]),
    ("blue", [0, 0, 255]),
    ("brown", [165, 42, 42]),
    ("cyan", [0, 255, 255]),
    ("darkblue", [0, 0, 139]),
    ("darkgray", [169, 169, 169]),
    ("darkgreen", [0, 100, 0]),
    ("darkgrey", [169, 169, 169]),
    ("darkred", [139, 0, 0]),
    ("fuchsia", [255, 0, 255]),
    ("gold", [255, 215, 0]),
    ("gray", [128, 128, 128]),
    ("green", [0, 128, 0]),
    ("grey", [128, 128, 128]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("lime", [0, 255, 0]),
    ("magenta", [255, 0, 255]),
    ("maroon", [128, 0, 0]),
    ("navy", [0, 0, 128]),
    ("olive", [128, 128, 0]),
    ("orange", [255, 165, 0]),
    ("pink", [255, 192, 203]),
    ("purple", [128, 0, 128]),
    ("red", [255, 0, 0]),
    ("silver", [192, 192, 192]),
    ("teal", [0, 128, 128]),
    ("white", [255, 255, 255]),
    ("whitesmoke", [245, 245, 245]),
    ("yellow", [255, 255, 0]),
];

impl CssColor {
    /// Black (#000000)
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// White (#ffffff)
    pub const WHITE: Self = Self::rgb(255, 255, 255);

    /// An opaque color.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, alpha: 255 }
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    /// "The syntax of a <hex-color> is a <hash-token> token whose value consists of
    /// 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        // [§ 4.2.1]
        // "The three-digit RGB notation (#RGB) is converted into six-digit form (#RRGGBB)
        // by replicating digits, not by adding zeros."
        let short = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
        let long = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

        match hex.len() {
            3 => Some(Self::rgb(short(0)?, short(1)?, short(2)?)),
            4 => Some(Self {
                alpha: short(3)?,
                ..Self::rgb(short(0)?, short(1)?, short(2)?)
            }),
            6 => Some(Self::rgb(long(0)?, long(2)?, long(4)?)),
            8 => Some(Self {
                alpha: long(6)?,
                ..Self::rgb(long(0)?, long(2)?, long(4)?)
            }),
            _ => None,
        }
    }

    /// [§ 6.1 Named Colors](https://www.w3.org/TR/css-color-4/#named-colors)
    #[must_use]
    pub fn from_named(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("transparent") {
            return Some(Self {
                alpha: 0,
                ..Self::BLACK
            });
        }

        NAMED_COLORS
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name))
            .map(|&(_, [r, g, b])| Self::rgb(r, g, b))
    }

    /// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
    /// [§ 7 The HSL Functions](https://www.w3.org/TR/css-color-4/#the-hsl-notation)
    ///
    /// `rgb()`/`rgba()` and `hsl()`/`hsla()` are aliases. Separators were
    /// already dropped by the function consumer, so legacy (comma) and
    /// modern (space, `/ alpha`) syntax look the same here.
    #[must_use]
    pub fn from_function(func: &FunctionBlock) -> Option<Self> {
        let CSSToken::Function(name) = &func.function else {
            return None;
        };
        let args = color_args(&func.args)?;

        match name.to_ascii_lowercase().as_str() {
            "rgb" | "rgba" => Some(Self {
                r: channel_to_u8(args[0]),
                g: channel_to_u8(args[1]),
                b: channel_to_u8(args[2]),
                alpha: args.get(3).map_or(255, |&a| alpha_to_u8(a)),
            }),
            "hsl" | "hsla" => {
                // "The first argument specifies the hue angle."
                let hue = match args[0] {
                    ColorArg::Number(v) => v,
                    ColorArg::Percentage(v) => v * 3.6,
                };
                let (r, g, b) = hsl_to_rgb(hue, args[1].fraction(), args[2].fraction());
                Some(Self {
                    r,
                    g,
                    b,
                    alpha: args.get(3).map_or(255, |&a| alpha_to_u8(a)),
                })
            }
            _ => None,
        }
    }

    /// Interpret a hash, ident or function block as a color.
    #[must_use]
    pub fn from_block(block: &ConsumedBlock) -> Option<Self> {
        match block.content() {
            BlockContent::Token(CSSToken::Hash { value, .. }) => Self::from_hex(value),
            BlockContent::Token(CSSToken::Ident(name)) => Self::from_named(name),
            BlockContent::Function(func) => Self::from_function(func),
            _ => None,
        }
    }

    /// `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.alpha == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.alpha)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum ColorArg {
    Number(f64),
    Percentage(f64),
}

impl ColorArg {
    /// Saturation and lightness: both forms read as percentages.
    fn fraction(self) -> f64 {
        match self {
            Self::Number(v) | Self::Percentage(v) => v / 100.0,
        }
    }
}

/// Numeric arguments of a color function; `None` unless there are 3 or 4.
fn color_args(args: &[ConsumedBlock]) -> Option<Vec<ColorArg>> {
    let mut out = Vec::with_capacity(4);
    for arg in args {
        match arg.token_or_empty() {
            CSSToken::Number(n) => out.push(ColorArg::Number(n.value)),
            CSSToken::Percentage(n) => out.push(ColorArg::Percentage(n.value)),
            _ => return None,
        }
    }
    matches!(out.len(), 3 | 4).then_some(out)
}

/// "Values outside these ranges are not invalid, but are clamped to the
/// ranges defined here at parsed-value time."
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn channel_to_u8(arg: ColorArg) -> u8 {
    let v = match arg {
        ColorArg::Number(n) => n,
        ColorArg::Percentage(p) => p * 255.0 / 100.0,
    };
    v.round().clamp(0.0, 255.0) as u8
}

/// "The <alpha-value> can be a <number> (clamped to [0, 1]) or a
/// <percentage> (clamped to [0%, 100%])."
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn alpha_to_u8(arg: ColorArg) -> u8 {
    let v = match arg {
        ColorArg::Number(n) => n * 255.0,
        ColorArg::Percentage(p) => p * 255.0 / 100.0,
    };
    v.round().clamp(0.0, 255.0) as u8
}

/// [§ 7.1 Converting HSL Colors to sRGB](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0);
    let s = saturation.clamp(0.0, 1.0);
    let l = lightness.clamp(0.0, 1.0);

    let c = (1.0 - 2.0f64.mul_add(l, -1.0).abs()) * s;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let m = l - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r1), to_u8(g1), to_u8(b1))
}
