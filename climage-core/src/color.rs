use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// A 24-bit RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channel by axis: 0 = red, 1 = green, 2 = blue.
    pub fn channel(&self, axis: usize) -> u8 {
        match axis {
            0 => self.r,
            1 => self.g,
            _ => self.b,
        }
    }

    /// Manhattan distance in RGB space.
    pub fn manhattan(&self, other: &Rgb) -> u32 {
        self.r.abs_diff(other.r) as u32 + self.g.abs_diff(other.g) as u32 + self.b.abs_diff(other.b) as u32
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self { r, g, b }
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self { r, g, b }
    }
}

/// How many colors the target terminal can show. Exactly one is active per conversion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ColorDepth {
    TrueColor,
    #[default]
    Color256,
    Color16,
    Color8,
}

impl ColorDepth {
    pub const ALL: [ColorDepth; 4] = [
        ColorDepth::TrueColor,
        ColorDepth::Color256,
        ColorDepth::Color16,
        ColorDepth::Color8,
    ];

    /// Pick a depth from one-flag-per-depth switches. Exactly one must be set.
    pub fn from_flags(truecolor: bool, color256: bool, color16: bool, color8: bool) -> Result<Self> {
        let selected: Vec<ColorDepth> = [truecolor, color256, color16, color8]
            .into_iter()
            .zip(Self::ALL)
            .filter_map(|(on, depth)| on.then_some(depth))
            .collect();

        match selected.as_slice() {
            [depth] => Ok(*depth),
            [] => Err(Error::InvalidDepth("no color depth selected".to_string())),
            many => {
                let names: Vec<&str> = many.iter().map(|d| d.as_str()).collect();
                Err(Error::InvalidDepth(format!("only one may be chosen, got {}", names.join(", "))))
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColorDepth::TrueColor => "truecolor",
            ColorDepth::Color256 => "256color",
            ColorDepth::Color16 => "16color",
            ColorDepth::Color8 => "8color",
        }
    }
}

impl fmt::Display for ColorDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorDepth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| Error::InvalidDepth(format!("{s:?}")))
    }
}

/// Glyph mode: two spaces per pixel, or a half block per vertical pixel pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    #[default]
    Ascii,
    Unicode,
}

/// Outcome of a color lookup: the color itself for truecolor, a palette code otherwise.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolved {
    Rgb(Rgb),
    Code(u8),
}
