use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// A candidate terminal color and the code the terminal knows it by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub color: Rgb,
    pub code: u8,
}

impl PaletteEntry {
    pub const fn new(r: u8, g: u8, b: u8, code: u8) -> Self {
        Self {
            color: Rgb::new(r, g, b),
            code,
        }
    }
}

/// Built-in system color themes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PaletteName {
    #[default]
    Default,
    Xterm,
    LinuxConsole,
    Solarized,
    Rxvt,
    Tango,
    Gruvbox,
    GruvboxDark,
}

impl PaletteName {
    pub const COUNT: usize = 8;

    pub const ALL: [PaletteName; Self::COUNT] = [
        PaletteName::Default,
        PaletteName::Xterm,
        PaletteName::LinuxConsole,
        PaletteName::Solarized,
        PaletteName::Rxvt,
        PaletteName::Tango,
        PaletteName::Gruvbox,
        PaletteName::GruvboxDark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PaletteName::Default => "default",
            PaletteName::Xterm => "xterm",
            PaletteName::LinuxConsole => "linuxconsole",
            PaletteName::Solarized => "solarized",
            PaletteName::Rxvt => "rxvt",
            PaletteName::Tango => "tango",
            PaletteName::Gruvbox => "gruvbox",
            PaletteName::GruvboxDark => "gruvboxdark",
        }
    }

    /// Position in [`PaletteName::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// The 16 system colors of this theme.
    pub fn palette(&self) -> &'static Palette {
        &PALETTES[self.index()]
    }
}

impl fmt::Display for PaletteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaletteName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownPalette(s.to_string()))
    }
}

/// A named theme: 16 system colors, codes 0..=15. The first 8 are the dark set.
#[derive(Debug)]
pub struct Palette {
    pub name: PaletteName,
    pub entries: [PaletteEntry; 16],
}

impl Palette {
    /// All 16 entries, used for 16-color output.
    pub fn system(&self) -> &[PaletteEntry] {
        &self.entries
    }

    /// The first 8 entries, used for 8-color output.
    pub fn dark(&self) -> &[PaletteEntry] {
        &self.entries[..8]
    }
}

/// Look up the system colors for a palette by name.
pub fn system_colors(name: &str) -> Result<&'static [PaletteEntry; 16]> {
    let name: PaletteName = name.parse()?;
    Ok(&name.palette().entries)
}

/// The palette-independent part of the 256-color table: the 6x6x6 cube (codes 16..=231)
/// followed by the 24 step grayscale ramp (codes 232..=255).
pub fn extended_entries() -> &'static [PaletteEntry] {
    static EXTENDED: OnceLock<Vec<PaletteEntry>> = OnceLock::new();
    EXTENDED.get_or_init(build_extended)
}

const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

fn build_extended() -> Vec<PaletteEntry> {
    let mut entries = Vec::with_capacity(240);

    for r in CUBE_LEVELS {
        for g in CUBE_LEVELS {
            for b in CUBE_LEVELS {
                let code = 16 + 36 * cube_digit(r) + 6 * cube_digit(g) + cube_digit(b);
                entries.push(PaletteEntry::new(r, g, b, code));
            }
        }
    }

    for s in (8..=238u8).step_by(10) {
        entries.push(PaletteEntry::new(s, s, s, 232 + s / 10));
    }

    entries
}

/// Base-6 digit of a cube level.
fn cube_digit(level: u8) -> u8 {
    (5 * level as u16 / 255) as u8
}

const fn theme(name: PaletteName, rgb: [[u8; 3]; 16]) -> Palette {
    let mut entries = [PaletteEntry::new(0, 0, 0, 0); 16];
    let mut i = 0;
    while i < 16 {
        entries[i] = PaletteEntry::new(rgb[i][0], rgb[i][1], rgb[i][2], i as u8);
        i += 1;
    }
    Palette { name, entries }
}

// Indexed by `PaletteName as usize`.
static PALETTES: [Palette; PaletteName::COUNT] = [
    theme(
        PaletteName::Default,
        [
            [0, 0, 0],
            [128, 0, 0],
            [0, 128, 0],
            [128, 128, 0],
            [0, 0, 128],
            [128, 0, 128],
            [0, 128, 128],
            [192, 192, 192],
            [128, 128, 128],
            [255, 0, 0],
            [0, 255, 0],
            [255, 255, 0],
            [0, 0, 255],
            [255, 0, 255],
            [0, 255, 255],
            [255, 255, 255],
        ],
    ),
    theme(
        PaletteName::Xterm,
        [
            [0, 0, 0],
            [205, 0, 0],
            [0, 205, 0],
            [205, 205, 0],
            [0, 0, 238],
            [205, 0, 205],
            [0, 205, 205],
            [229, 229, 229],
            [127, 127, 127],
            [255, 0, 0],
            [0, 255, 0],
            [255, 255, 0],
            [92, 92, 255],
            [255, 0, 255],
            [0, 255, 255],
            [255, 255, 255],
        ],
    ),
    theme(
        PaletteName::LinuxConsole,
        [
            [0, 0, 0],
            [170, 0, 0],
            [0, 170, 0],
            [170, 85, 0],
            [0, 0, 170],
            [170, 0, 170],
            [0, 170, 170],
            [170, 170, 170],
            [85, 85, 85],
            [255, 85, 85],
            [85, 255, 85],
            [255, 255, 85],
            [85, 85, 255],
            [255, 85, 255],
            [85, 255, 255],
            [255, 255, 255],
        ],
    ),
    theme(
        PaletteName::Solarized,
        [
            [7, 54, 66],
            [220, 50, 47],
            [133, 153, 0],
            [181, 137, 0],
            [38, 139, 210],
            [211, 54, 130],
            [42, 161, 152],
            [238, 232, 213],
            [0, 43, 54],
            [203, 75, 22],
            [88, 110, 117],
            [101, 123, 131],
            [131, 148, 150],
            [108, 113, 196],
            [147, 161, 161],
            [253, 246, 227],
        ],
    ),
    theme(
        PaletteName::Rxvt,
        [
            [0, 0, 0],
            [205, 0, 0],
            [0, 205, 0],
            [205, 205, 0],
            [0, 0, 205],
            [205, 0, 205],
            [0, 205, 205],
            [250, 235, 215],
            [64, 64, 64],
            [255, 0, 0],
            [0, 255, 0],
            [255, 255, 0],
            [0, 0, 255],
            [255, 0, 255],
            [0, 255, 255],
            [255, 255, 255],
        ],
    ),
    theme(
        PaletteName::Tango,
        [
            [0, 0, 0],
            [204, 0, 0],
            [78, 154, 6],
            [196, 160, 0],
            [52, 101, 164],
            [117, 80, 123],
            [6, 152, 154],
            [211, 215, 207],
            [85, 87, 83],
            [239, 41, 41],
            [138, 226, 52],
            [252, 233, 79],
            [114, 159, 207],
            [173, 127, 168],
            [52, 226, 226],
            [238, 238, 236],
        ],
    ),
    theme(
        PaletteName::Gruvbox,
        [
            [251, 241, 199],
            [204, 36, 29],
            [152, 151, 26],
            [215, 153, 33],
            [69, 133, 136],
            [177, 98, 134],
            [104, 157, 106],
            [124, 111, 100],
            [146, 131, 116],
            [157, 0, 6],
            [121, 116, 14],
            [181, 118, 20],
            [7, 102, 120],
            [143, 63, 113],
            [66, 123, 88],
            [60, 56, 54],
        ],
    ),
    theme(
        PaletteName::GruvboxDark,
        [
            [40, 40, 40],
            [204, 36, 29],
            [152, 151, 26],
            [215, 153, 33],
            [69, 133, 136],
            [177, 98, 134],
            [104, 157, 106],
            [168, 153, 132],
            [146, 131, 116],
            [251, 73, 52],
            [184, 187, 38],
            [250, 189, 47],
            [131, 165, 152],
            [211, 134, 155],
            [142, 192, 124],
            [235, 219, 178],
        ],
    ),
];
