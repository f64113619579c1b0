use crate::color::{ColorDepth, Resolved, Rgb};
use crate::error::{Error, Result};

/// Glyph for a dual cell: foreground paints the bottom half, background the top.
pub const HALF_BLOCK: char = '\u{2584}';

/// Filler for a single cell. Two columns keep pixels roughly square.
pub const BLANK: &str = "  ";

pub const RESET: &str = "\x1b[0m";

/// Sequence that returns the terminal to its default colors.
pub fn reset_sequence() -> &'static str {
    RESET
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Layer {
    Background,
    Foreground,
}

/// Writes cells as escape sequences for one color depth.
#[derive(Clone, Copy, Debug)]
pub struct PixelEncoder {
    depth: ColorDepth,
}

impl PixelEncoder {
    pub fn new(depth: ColorDepth) -> Self {
        Self { depth }
    }

    pub fn depth(&self) -> ColorDepth {
        self.depth
    }

    /// One pixel, two columns of background color.
    pub fn encode_single(&self, buf: &mut String, color: Resolved) -> Result<()> {
        match self.depth {
            ColorDepth::TrueColor | ColorDepth::Color256 => {
                self.write_color(buf, Layer::Background, color)?;
            }
            ColorDepth::Color16 | ColorDepth::Color8 => {
                let bg = self.system_param(Layer::Background, color)?;
                buf.push_str("\x1b[");
                write_u8(buf, bg);
                buf.push('m');
            }
        }
        buf.push_str(BLANK);
        Ok(())
    }

    /// Two vertically stacked pixels in one half-block cell.
    pub fn encode_dual(&self, buf: &mut String, top: Resolved, bottom: Resolved) -> Result<()> {
        match self.depth {
            ColorDepth::TrueColor | ColorDepth::Color256 => {
                self.write_color(buf, Layer::Background, top)?;
                self.write_color(buf, Layer::Foreground, bottom)?;
            }
            ColorDepth::Color16 | ColorDepth::Color8 => {
                let bg = self.system_param(Layer::Background, top)?;
                let fg = self.system_param(Layer::Foreground, bottom)?;
                buf.push_str("\x1b[");
                write_u8(buf, bg);
                buf.push(';');
                write_u8(buf, fg);
                buf.push('m');
            }
        }
        buf.push(HALF_BLOCK);
        Ok(())
    }

    /// `48;2;R;G;B` / `38;2;R;G;B` for truecolor, `48;5;N` / `38;5;N` for 256 colors.
    fn write_color(&self, buf: &mut String, layer: Layer, color: Resolved) -> Result<()> {
        let lead = match layer {
            Layer::Background => "\x1b[48;",
            Layer::Foreground => "\x1b[38;",
        };
        match (self.depth, color) {
            (ColorDepth::TrueColor, Resolved::Rgb(Rgb { r, g, b })) => {
                buf.push_str(lead);
                buf.push_str("2;");
                write_u8(buf, r);
                buf.push(';');
                write_u8(buf, g);
                buf.push(';');
                write_u8(buf, b);
                buf.push('m');
                Ok(())
            }
            (ColorDepth::Color256, Resolved::Code(code)) => {
                buf.push_str(lead);
                buf.push_str("5;");
                write_u8(buf, code);
                buf.push('m');
                Ok(())
            }
            (depth, color) => Err(mismatch(depth, color)),
        }
    }

    /// SGR parameter for a system color: 40+N / 30+N for the dark set, 100+N / 90+N for
    /// the bright set. The bright set only exists at 16 colors.
    fn system_param(&self, layer: Layer, color: Resolved) -> Result<u8> {
        let code = match color {
            Resolved::Code(code) => code,
            other => return Err(mismatch(self.depth, other)),
        };
        let limit = match self.depth {
            ColorDepth::Color8 => 8,
            _ => 16,
        };
        if code >= limit {
            return Err(mismatch(self.depth, color));
        }

        let (dark, bright) = match layer {
            Layer::Background => (40, 100),
            Layer::Foreground => (30, 90),
        };
        Ok(if code < 8 { dark + code } else { bright + (code - 8) })
    }
}

fn mismatch(depth: ColorDepth, color: Resolved) -> Error {
    Error::InvalidDepth(format!("{depth} cannot encode {color:?}"))
}

/// Integer-to-ASCII for u8 values without going through `fmt`.
fn write_u8(buf: &mut String, v: u8) {
    if v >= 100 {
        buf.push(char::from(b'0' + v / 100));
        buf.push(char::from(b'0' + (v / 10) % 10));
        buf.push(char::from(b'0' + v % 10));
    } else if v >= 10 {
        buf.push(char::from(b'0' + v / 10));
        buf.push(char::from(b'0' + v % 10));
    } else {
        buf.push(char::from(b'0' + v));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(depth: ColorDepth, color: Resolved) -> String {
        let mut buf = String::new();
        PixelEncoder::new(depth).encode_single(&mut buf, color).unwrap();
        buf
    }

    fn dual(depth: ColorDepth, top: Resolved, bottom: Resolved) -> String {
        let mut buf = String::new();
        PixelEncoder::new(depth).encode_dual(&mut buf, top, bottom).unwrap();
        buf
    }

    #[test]
    fn truecolor_cells() {
        assert_eq!(
            single(ColorDepth::TrueColor, Resolved::Rgb(Rgb::new(10, 20, 30))),
            "\x1b[48;2;10;20;30m  "
        );
        assert_eq!(
            dual(
                ColorDepth::TrueColor,
                Resolved::Rgb(Rgb::new(255, 0, 7)),
                Resolved::Rgb(Rgb::new(0, 100, 99)),
            ),
            "\x1b[48;2;255;0;7m\x1b[38;2;0;100;99m\u{2584}"
        );
    }

    #[test]
    fn color256_cells() {
        assert_eq!(single(ColorDepth::Color256, Resolved::Code(196)), "\x1b[48;5;196m  ");
        assert_eq!(
            dual(ColorDepth::Color256, Resolved::Code(0), Resolved::Code(42)),
            "\x1b[48;5;0m\x1b[38;5;42m\u{2584}"
        );
    }

    #[test]
    fn sixteen_color_cells() {
        assert_eq!(single(ColorDepth::Color16, Resolved::Code(0)), "\x1b[40m  ");
        assert_eq!(single(ColorDepth::Color16, Resolved::Code(7)), "\x1b[47m  ");
        assert_eq!(single(ColorDepth::Color16, Resolved::Code(8)), "\x1b[100m  ");
        assert_eq!(single(ColorDepth::Color16, Resolved::Code(15)), "\x1b[107m  ");
        assert_eq!(
            dual(ColorDepth::Color16, Resolved::Code(1), Resolved::Code(9)),
            "\x1b[41;91m\u{2584}"
        );
        assert_eq!(
            dual(ColorDepth::Color16, Resolved::Code(12), Resolved::Code(2)),
            "\x1b[104;32m\u{2584}"
        );
    }

    #[test]
    fn eight_color_cells() {
        assert_eq!(single(ColorDepth::Color8, Resolved::Code(3)), "\x1b[43m  ");
        assert_eq!(
            dual(ColorDepth::Color8, Resolved::Code(4), Resolved::Code(5)),
            "\x1b[44;35m\u{2584}"
        );
    }

    #[test]
    fn mismatched_input_is_rejected() {
        let mut buf = String::new();
        let rgb = Resolved::Rgb(Rgb::new(1, 2, 3));
        assert!(matches!(
            PixelEncoder::new(ColorDepth::Color256).encode_single(&mut buf, rgb),
            Err(Error::InvalidDepth(_))
        ));
        assert!(matches!(
            PixelEncoder::new(ColorDepth::TrueColor).encode_single(&mut buf, Resolved::Code(4)),
            Err(Error::InvalidDepth(_))
        ));
        assert!(matches!(
            PixelEncoder::new(ColorDepth::Color8).encode_single(&mut buf, Resolved::Code(8)),
            Err(Error::InvalidDepth(_))
        ));
        assert!(matches!(
            PixelEncoder::new(ColorDepth::Color16).encode_dual(&mut buf, Resolved::Code(1), Resolved::Code(16)),
            Err(Error::InvalidDepth(_))
        ));
    }

    #[test]
    fn cells_end_with_their_filler() {
        for code in 0..16 {
            let s = single(ColorDepth::Color16, Resolved::Code(code));
            assert!(s.ends_with(BLANK));
            let d = dual(ColorDepth::Color16, Resolved::Code(code), Resolved::Code(15 - code));
            assert_eq!(d.chars().filter(|c| !c.is_ascii()).count(), 1);
            assert!(d.ends_with(HALF_BLOCK));
        }
    }

    #[test]
    fn reset_is_sgr_zero() {
        assert_eq!(reset_sequence(), "\x1b[0m");
    }

    #[test]
    fn u8_digits() {
        for v in [0u8, 7, 10, 99, 100, 255] {
            let mut buf = String::new();
            write_u8(&mut buf, v);
            assert_eq!(buf, v.to_string());
        }
    }
}
