use crate::color::Rgb;
use crate::error::{Error, Result};

/// A decoded, already resized image: `width × height` pixels, row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Frame {
    pub fn new(width: usize, height: usize, pixels: Vec<Rgb>) -> Result<Self> {
        let expected = width * height;
        if pixels.len() != expected {
            return Err(Error::FrameSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self { width, height, pixels })
    }

    /// Build from packed RGB24 data (3 bytes per pixel, row-major).
    pub fn from_rgb24(data: &[u8], width: usize, height: usize) -> Result<Self> {
        let expected = width * height * 3;
        if data.len() != expected {
            return Err(Error::FrameSize {
                expected,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(3)
            .map(|px| Rgb::new(px[0], px[1], px[2]))
            .collect();
        Ok(Self { width, height, pixels })
    }

    /// Build from nested rows. Every row must be `width` long.
    pub fn from_rows(rows: &[Vec<Rgb>]) -> Result<Self> {
        let width = rows.first().map_or(0, Vec::len);
        let pixels: Vec<Rgb> = rows.iter().flatten().copied().collect();
        if let Some(bad) = rows.iter().find(|row| row.len() != width) {
            return Err(Error::FrameSize {
                expected: width,
                actual: bad.len(),
            });
        }
        Self::new(width, rows.len(), pixels)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Pixel at column `x`, row `y`. Panics when out of bounds.
    pub fn pixel_at(&self, x: usize, y: usize) -> Rgb {
        assert!(x < self.width && y < self.height, "pixel ({x}, {y}) outside {}x{}", self.width, self.height);
        self.pixels[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[Rgb] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Drop the last row if the height is odd, so the frame can be drawn two rows per line.
    pub fn trim_to_even(mut self) -> Self {
        if self.height % 2 == 1 {
            self.height -= 1;
            self.pixels.truncate(self.width * self.height);
        }
        self
    }
}
