use std::fmt;

use crate::color::{ColorDepth, Mode};
use crate::encode::{reset_sequence, PixelEncoder};
use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::palette::PaletteName;
use crate::resolve::ColorResolver;

/// Everything a conversion needs besides the pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub mode: Mode,
    pub depth: ColorDepth,
    /// Ignored for truecolor.
    pub palette: PaletteName,
}

/// Rendered image, one entry per terminal line. Each line already ends in a reset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderedText {
    lines: Vec<String>,
}

impl RenderedText {
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The full text, every line terminated by `\n`.
    pub fn into_string(self) -> String {
        let len = self.lines.iter().map(|l| l.len() + 1).sum();
        let mut out = String::with_capacity(len);
        for line in self.lines {
            out.push_str(&line);
            out.push('\n');
        }
        out
    }
}

impl fmt::Display for RenderedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            f.write_str(line)?;
            f.write_str("\n")?;
        }
        Ok(())
    }
}

/// Walks a frame and produces the escape-sequence text for it.
pub struct FrameRenderer {
    mode: Mode,
    resolver: ColorResolver,
    encoder: PixelEncoder,
}

impl FrameRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self {
            mode: options.mode,
            resolver: ColorResolver::new(options.depth, options.palette),
            encoder: PixelEncoder::new(options.depth),
        }
    }

    /// Render the whole frame. Nothing is returned unless every cell encoded.
    pub fn render(&self, frame: &Frame) -> Result<RenderedText> {
        if self.mode == Mode::Unicode && frame.height() % 2 != 0 {
            return Err(Error::OddHeight(frame.height()));
        }

        tracing::debug!(
            width = frame.width(),
            height = frame.height(),
            mode = ?self.mode,
            depth = %self.resolver.depth(),
            palette = %self.resolver.palette(),
            "rendering frame"
        );

        let lines = match self.mode {
            Mode::Ascii => (0..frame.height())
                .map(|y| self.render_row(frame, y))
                .collect::<Result<Vec<_>>>()?,
            Mode::Unicode => (0..frame.height())
                .step_by(2)
                .map(|y| self.render_row_pair(frame, y))
                .collect::<Result<Vec<_>>>()?,
        };

        Ok(RenderedText { lines })
    }

    fn render_row(&self, frame: &Frame, y: usize) -> Result<String> {
        let mut line = String::with_capacity(frame.width() * 24);
        for &px in frame.row(y) {
            self.encoder.encode_single(&mut line, self.resolver.resolve(px))?;
        }
        line.push_str(reset_sequence());
        Ok(line)
    }

    /// Row `top_y` paints the background, row `top_y + 1` the half-block foreground.
    fn render_row_pair(&self, frame: &Frame, top_y: usize) -> Result<String> {
        let mut line = String::with_capacity(frame.width() * 40);
        for (&top, &bottom) in frame.row(top_y).iter().zip(frame.row(top_y + 1)) {
            let top = self.resolver.resolve(top);
            let bottom = self.resolver.resolve(bottom);
            self.encoder.encode_dual(&mut line, top, bottom)?;
        }
        line.push_str(reset_sequence());
        Ok(line)
    }
}

/// Render with typed options.
pub fn render(frame: &Frame, options: RenderOptions) -> Result<RenderedText> {
    FrameRenderer::new(options).render(frame)
}

/// Render with string depth and palette values. The palette is not checked for truecolor.
pub fn render_named(frame: &Frame, mode: Mode, depth: &str, palette: &str) -> Result<RenderedText> {
    let resolver = ColorResolver::from_names(depth, palette)?;
    render(
        frame,
        RenderOptions {
            mode,
            depth: resolver.depth(),
            palette: resolver.palette(),
        },
    )
}
