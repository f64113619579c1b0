use anyhow::Context;
use climage_core::{Frame, Mode};
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer};

/// Pixel grid size that fills `cols` terminal columns in the given mode.
///
/// Unicode draws one pixel per column and two rows per line, so the height is trimmed to
/// even. ASCII spends two columns on every pixel and lines are about twice as tall as
/// columns are wide, so both sides are halved.
pub fn target_size(src_width: u32, src_height: u32, cols: u32, mode: Mode) -> (u32, u32) {
    let cols = cols.max(1);
    let height = (src_height as u64 * cols as u64 / src_width.max(1) as u64) as u32;

    match mode {
        Mode::Unicode => (cols, (height - height % 2).max(2)),
        Mode::Ascii => ((cols / 2).max(1), (height / 2).max(1)),
    }
}

/// Scales decoded images to the pixel grid the renderer expects.
pub struct FrameResizer {
    target_width: u32,
    target_height: u32,
    resizer: Resizer,
    options: ResizeOptions,
}

impl FrameResizer {
    pub fn new(target_width: u32, target_height: u32) -> Self {
        Self {
            target_width,
            target_height,
            resizer: Resizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Lanczos3)),
        }
    }

    /// Resizer for `cols` output columns given the source size.
    pub fn for_columns(src_width: u32, src_height: u32, cols: u32, mode: Mode) -> Self {
        let (width, height) = target_size(src_width, src_height, cols, mode);
        Self::new(width, height)
    }

    /// Resize an RGB24 image straight into a render-ready frame.
    pub fn resize_to_frame(&mut self, src_data: &[u8], src_width: u32, src_height: u32) -> anyhow::Result<Frame> {
        let data = self.resize(src_data, src_width, src_height)?;
        Frame::from_rgb24(&data, self.target_width as usize, self.target_height as usize)
            .context("resized buffer does not match target size")
    }

    /// Resize an RGB24 image to the target dimensions. Returns RGB24 data.
    pub fn resize(&mut self, src_data: &[u8], src_width: u32, src_height: u32) -> anyhow::Result<Vec<u8>> {
        if src_width == self.target_width && src_height == self.target_height {
            return Ok(src_data.to_vec());
        }

        let src_image = Image::from_vec_u8(src_width, src_height, src_data.to_vec(), PixelType::U8x3)
            .context("failed to create source image")?;

        let mut dst_image = Image::new(self.target_width, self.target_height, PixelType::U8x3);

        self.resizer
            .resize(&src_image, &mut dst_image, &self.options)
            .context("resize failed")?;

        Ok(dst_image.into_vec())
    }

    pub fn target_width(&self) -> u32 {
        self.target_width
    }

    pub fn target_height(&self) -> u32 {
        self.target_height
    }
}
