mod decode;
mod resize;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use climage_core::{ColorDepth, FrameRenderer, Mode, PaletteName, RenderOptions};
use crossterm::terminal;
use tracing_subscriber::EnvFilter;

use crate::decode::decode_image;
use crate::resize::FrameResizer;

#[derive(Parser, Debug)]
#[command(
    name = "climage",
    version,
    about = "Convert images to ANSI escape codes for display in terminals"
)]
struct Cli {
    /// The image file to convert
    input: PathBuf,

    /// Use half-block unicode glyphs, two pixel rows per line (not supported by all terminals)
    #[arg(short, long, conflicts_with = "ascii")]
    unicode: bool,

    /// Restrict output to spaces and colors (default)
    #[arg(short, long)]
    ascii: bool,

    /// Use 24-bit RGB color (not supported by all terminals)
    #[arg(short, long)]
    truecolor: bool,

    /// Use the 256 color table (default)
    #[arg(short = 'm', long = "256color")]
    color256: bool,

    /// Use only the 16 system colors
    #[arg(short = 's', long = "16color")]
    color16: bool,

    /// Use only the first 8 system colors
    #[arg(short = 'b', long = "8color")]
    color8: bool,

    /// System color palette for 8, 16 and 256 color output
    #[arg(short, long, value_name = "NAME")]
    palette: Option<String>,

    /// Disable warnings
    #[arg(short, long)]
    quiet: bool,

    /// Number of columns the output should span
    #[arg(short = 'w', long, default_value_t = 80)]
    cols: u16,

    /// Span the current terminal width instead of --cols
    #[arg(long)]
    fit: bool,

    /// Output file, `-` for stdout
    #[arg(short, long, default_value = "-")]
    output: PathBuf,
}

impl Cli {
    fn render_options(&self) -> climage_core::Result<RenderOptions> {
        let depth = if self.truecolor || self.color256 || self.color16 || self.color8 {
            ColorDepth::from_flags(self.truecolor, self.color256, self.color16, self.color8)?
        } else {
            ColorDepth::default()
        };

        let palette = match &self.palette {
            Some(name) => name.parse()?,
            None => PaletteName::default(),
        };

        // clap keeps the two from being set together.
        let mode = match (self.unicode, self.ascii) {
            (true, _) => Mode::Unicode,
            (false, _) => Mode::Ascii,
        };

        Ok(RenderOptions { mode, depth, palette })
    }

    fn columns(&self) -> anyhow::Result<u16> {
        if self.fit {
            let (cols, _) = terminal::size().context("failed to query terminal size")?;
            Ok(cols)
        } else {
            Ok(self.cols)
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let options = cli.render_options()?;
    if options.depth == ColorDepth::TrueColor && cli.palette.is_some() && !cli.quiet {
        tracing::warn!("choosing a palette with truecolor has no effect");
    }

    let cols = cli.columns()?;
    let input_str = cli.input.to_str().context("invalid input path")?;

    tracing::info!("decoding image: {}", cli.input.display());
    let image = decode_image(input_str)?;

    let mut resizer = FrameResizer::for_columns(image.width, image.height, cols as u32, options.mode);
    tracing::info!(
        "source {}x{} pixels, target {}x{} pixels",
        image.width,
        image.height,
        resizer.target_width(),
        resizer.target_height()
    );
    let frame = resizer.resize_to_frame(&image.data, image.width, image.height)?;

    let text = FrameRenderer::new(options).render(&frame)?;

    if cli.output.as_os_str() == "-" {
        let stdout = std::io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        out.write_all(text.into_string().as_bytes())?;
        out.flush()?;
    } else {
        let file = File::create(&cli.output)
            .with_context(|| format!("failed to create {}", cli.output.display()))?;
        let mut out = BufWriter::new(file);
        out.write_all(text.into_string().as_bytes())?;
        out.flush()?;
        tracing::info!("wrote {}", cli.output.display());
    }

    Ok(())
}
