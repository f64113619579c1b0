pub mod color;
pub mod encode;
pub mod error;
pub mod frame;
pub mod kdtree;
pub mod palette;
pub mod render;
pub mod resolve;

pub use color::{ColorDepth, Mode, Resolved, Rgb};
pub use error::{Error, Result};
pub use frame::Frame;
pub use palette::{PaletteEntry, PaletteName};
pub use render::{render, render_named, FrameRenderer, RenderOptions, RenderedText};
pub use resolve::{resolve, resolve_named, ColorResolver};
