/// Input-validation failures. All of them are detected before any output is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The palette name is not one of the built-in palettes.
    #[error("unknown palette: {0:?}")]
    UnknownPalette(String),

    /// The color depth is unrecognized, or more than one was selected.
    #[error("invalid color depth: {0}")]
    InvalidDepth(String),

    /// Unicode mode needs rows in pairs.
    #[error("unicode mode needs an even frame height, got {0}")]
    OddHeight(usize),

    /// A pixel buffer does not match the frame dimensions.
    #[error("frame buffer holds {actual} values, expected {expected}")]
    FrameSize { expected: usize, actual: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
