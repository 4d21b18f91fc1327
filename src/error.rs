//! Error types shared by the grid, the art loader, and the button handling.
//!
//! None of these are fatal to the playback loop: out-of-bounds writes are
//! dropped, unknown buttons are logged, and malformed art is rejected before
//! it ever reaches the renderer.

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while driving the lamp.
#[derive(Debug, Error)]
pub enum LampError {
    /// A write targeted a cell outside the grid.
    #[error("pixel ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfBounds {
        col: usize,
        row: usize,
        width: usize,
        height: usize,
    },

    /// A channel value outside 0..=255.
    #[error("{channel} channel value {value} is outside 0..=255")]
    MalformedPixel { channel: &'static str, value: i64 },

    /// An input event for a pin that has no entry in the button table.
    #[error("unknown button on pin {0}")]
    UnknownButton(u8),

    /// Brightness must be within [0, 1].
    #[error("brightness {0} is outside 0.0..=1.0")]
    InvalidBrightness(f32),

    /// An animation needs at least one frame.
    #[error("animation has no frames")]
    EmptyAnimation,

    /// No art file or directory at the given path.
    #[error("no pixel art found at {}", .0.display())]
    NoArt(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid art JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Result type for lamp operations.
pub type Result<T> = std::result::Result<T, LampError>;
