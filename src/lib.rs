//! Pixel-art player for small RGB LED matrices.
//!
//! This crate provides:
//! - Panel and timing configuration
//! - The [`Pixel`] color type shared by art, grid and driver
//! - Matrix initialization with our hardware defaults
//! - Signal handling for clean shutdown
//!
//! The rendering core lives in [`render`] (pure compositing) and [`player`]
//! (the playback loop that owns the [`grid::Grid`] and real time).

pub mod art;
pub mod assets;
#[cfg(feature = "hardware")]
pub mod driver;
pub mod error;
pub mod grid;
pub mod input;
pub mod player;
pub mod render;

pub use error::{LampError, Result};

#[cfg(feature = "hardware")]
use rpi_led_matrix::{LedMatrix, LedMatrixOptions, LedRuntimeOptions};
use serde::Deserialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

// ── Panel configuration ────────────────────────────────────────────

/// Dimensions of the addressable grid.
///
/// Columns are addressed `0..cols`, rows `0..rows`. The default matches the
/// 17x7 board the lamp was first built on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PanelConfig {
    pub rows: usize,
    pub cols: usize,
}

impl PanelConfig {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Total number of cells on the panel.
    pub fn pixel_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Whether `(col, row)` addresses a cell on the panel.
    pub fn contains(&self, col: usize, row: usize) -> bool {
        col < self.cols && row < self.rows
    }
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self { rows: 7, cols: 17 }
    }
}

// ── Timing ─────────────────────────────────────────────────────────

/// Per-mode pacing. These are configuration, never derived from the art.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    /// How long a static picture stays up before it is cleared.
    pub static_dwell: Duration,
    /// Delay between scroll steps.
    pub scroll_tick: Duration,
    /// Delay between animation frames.
    pub animation_tick: Duration,
    /// Full passes through an animation.
    pub animation_repeats: usize,
    /// Delay between boot progress-bar segments.
    pub boot_tick: Duration,
    /// Hold after the boot progress bar completes.
    pub boot_dwell: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            static_dwell: Duration::from_secs(1),
            scroll_tick: Duration::from_millis(100),
            animation_tick: Duration::from_millis(100),
            animation_repeats: 5,
            boot_tick: Duration::from_millis(250),
            boot_dwell: Duration::from_secs(2),
        }
    }
}

// ── Pixel ──────────────────────────────────────────────────────────

/// One RGB cell. Channels are `u8`, so an out-of-range value can only exist
/// in raw input; [`Pixel::try_from`] rejects it there.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "[i64; 3]")]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const BLACK: Pixel = Pixel::new(0, 0, 0);
    pub const WHITE: Pixel = Pixel::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn is_black(&self) -> bool {
        *self == Self::BLACK
    }

    /// Apply brightness scaling (0-100) to this pixel.
    pub fn apply_brightness(self, brightness: u8) -> Self {
        if brightness >= 100 {
            return self;
        }
        Self {
            r: ((self.r as u16 * brightness as u16) / 100) as u8,
            g: ((self.g as u16 * brightness as u16) / 100) as u8,
            b: ((self.b as u16 * brightness as u16) / 100) as u8,
        }
    }
}

fn channel(name: &'static str, value: i64) -> Result<u8> {
    u8::try_from(value).map_err(|_| LampError::MalformedPixel {
        channel: name,
        value,
    })
}

impl TryFrom<[i64; 3]> for Pixel {
    type Error = LampError;

    fn try_from([r, g, b]: [i64; 3]) -> Result<Self> {
        Ok(Self::new(
            channel("red", r)?,
            channel("green", g)?,
            channel("blue", b)?,
        ))
    }
}

/// Convert our Pixel to the hardware crate's LedColor at the boundary.
#[cfg(feature = "hardware")]
impl From<Pixel> for rpi_led_matrix::LedColor {
    fn from(p: Pixel) -> Self {
        rpi_led_matrix::LedColor {
            red: p.r,
            green: p.g,
            blue: p.b,
        }
    }
}

// ── Matrix initialization ──────────────────────────────────────────

/// Create a matrix for the given panel.
///
/// Fails when GPIO is unavailable (e.g. not running as root).
#[cfg(feature = "hardware")]
pub fn create_matrix(
    panel: PanelConfig,
    hardware_mapping: &str,
    gpio_slowdown: u32,
) -> std::result::Result<LedMatrix, Box<dyn std::error::Error>> {
    let mut options = LedMatrixOptions::new();
    options.set_rows(panel.rows as u32);
    options.set_cols(panel.cols as u32);
    options.set_hardware_mapping(hardware_mapping);
    options.set_pwm_bits(8)?;
    options.set_pwm_lsb_nanoseconds(130);

    let mut rt_options = LedRuntimeOptions::new();
    rt_options.set_gpio_slowdown(gpio_slowdown);

    let matrix = LedMatrix::new(Some(options), Some(rt_options))?;

    Ok(matrix)
}

/// Set up a Ctrl+C handler that sets the returned flag to false.
pub fn setup_signal_handler() -> std::result::Result<Arc<AtomicBool>, ctrlc::Error> {
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();

    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })?;

    Ok(running)
}

/// Check if the main loop should keep running.
pub fn is_running(running: &AtomicBool) -> bool {
    running.load(Ordering::SeqCst)
}

// ── Tests ──────────────────────────────────────────────────────────
