//! The addressable grid and the physical driver contract behind it.
//!
//! All drawing goes through [`Grid::set_pixel`] between a [`Grid::clear`] and
//! a [`Grid::commit`]. The grid keeps the whole picture in memory and hands
//! it to the driver in one go on commit, so the panel never shows half a
//! frame.

use crate::{LampError, PanelConfig, Pixel, Result};

/// What the core needs from a physical display.
///
/// Calls are synchronous and side-effect-only.
pub trait DisplayDriver {
    fn set_pixel(&mut self, col: usize, row: usize, r: u8, g: u8, b: u8);
    fn clear(&mut self);
    /// Make everything set since the last `show` visible.
    fn show(&mut self);
    /// Level in `[0, 1]`; already validated by the grid.
    fn set_brightness(&mut self, level: f32);
}

/// In-memory width x height picture plus the driver it is flushed to.
pub struct Grid<D: DisplayDriver> {
    panel: PanelConfig,
    cells: Vec<Pixel>,
    brightness: f32,
    driver: D,
}

impl<D: DisplayDriver> Grid<D> {
    pub fn new(driver: D, panel: PanelConfig) -> Self {
        Self {
            panel,
            cells: vec![Pixel::BLACK; panel.pixel_count()],
            brightness: 1.0,
            driver,
        }
    }

    pub fn panel(&self) -> PanelConfig {
        self.panel
    }

    pub fn width(&self) -> usize {
        self.panel.cols
    }

    pub fn height(&self) -> usize {
        self.panel.rows
    }

    /// Set every cell to black. Nothing reaches the panel until `commit`.
    pub fn clear(&mut self) {
        self.cells.fill(Pixel::BLACK);
    }

    /// Write one cell. Out-of-bounds writes change nothing and are reported.
    pub fn set_pixel(&mut self, col: usize, row: usize, pixel: Pixel) -> Result<()> {
        if !self.panel.contains(col, row) {
            return Err(LampError::OutOfBounds {
                col,
                row,
                width: self.panel.cols,
                height: self.panel.rows,
            });
        }
        self.cells[row * self.panel.cols + col] = pixel;
        Ok(())
    }

    pub fn get(&self, col: usize, row: usize) -> Option<Pixel> {
        self.panel
            .contains(col, row)
            .then(|| self.cells[row * self.panel.cols + col])
    }

    /// Push the full in-memory picture to the driver.
    pub fn commit(&mut self) {
        self.driver.clear();
        for (index, pixel) in self.cells.iter().enumerate() {
            if !pixel.is_black() {
                let (row, col) = (index / self.panel.cols, index % self.panel.cols);
                self.driver.set_pixel(col, row, pixel.r, pixel.g, pixel.b);
            }
        }
        self.driver.show();
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn set_brightness(&mut self, level: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&level) {
            return Err(LampError::InvalidBrightness(level));
        }
        self.brightness = level;
        self.driver.set_brightness(level);
        Ok(())
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn into_driver(self) -> D {
        self.driver
    }
}

// ── Recording driver ─────────────────────────────────────────────────

/// A driver that keeps every shown picture in memory.
///
/// Used on hosts without a panel and by the tests to observe exactly which
/// grid states were committed.
#[derive(Debug)]
pub struct RecordingDriver {
    panel: PanelConfig,
    pending: Vec<Pixel>,
    shown: Vec<Vec<Pixel>>,
    brightness: f32,
}

impl RecordingDriver {
    pub fn new(panel: PanelConfig) -> Self {
        Self {
            panel,
            pending: vec![Pixel::BLACK; panel.pixel_count()],
            shown: Vec::new(),
            brightness: 1.0,
        }
    }

    /// Every picture passed to `show`, oldest first, row-major.
    pub fn shown(&self) -> &[Vec<Pixel>] {
        &self.shown
    }

    pub fn last_shown(&self) -> Option<&[Pixel]> {
        self.shown.last().map(Vec::as_slice)
    }

    pub fn brightness(&self) -> f32 {
        self.brightness
    }

    /// Pixel at `(col, row)` of the `index`-th shown picture.
    pub fn pixel(&self, index: usize, col: usize, row: usize) -> Option<Pixel> {
        if !self.panel.contains(col, row) {
            return None;
        }
        self.shown
            .get(index)
            .map(|picture| picture[row * self.panel.cols + col])
    }

    /// Columns of the `index`-th picture that hold anything but black.
    pub fn lit_columns(&self, index: usize) -> Vec<usize> {
        (0..self.panel.cols)
            .filter(|&col| {
                (0..self.panel.rows)
                    .any(|row| self.pixel(index, col, row).is_some_and(|p| !p.is_black()))
            })
            .collect()
    }
}

impl DisplayDriver for RecordingDriver {
    fn set_pixel(&mut self, col: usize, row: usize, r: u8, g: u8, b: u8) {
        if self.panel.contains(col, row) {
            self.pending[row * self.panel.cols + col] = Pixel::new(r, g, b);
        }
    }

    fn clear(&mut self) {
        self.pending.fill(Pixel::BLACK);
    }

    fn show(&mut self) {
        self.shown.push(self.pending.clone());
    }

    fn set_brightness(&mut self, level: f32) {
        self.brightness = level;
    }
}
