//! Hardware driver backed by `rpi-led-matrix`.
//!
//! The C library double-buffers: we draw into an offscreen canvas and swap
//! it in on `show`, so a commit is atomic from the panel's point of view.
//! The library is not thread-safe; the driver must stay on the thread that
//! runs the playback loop.

use crate::grid::DisplayDriver;
use crate::{PanelConfig, Pixel, create_matrix};
use rpi_led_matrix::{LedCanvas, LedMatrix};

pub struct LedMatrixDriver {
    matrix: LedMatrix,
    // Only `None` for the duration of a swap.
    canvas: Option<LedCanvas>,
    brightness: u8,
}

impl LedMatrixDriver {
    pub fn new(
        panel: PanelConfig,
        hardware_mapping: &str,
        gpio_slowdown: u32,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let matrix = create_matrix(panel, hardware_mapping, gpio_slowdown)?;
        let canvas = matrix.offscreen_canvas();
        Ok(Self {
            matrix,
            canvas: Some(canvas),
            brightness: 100,
        })
    }
}

impl DisplayDriver for LedMatrixDriver {
    fn set_pixel(&mut self, col: usize, row: usize, r: u8, g: u8, b: u8) {
        let pixel = Pixel::new(r, g, b).apply_brightness(self.brightness);
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.set(col as i32, row as i32, &pixel.into());
        }
    }

    fn clear(&mut self) {
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.clear();
        }
    }

    fn show(&mut self) {
        if let Some(canvas) = self.canvas.take() {
            self.canvas = Some(self.matrix.swap(canvas));
        }
    }

    fn set_brightness(&mut self, level: f32) {
        self.brightness = (level * 100.0).round() as u8;
    }
}
