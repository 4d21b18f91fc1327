//! Pixel-art data: column-major frames and animations.
//!
//! Art is always parsed and validated before it reaches the renderer, so a
//! [`Frame`] only ever holds in-range [`Pixel`]s.

use crate::{LampError, Pixel, Result};
use serde::Deserialize;

/// One column of a frame, top row first.
pub type Column = Vec<Pixel>;

/// One still image, stored column by column.
///
/// The column count may be smaller, equal to, or larger than the grid
/// width. Columns need not all be the same height.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Frame {
    columns: Vec<Column>,
}

impl Frame {
    pub fn new(columns: Vec<Column>) -> Self {
        Self { columns }
    }

    /// Build a frame from rows (the way art is usually typed out) instead
    /// of columns.
    pub fn from_rows(rows: &[Vec<Pixel>]) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        let columns = (0..width)
            .map(|x| {
                rows.iter()
                    .map(|row| row.get(x).copied().unwrap_or(Pixel::BLACK))
                    .collect()
            })
            .collect();
        Self { columns }
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Height of the tallest column.
    pub fn height(&self) -> usize {
        self.columns.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> Option<&[Pixel]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// The pixel at `(col, row)`, if the frame has one there.
    pub fn get(&self, col: usize, row: usize) -> Option<Pixel> {
        self.columns.get(col)?.get(row).copied()
    }
}

/// An ordered, finite, non-empty sequence of frames.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<Frame>")]
pub struct Animation {
    frames: Vec<Frame>,
}

impl Animation {
    pub fn new(frames: Vec<Frame>) -> Result<Self> {
        if frames.is_empty() {
            return Err(LampError::EmptyAnimation);
        }
        Ok(Self { frames })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

impl TryFrom<Vec<Frame>> for Animation {
    type Error = LampError;

    fn try_from(frames: Vec<Frame>) -> Result<Self> {
        Self::new(frames)
    }
}

/// The battery outline shown while booting, sized for a 17x7 grid.
pub fn battery() -> Frame {
    const W: Pixel = Pixel::WHITE;
    const O: Pixel = Pixel::BLACK;
    let mut rows = vec![vec![W; 16]; 7];
    for row in rows.iter_mut().take(6).skip(1) {
        row[1..15].fill(O);
    }
    // terminal nub
    for row in rows.iter_mut().take(5).skip(2) {
        row.push(W);
    }
    Frame::from_rows(&rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const R: Pixel = Pixel::new(255, 0, 0);
    const G: Pixel = Pixel::new(0, 255, 0);

    #[test]
    fn frame_reports_width_and_tallest_column() {
        let frame = Frame::new(vec![vec![R], vec![R, G, R], vec![]]);
        assert_eq!(frame.width(), 3);
        assert_eq!(frame.height(), 3);
        assert_eq!(frame.get(1, 1), Some(G));
        assert_eq!(frame.get(2, 0), None);
    }

    #[test]
    fn from_rows_transposes_and_pads() {
        let frame = Frame::from_rows(&[vec![R, G], vec![G]]);
        assert_eq!(frame.columns(), &[vec![R, G], vec![G, Pixel::BLACK]]);
    }

    #[test]
    fn frame_parses_column_major_json() {
        let frame: Frame = serde_json::from_str("[[[255,0,0],[0,255,0]],[[0,0,0]]]").unwrap();
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.column(0), Some(&[R, G][..]));
    }

    #[test]
    fn frame_json_with_malformed_pixel_is_rejected() {
        let err = serde_json::from_str::<Frame>("[[[255,0,256]]]").unwrap_err();
        assert!(err.to_string().contains("blue channel value 256"));
    }

    #[test]
    fn animation_requires_a_frame() {
        assert!(matches!(
            Animation::new(Vec::new()),
            Err(LampError::EmptyAnimation)
        ));
        assert!(serde_json::from_str::<Animation>("[]").is_err());
    }

    #[test]
    fn animation_parses_list_of_frames() {
        let anim: Animation = serde_json::from_str("[[[[1,2,3]]], [[[4,5,6]]]]").unwrap();
        assert_eq!(anim.len(), 2);
        assert_eq!(anim.frames()[1].get(0, 0), Some(Pixel::new(4, 5, 6)));
    }

    #[test]
    fn battery_fits_default_panel() {
        let frame = battery();
        assert_eq!(frame.width(), 17);
        assert_eq!(frame.height(), 7);
        // hollow inside, nub on the right
        assert_eq!(frame.get(5, 3), Some(Pixel::BLACK));
        assert_eq!(frame.get(16, 3), Some(Pixel::WHITE));
        assert_eq!(frame.get(16, 0), Some(Pixel::BLACK));
    }
}
