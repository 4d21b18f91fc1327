//! Pure compositing: which source pixel lands on which grid cell.
//!
//! Nothing here touches the grid or the clock. Each mode is described as
//! a sequence of steps, and each step as a list of [`Placement`]s that the
//! playback loop writes between a clear and a commit.
//!
//! ## Scrolling
//! A scroll is two phases sharing one cursor `c`:
//! - **Entry**, `c = W, W-1, ..., 0`: the first `W - c` source columns are
//!   visible, source column `i` drawn at grid column `i + c`.
//! - **Exit**, `c = 0, 1, ..., len - 1`: source columns `c..c + W` are
//!   visible, source column `s` drawn at grid column `s - c`.
//!
//! At `c = 0` both formulas give the identity mapping, so the art slides in
//! from the right and out to the left without a seam.

use crate::PanelConfig;
use crate::Pixel;
use crate::art::{Animation, Frame};

/// One cell write: draw `pixel` at grid `(col, row)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Placement {
    pub col: usize,
    pub row: usize,
    pub pixel: Pixel,
}

/// Place source columns on the grid.
///
/// `mapping` yields `(source column, grid column)` pairs. Rows at or below
/// the grid height are dropped, as are mappings that fall outside either
/// the frame or the grid.
fn place<'a>(
    frame: &'a Frame,
    panel: PanelConfig,
    mapping: impl Iterator<Item = (usize, usize)> + 'a,
) -> impl Iterator<Item = Placement> + 'a {
    mapping
        .filter(move |&(_, col)| col < panel.cols)
        .filter_map(move |(src, col)| frame.column(src).map(|column| (col, column)))
        .flat_map(move |(col, column)| {
            column
                .iter()
                .take(panel.rows)
                .enumerate()
                .map(move |(row, &pixel)| Placement { col, row, pixel })
        })
}

// ── Static ───────────────────────────────────────────────────────────

/// Columns a static picture of `frame_len` columns shows on a grid `width`
/// wide. Extra columns are dropped, never wrapped or squeezed.
pub fn clipped_width(frame_len: usize, width: usize) -> usize {
    frame_len.min(width)
}

/// Placements for showing `frame` as-is at the top-left of the grid.
///
/// A frame narrower than the grid leaves the right-hand columns untouched.
pub fn static_placements(
    frame: &Frame,
    panel: PanelConfig,
) -> impl Iterator<Item = Placement> + '_ {
    let visible = clipped_width(frame.width(), panel.cols);
    place(frame, panel, (0..visible).map(|i| (i, i)))
}

// ── Scroll ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPhase {
    /// Sliding in from the right edge.
    Entry,
    /// Sliding off past the left edge.
    Exit,
}

/// One scroll state: the phase and the cursor value it is drawn at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScrollStep {
    pub phase: ScrollPhase,
    pub cursor: usize,
}

impl ScrollStep {
    /// `(source column, grid column)` pairs visible at this step.
    pub fn column_mapping(
        self,
        frame_len: usize,
        width: usize,
    ) -> impl Iterator<Item = (usize, usize)> {
        let c = self.cursor;
        let (sources, shift_right) = match self.phase {
            ScrollPhase::Entry => (0..width.saturating_sub(c).min(frame_len), true),
            ScrollPhase::Exit => (c.min(frame_len)..(c + width).min(frame_len), false),
        };
        sources.map(move |src| {
            if shift_right {
                (src, src + c)
            } else {
                (src, src - c)
            }
        })
    }

    pub fn placements<'a>(
        self,
        frame: &'a Frame,
        panel: PanelConfig,
    ) -> impl Iterator<Item = Placement> + 'a {
        place(frame, panel, self.column_mapping(frame.width(), panel.cols))
    }
}

/// The cursor of one scroll.
///
/// Yields `W + 1` entry steps followed by `frame_len` exit steps. The
/// cursor only ever moves one way per phase and the exit picks up exactly
/// where the entry stopped.
#[derive(Clone, Debug)]
pub struct ScrollSteps {
    frame_len: usize,
    next: Option<ScrollStep>,
}

impl ScrollSteps {
    pub fn new(frame_len: usize, width: usize) -> Self {
        Self {
            frame_len,
            next: Some(ScrollStep {
                phase: ScrollPhase::Entry,
                cursor: width,
            }),
        }
    }
}

impl Iterator for ScrollSteps {
    type Item = ScrollStep;

    fn next(&mut self) -> Option<ScrollStep> {
        let step = self.next?;
        self.next = match step.phase {
            ScrollPhase::Entry if step.cursor > 0 => Some(ScrollStep {
                phase: ScrollPhase::Entry,
                cursor: step.cursor - 1,
            }),
            ScrollPhase::Entry => Some(ScrollStep {
                phase: ScrollPhase::Exit,
                cursor: 0,
            }),
            ScrollPhase::Exit => Some(ScrollStep {
                phase: ScrollPhase::Exit,
                cursor: step.cursor + 1,
            }),
        };
        if step.phase == ScrollPhase::Exit && step.cursor >= self.frame_len {
            // nothing left to show
            self.next = None;
            return None;
        }
        Some(step)
    }
}

// ── Animation ────────────────────────────────────────────────────────

/// One frame draw within a looped animation.
#[derive(Clone, Copy, Debug)]
pub struct AnimationStep<'a> {
    /// Zero-based pass through the sequence.
    pub pass: usize,
    /// Index of `frame` within the sequence.
    pub index: usize,
    pub frame: &'a Frame,
}

impl<'a> AnimationStep<'a> {
    pub fn placements(self, panel: PanelConfig) -> impl Iterator<Item = Placement> + 'a {
        static_placements(self.frame, panel)
    }
}

/// Every frame of `animation`, in order, `repeats` times over.
pub fn animation_steps(
    animation: &Animation,
    repeats: usize,
) -> impl Iterator<Item = AnimationStep<'_>> {
    (0..repeats).flat_map(move |pass| {
        animation
            .frames()
            .iter()
            .enumerate()
            .map(move |(index, frame)| AnimationStep { pass, index, frame })
    })
}

// ── Boot ─────────────────────────────────────────────────────────────

/// Rows lit by each boot progress-bar segment.
pub const BOOT_BAR_ROWS: [usize; 3] = [2, 3, 4];

/// Grid columns lit one by one by the boot progress bar: every even column.
pub fn boot_bar_columns(width: usize) -> impl Iterator<Item = usize> {
    (0..width).step_by(2)
}

/// Placements for one boot progress-bar segment.
pub fn boot_bar_segment(col: usize, panel: PanelConfig) -> impl Iterator<Item = Placement> {
    BOOT_BAR_ROWS
        .into_iter()
        .filter(move |&row| panel.contains(col, row))
        .map(move |row| Placement {
            col,
            row,
            pixel: Pixel::WHITE,
        })
}
