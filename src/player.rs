//! Playback loop: owns the grid and real time, and drives the renderer.
//!
//! Every mode follows the same cycle per step: clear, write the renderer's
//! placements, commit, then hold for the mode's tick. Between steps the
//! loop drains pending button presses and checks the Ctrl+C flag. On the
//! way out of any mode, finished or interrupted, the grid is cleared and
//! committed so no stale picture is left on the panel.
//!
//! ## Sequencing
//! Modes run strictly one after another on the calling thread. The sleeps
//! are plain blocking waits; button handlers run elsewhere and only queue
//! events, which are picked up here.

use crate::art::{self, Animation, Frame};
use crate::grid::{DisplayDriver, Grid};
use crate::input::{Button, ButtonEvents};
use crate::render::{self, Placement, ScrollPhase, ScrollSteps};
use crate::{Timing, is_running};
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::thread;
use std::time::Duration;

/// How a mode ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// Stopped early because the running flag was cleared.
    Interrupted,
}

pub struct Player<D: DisplayDriver> {
    grid: Grid<D>,
    timing: Timing,
    running: Arc<AtomicBool>,
    buttons: Option<ButtonEvents>,
    pressed: Vec<Button>,
}

impl<D: DisplayDriver> Player<D> {
    pub fn new(grid: Grid<D>, timing: Timing, running: Arc<AtomicBool>) -> Self {
        Self {
            grid,
            timing,
            running,
            buttons: None,
            pressed: Vec::new(),
        }
    }

    /// Poll `events` between frames.
    pub fn with_buttons(mut self, events: ButtonEvents) -> Self {
        self.buttons = Some(events);
        self
    }

    pub fn grid(&self) -> &Grid<D> {
        &self.grid
    }

    pub fn into_grid(self) -> Grid<D> {
        self.grid
    }

    pub fn timing(&self) -> Timing {
        self.timing
    }

    /// Buttons pressed so far, in order.
    pub fn pressed(&self) -> &[Button] {
        &self.pressed
    }

    // ── Modes ────────────────────────────────────────────────────────

    /// Show `frame` clipped to the grid, hold for the static dwell, clear.
    pub fn display_art(&mut self, frame: &Frame) -> Outcome {
        let panel = self.grid.panel();
        self.warn_if_too_tall(frame);
        tracing::info!(
            "Displaying art: {} columns ({} visible)",
            frame.width(),
            render::clipped_width(frame.width(), panel.cols)
        );

        self.draw(render::static_placements(frame, panel));
        if !self.hold(self.timing.static_dwell) {
            return self.finish(Outcome::Interrupted);
        }
        self.finish(Outcome::Completed)
    }

    /// Slide `frame` in from the right edge and out past the left edge.
    pub fn display_scrolling_art(&mut self, frame: &Frame) -> Outcome {
        let panel = self.grid.panel();
        self.warn_if_too_tall(frame);
        tracing::info!(
            "Scrolling art: {} columns across {} ({} steps)",
            frame.width(),
            panel.cols,
            panel.cols + 1 + frame.width()
        );

        for step in ScrollSteps::new(frame.width(), panel.cols) {
            tracing::debug!("Scroll {:?} at cursor {}", step.phase, step.cursor);
            self.draw(step.placements(frame, panel));

            // The exit phase redraws this exact picture next; hold it once.
            let seam = step.phase == ScrollPhase::Entry && step.cursor == 0;
            if seam {
                continue;
            }
            if !self.hold(self.timing.scroll_tick) {
                return self.finish(Outcome::Interrupted);
            }
        }
        self.finish(Outcome::Completed)
    }

    /// Play every frame of `animation` in order, `animation_repeats` times.
    pub fn display_animation(&mut self, animation: &Animation) -> Outcome {
        let panel = self.grid.panel();
        let repeats = self.timing.animation_repeats;
        for frame in animation.frames() {
            self.warn_if_too_tall(frame);
        }
        tracing::info!(
            "Playing animation: {} frames x {} passes",
            animation.len(),
            repeats
        );

        for step in render::animation_steps(animation, repeats) {
            tracing::debug!("Animation pass {} frame {}", step.pass, step.index);
            self.draw(step.placements(panel));
            if !self.hold(self.timing.animation_tick) {
                return self.finish(Outcome::Interrupted);
            }
        }
        self.finish(Outcome::Completed)
    }

    /// Battery outline with a filling progress bar.
    pub fn boot_up(&mut self) -> Outcome {
        let panel = self.grid.panel();
        tracing::info!("Booting up");

        self.draw(render::static_placements(&art::battery(), panel));
        for col in render::boot_bar_columns(panel.cols) {
            self.overlay(render::boot_bar_segment(col, panel));
            self.grid.commit();
            if !self.hold(self.timing.boot_tick) {
                return self.finish(Outcome::Interrupted);
            }
        }
        if !self.hold(self.timing.boot_dwell) {
            return self.finish(Outcome::Interrupted);
        }
        self.finish(Outcome::Completed)
    }

    /// Blank the panel.
    pub fn clear(&mut self) {
        self.grid.clear();
        self.grid.commit();
    }

    // ── Buttons ──────────────────────────────────────────────────────

    /// Handle every queued button press. Returns how many were recognised.
    pub fn poll_buttons(&mut self) -> usize {
        let Some(events) = &self.buttons else {
            return 0;
        };
        let mut handled = 0;
        for press in events.poll() {
            match press {
                Ok(button) => {
                    tracing::info!("Button {} pressed!", button);
                    self.pressed.push(button);
                    handled += 1;
                }
                Err(e) => tracing::warn!("Ignoring press: {}", e),
            }
        }
        handled
    }

    // ── Helpers ──────────────────────────────────────────────────────

    fn draw(&mut self, placements: impl Iterator<Item = Placement>) {
        self.grid.clear();
        self.overlay(placements);
        self.grid.commit();
    }

    fn overlay(&mut self, placements: impl Iterator<Item = Placement>) {
        for p in placements {
            if let Err(e) = self.grid.set_pixel(p.col, p.row, p.pixel) {
                tracing::warn!("Dropped write: {}", e);
            }
        }
    }

    /// Wait one tick. Returns false if playback should stop.
    fn hold(&mut self, duration: Duration) -> bool {
        self.poll_buttons();
        if !is_running(&self.running) {
            return false;
        }
        if !duration.is_zero() {
            thread::sleep(duration);
        }
        self.poll_buttons();
        is_running(&self.running)
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.clear();
        if outcome == Outcome::Interrupted {
            tracing::info!("Playback interrupted, display cleared");
        }
        outcome
    }

    fn warn_if_too_tall(&self, frame: &Frame) {
        let rows = self.grid.height();
        if frame.height() > rows {
            tracing::warn!(
                "Art is {} rows tall; rows beyond {} are not drawn",
                frame.height(),
                rows
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::RecordingDriver;
    use crate::input::LineInput;
    use crate::{PanelConfig, Pixel};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn instant_timing() -> Timing {
        Timing {
            static_dwell: Duration::ZERO,
            scroll_tick: Duration::ZERO,
            animation_tick: Duration::ZERO,
            animation_repeats: 5,
            boot_tick: Duration::ZERO,
            boot_dwell: Duration::ZERO,
        }
    }

    fn player(rows: usize, cols: usize) -> Player<RecordingDriver> {
        player_with(rows, cols, true)
    }

    fn player_with(rows: usize, cols: usize, running: bool) -> Player<RecordingDriver> {
        let panel = PanelConfig::new(rows, cols);
        let grid = Grid::new(RecordingDriver::new(panel), panel);
        Player::new(grid, instant_timing(), Arc::new(AtomicBool::new(running)))
    }

    /// Column `i` filled with pixel `(i + 1, 0, 0)`.
    fn numbered_frame(cols: usize, rows: usize) -> Frame {
        Frame::new(
            (0..cols)
                .map(|i| vec![Pixel::new(i as u8 + 1, 0, 0); rows])
                .collect(),
        )
    }

    fn all_black(picture: &[Pixel]) -> bool {
        picture.iter().all(Pixel::is_black)
    }

    #[test]
    fn static_frame_narrower_than_grid() {
        let mut player = player(2, 5);
        let outcome = player.display_art(&numbered_frame(3, 2));
        assert_eq!(outcome, Outcome::Completed);

        let driver = player.grid().driver();
        assert_eq!(driver.shown().len(), 2);
        assert_eq!(driver.lit_columns(0), vec![0, 1, 2]);
        assert_eq!(driver.pixel(0, 2, 1), Some(Pixel::new(3, 0, 0)));
        assert!(all_black(driver.last_shown().unwrap()));
    }

    #[test]
    fn static_frame_wider_than_grid_is_clipped() {
        let mut player = player(1, 5);
        player.display_art(&numbered_frame(9, 1));
        let driver = player.grid().driver();
        assert_eq!(driver.lit_columns(0), vec![0, 1, 2, 3, 4]);
        assert_eq!(driver.pixel(0, 4, 0), Some(Pixel::new(5, 0, 0)));
    }

    #[test]
    fn tall_frame_is_truncated_not_rejected() {
        let mut player = player(2, 3);
        assert_eq!(player.display_art(&numbered_frame(3, 6)), Outcome::Completed);
        assert_eq!(player.grid().driver().lit_columns(0), vec![0, 1, 2]);
    }

    #[test]
    fn scroll_of_8_on_width_5_commits_14_states_then_clears() {
        let mut player = player(1, 5);
        let outcome = player.display_scrolling_art(&numbered_frame(8, 1));
        assert_eq!(outcome, Outcome::Completed);

        let driver = player.grid().driver();
        assert_eq!(driver.shown().len(), 15);
        assert!(all_black(&driver.shown()[0]));
        // last entry state and first exit state are identical: no seam
        assert_eq!(driver.shown()[5], driver.shown()[6]);
        assert_eq!(driver.lit_columns(5), vec![0, 1, 2, 3, 4]);
        // final exit state shows only the last source column at the left edge
        assert_eq!(driver.lit_columns(13), vec![0]);
        assert_eq!(driver.pixel(13, 0, 0), Some(Pixel::new(8, 0, 0)));
        assert!(all_black(driver.last_shown().unwrap()));
    }

    #[rstest]
    #[case(0, 5)]
    #[case(2, 5)]
    #[case(17, 17)]
    #[case(30, 17)]
    fn scroll_commit_count(#[case] len: usize, #[case] width: usize) {
        let mut player = player(1, width);
        player.display_scrolling_art(&numbered_frame(len, 1));
        let commits = player.grid().driver().shown().len();
        assert_eq!(commits, (width + 1) + len + 1);
    }

    #[test]
    fn animation_draws_every_frame_each_pass_and_ends_cleared() {
        let mut player = player(1, 4);
        let frames = vec![numbered_frame(1, 1), numbered_frame(2, 1), numbered_frame(3, 1)];
        let animation = Animation::new(frames).unwrap();
        assert_eq!(player.display_animation(&animation), Outcome::Completed);

        let driver = player.grid().driver();
        assert_eq!(driver.shown().len(), 3 * 5 + 1);
        let widths: Vec<usize> = (0..6).map(|i| driver.lit_columns(i).len()).collect();
        assert_eq!(widths, vec![1, 2, 3, 1, 2, 3]);
        assert!(all_black(driver.last_shown().unwrap()));
    }

    #[test]
    fn animation_honours_configured_repeats() {
        let panel = PanelConfig::new(1, 4);
        let timing = Timing {
            animation_repeats: 2,
            ..instant_timing()
        };
        let grid = Grid::new(RecordingDriver::new(panel), panel);
        let mut player = Player::new(grid, timing, Arc::new(AtomicBool::new(true)));
        let animation = Animation::new(vec![numbered_frame(1, 1); 4]).unwrap();
        player.display_animation(&animation);
        assert_eq!(player.grid().driver().shown().len(), 4 * 2 + 1);
    }

    #[test]
    fn interrupted_scroll_stops_and_clears() {
        let mut player = player_with(1, 5, false);
        let outcome = player.display_scrolling_art(&numbered_frame(8, 1));
        assert_eq!(outcome, Outcome::Interrupted);
        let driver = player.grid().driver();
        assert_eq!(driver.shown().len(), 2);
        assert!(all_black(driver.last_shown().unwrap()));
    }

    #[test]
    fn interrupted_animation_leaves_grid_cleared() {
        let mut player = player_with(1, 5, false);
        let animation = Animation::new(vec![numbered_frame(5, 1); 3]).unwrap();
        assert_eq!(player.display_animation(&animation), Outcome::Interrupted);
        assert!(all_black(player.grid().driver().last_shown().unwrap()));
    }

    #[test]
    fn boot_up_fills_bar_on_even_columns() {
        let mut player = player(7, 17);
        assert_eq!(player.boot_up(), Outcome::Completed);

        let driver = player.grid().driver();
        // battery, 9 segments, final clear
        assert_eq!(driver.shown().len(), 1 + 9 + 1);
        let full = 9;
        for col in (0..17).step_by(2) {
            assert_eq!(driver.pixel(full, col, 3), Some(Pixel::WHITE));
        }
        assert_eq!(driver.pixel(full, 5, 3), Some(Pixel::BLACK));
        assert_eq!(driver.pixel(1, 2, 3), Some(Pixel::BLACK));
        assert!(all_black(driver.last_shown().unwrap()));
    }

    #[test]
    fn button_presses_are_picked_up_between_frames() {
        let mut input = LineInput::new();
        let events = ButtonEvents::attach(&mut input);
        let mut player = player(1, 3).with_buttons(events);

        input.press(24);
        input.press(5);
        player.display_art(&numbered_frame(1, 1));
        assert_eq!(player.pressed(), &[Button::Y, Button::A]);
    }

    #[test]
    fn unknown_button_does_not_stop_playback() {
        let mut input = LineInput::new();
        let events = ButtonEvents::attach_pins(&mut input, &[99]);
        let mut player = player(1, 3).with_buttons(events);

        input.press(99);
        assert_eq!(player.display_art(&numbered_frame(1, 1)), Outcome::Completed);
        assert!(player.pressed().is_empty());
    }

    #[test]
    fn poll_without_buttons_is_a_no_op() {
        let mut player = player(1, 3);
        assert_eq!(player.poll_buttons(), 0);
    }
}
