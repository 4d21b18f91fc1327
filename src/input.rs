//! Buttons: the pin-to-name table and the event channel into the playback loop.
//!
//! Handlers registered with an [`InputSubsystem`] may fire at any time,
//! including mid-frame, so they never block: they only push the pin number
//! into an `mpsc` channel. The playback loop drains that channel with
//! `try_recv()` between frames and resolves each pin to a [`Button`].

use crate::{LampError, Result};
use std::collections::HashMap;
use std::fmt;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Button {
    A,
    B,
    X,
    Y,
}

impl Button {
    pub fn name(self) -> &'static str {
        match self {
            Button::A => "A",
            Button::B => "B",
            Button::X => "X",
            Button::Y => "Y",
        }
    }
}

impl fmt::Display for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// GPIO pin of each button on the board.
pub const BUTTON_MAP: [(u8, Button); 4] = [
    (5, Button::A),
    (6, Button::B),
    (16, Button::X),
    (24, Button::Y),
];

/// Look up the button wired to `pin`.
pub fn resolve(pin: u8) -> Result<Button> {
    BUTTON_MAP
        .iter()
        .find(|(p, _)| *p == pin)
        .map(|&(_, button)| button)
        .ok_or(LampError::UnknownButton(pin))
}

/// Look up the pin of a button by (case-insensitive) name.
pub fn pin_for_name(name: &str) -> Option<u8> {
    BUTTON_MAP
        .iter()
        .find(|(_, button)| button.name().eq_ignore_ascii_case(name))
        .map(|&(pin, _)| pin)
}

/// Called with the pin number on every press edge. Must not block.
pub type PressHandler = Box<dyn Fn(u8) + Send + 'static>;

/// Per-button edge-triggered registration.
pub trait InputSubsystem {
    fn on_press(&mut self, button_id: u8, handler: PressHandler);
}

// ── Event channel ────────────────────────────────────────────────────

/// The receiving end of button presses, polled by the playback loop.
pub struct ButtonEvents {
    rx: Receiver<u8>,
}

impl ButtonEvents {
    /// Register a forwarding handler for every button in [`BUTTON_MAP`].
    pub fn attach(input: &mut impl InputSubsystem) -> Self {
        let pins: Vec<u8> = BUTTON_MAP.iter().map(|&(pin, _)| pin).collect();
        Self::attach_pins(input, &pins)
    }

    /// Register a forwarding handler for each of `pins`.
    pub fn attach_pins(input: &mut impl InputSubsystem, pins: &[u8]) -> Self {
        let (tx, rx) = mpsc::channel();
        for &pin in pins {
            let tx: Sender<u8> = tx.clone();
            input.on_press(
                pin,
                Box::new(move |id| {
                    // The loop may already be gone; nothing to do then.
                    let _ = tx.send(id);
                }),
            );
        }
        Self { rx }
    }

    /// All presses received since the last poll, without blocking.
    pub fn poll(&self) -> Vec<Result<Button>> {
        let mut presses = Vec::new();
        while let Ok(pin) = self.rx.try_recv() {
            presses.push(resolve(pin));
        }
        presses
    }
}

// ── Line input ───────────────────────────────────────────────────────

/// An input subsystem fed by text lines, one press per line.
///
/// A line is either a pin number (`"5"`) or a button name (`"a"`). The
/// binary runs this over stdin on its own thread.
#[derive(Default)]
pub struct LineInput {
    handlers: HashMap<u8, Vec<PressHandler>>,
}

impl LineInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire the handlers for `pin`. Returns false if none are registered.
    pub fn press(&self, pin: u8) -> bool {
        match self.handlers.get(&pin) {
            Some(handlers) => {
                for handler in handlers {
                    handler(pin);
                }
                true
            }
            None => false,
        }
    }

    /// Read presses from `reader` until it is exhausted.
    pub fn run<R: BufRead>(&self, reader: R) -> std::io::Result<()> {
        for line in reader.lines() {
            let line = line?;
            let token = line.trim();
            if token.is_empty() {
                continue;
            }

            let pin = match token.parse::<u8>().ok().or_else(|| pin_for_name(token)) {
                Some(pin) => pin,
                None => {
                    tracing::warn!("Ignoring input line {:?}: not a pin or button name", token);
                    continue;
                }
            };

            if !self.press(pin) {
                tracing::warn!("{}", LampError::UnknownButton(pin));
            }
        }
        Ok(())
    }
}

impl InputSubsystem for LineInput {
    fn on_press(&mut self, button_id: u8, handler: PressHandler) {
        self.handlers.entry(button_id).or_default().push(handler);
    }
}
