//! embedded-hal Adapter
//!
//! [`OutputBank`] bildet [`LedDriver`] auf eine feste Menge von
//! `StatefulOutputPin`s ab. Kein PWM.

use embedded_hal::digital::StatefulOutputPin;

use crate::traits::{LedDriver, LedError};
use crate::types::{PinRef, PinState};

/// Feste Zuordnung `PinRef` → embedded-hal Ausgang
pub struct OutputBank<P, const N: usize> {
    lines: [(PinRef, P); N],
}

impl<P: StatefulOutputPin, const N: usize> OutputBank<P, N> {
    pub fn new(lines: [(PinRef, P); N]) -> Self {
        Self { lines }
    }

    pub fn into_inner(self) -> [(PinRef, P); N] {
        self.lines
    }

    /// Gehört der Pin zu dieser Bank?
    pub fn contains(&self, pin: PinRef) -> bool {
        self.lines.iter().any(|(line_pin, _)| *line_pin == pin)
    }

    fn line(&mut self, pin: PinRef) -> Result<&mut P, LedError> {
        self.lines
            .iter_mut()
            .find(|(line_pin, _)| *line_pin == pin)
            .map(|(_, line)| line)
            .ok_or(LedError::WriteFailed)
    }
}

impl<P: StatefulOutputPin, const N: usize> LedDriver for OutputBank<P, N> {
    fn configure_output(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError> {
        // Pins sind bereits typisierte Ausgänge - nur Startpegel setzen
        self.set_level(pin, level)
    }

    fn set_level(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError> {
        self.line(pin)?
            .set_state(level)
            .map_err(|_| LedError::WriteFailed)
    }

    fn level(&mut self, pin: PinRef) -> Result<PinState, LedError> {
        self.line(pin)?
            .is_set_high()
            .map(PinState::from)
            .map_err(|_| LedError::WriteFailed)
    }

    fn toggle(&mut self, pin: PinRef) -> Result<(), LedError> {
        self.line(pin)?.toggle().map_err(|_| LedError::WriteFailed)
    }
}
