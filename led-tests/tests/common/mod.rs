//! Gemeinsame Test-Fixtures: Mock LED-Treiber und Board-Tabellen

#![allow(dead_code)]

use std::collections::HashMap;

use led_core::{
    LedDescriptor, LedDriver, LedError, MuxAssignment, PinRef, PinState, PwmChannel,
};

/// Duty-Auflösung des Mock-Timers (entspricht 10 ms Periode bei 1 MHz)
pub const MOCK_MAX_DUTY: u16 = 10_000;

// ============================================================================
// Mock LED Driver
// ============================================================================

#[derive(Default)]
pub struct MockLedDriver {
    /// Aktueller Pegel pro Pin
    pub levels: HashMap<PinRef, PinState>,
    /// Reihenfolge der configure_output() Aufrufe
    pub configured: Vec<PinRef>,
    /// Kanäle mit PWM-Hardware
    pub pwm_channels: Vec<PwmChannel>,
    /// Duty-Readback unterstützt?
    pub pwm_readback: bool,
    /// Aktive PWM-Kanäle mit programmiertem Duty
    pub pwm_duty: HashMap<PwmChannel, u16>,
    /// Anzahl der Pegel-Schreibzugriffe
    pub write_count: usize,
    /// Simuliere Fehler beim nächsten Schreibzugriff
    pub fail_next_write: bool,
    /// pwm_disable() schlägt fehl (Kanal läuft weiter)
    pub fail_pwm_disable: bool,
}

impl MockLedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock mit PWM-Hardware auf den angegebenen Kanälen
    pub fn with_pwm(channels: &[PwmChannel], readback: bool) -> Self {
        Self {
            pwm_channels: channels.to_vec(),
            pwm_readback: readback,
            ..Self::default()
        }
    }

    pub fn level_of(&self, pin: PinRef) -> Option<PinState> {
        self.levels.get(&pin).copied()
    }

    fn write(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.levels.insert(pin, level);
        self.write_count += 1;
        Ok(())
    }
}

impl LedDriver for MockLedDriver {
    fn configure_output(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError> {
        self.write(pin, level)?;
        self.configured.push(pin);
        Ok(())
    }

    fn set_level(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError> {
        self.write(pin, level)
    }

    fn level(&mut self, pin: PinRef) -> Result<PinState, LedError> {
        self.levels.get(&pin).copied().ok_or(LedError::WriteFailed)
    }

    fn pwm_max_duty(&self, channel: PwmChannel) -> Option<u16> {
        self.pwm_channels
            .contains(&channel)
            .then_some(MOCK_MAX_DUTY)
    }

    fn pwm_enable(&mut self, _pin: PinRef, channel: PwmChannel, duty: u16) -> Result<(), LedError> {
        if !self.pwm_channels.contains(&channel) {
            return Err(LedError::PwmUnavailable);
        }
        self.pwm_duty.insert(channel, duty);
        Ok(())
    }

    fn pwm_disable(&mut self, _pin: PinRef, channel: PwmChannel) -> Result<(), LedError> {
        if self.fail_pwm_disable {
            return Err(LedError::WriteFailed);
        }
        self.pwm_duty.remove(&channel);
        Ok(())
    }

    fn pwm_duty(&self, channel: PwmChannel) -> Option<u16> {
        if !self.pwm_readback {
            return None;
        }
        self.pwm_duty.get(&channel).copied()
    }
}

// ============================================================================
// Board-Tabellen
// ============================================================================

/// Board mit N=2 LEDs (active-low), ohne PWM
pub static TWO_LEDS: [LedDescriptor; 2] = [
    LedDescriptor::new(1, PinRef(10)).active_low(),
    LedDescriptor::new(2, PinRef(11)).active_low(),
];

pub static TWO_LED_MUX: [MuxAssignment; 2] = [
    MuxAssignment::led(1, PinRef(10)),
    MuxAssignment::led(2, PinRef(11)),
];

/// Board mit 4 LEDs: LED 1 + 2 PWM-fähig, LED 4 invertierter IR-Kanal
pub static PWM_LEDS: [LedDescriptor; 4] = [
    LedDescriptor::new(1, PinRef(4))
        .active_low()
        .with_pwm(PwmChannel(0)),
    LedDescriptor::new(2, PinRef(5))
        .active_low()
        .with_pwm(PwmChannel(1)),
    LedDescriptor::new(3, PinRef(6)).active_low(),
    LedDescriptor::new(4, PinRef(7)).active_low().inverted(),
];

/// LED 3 ist (noch) nicht in der Mux-Tabelle → immer Fallback.
/// UART TX konkurriert mit LED 2 um GPIO5.
pub static PWM_LED_MUX: [MuxAssignment; 4] = [
    MuxAssignment::led(1, PinRef(4)),
    MuxAssignment::led(2, PinRef(5)),
    MuxAssignment::led(4, PinRef(7)),
    MuxAssignment::new("uart", 1, "tx", PinRef(5)),
];
