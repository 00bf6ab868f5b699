//! Statische LED-Tabelle
//!
//! Compile-Time Beschreibung der LEDs eines Boards. Dient als Fallback,
//! wenn die Pin-Registry keinen Pin liefert.

use crate::traits::LedError;
use crate::types::{LedId, PinRef, Polarity, PwmChannel};

/// Eintrag der statischen LED-Tabelle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedDescriptor {
    /// Logische LED-Nummer (1-basiert)
    pub id: u8,
    /// Standard-Pin (Fallback)
    pub pin: PinRef,
    pub polarity: Polarity,
    /// PWM-Kanal, falls die LED an einem Timer-fähigen Pin hängt
    pub pwm: Option<PwmChannel>,
}

impl LedDescriptor {
    /// Nicht invertierte LED ohne PWM (Pin High = an)
    pub const fn new(id: u8, pin: PinRef) -> Self {
        Self {
            id,
            pin,
            polarity: Polarity::ActiveHigh,
            pwm: None,
        }
    }

    pub const fn active_low(mut self) -> Self {
        self.polarity = Polarity::ActiveLow;
        self
    }

    /// Invertiert die Polarität gegenüber dem Board-Standard
    pub const fn inverted(mut self) -> Self {
        self.polarity = self.polarity.inverted();
        self
    }

    pub const fn with_pwm(mut self, channel: PwmChannel) -> Self {
        self.pwm = Some(channel);
        self
    }
}

/// Statische LED-Tabelle eines Boards
///
/// Eintrag `i` beschreibt LED `i + 1`.
#[derive(Debug, Clone, Copy)]
pub struct LedTable<'a> {
    leds: &'a [LedDescriptor],
}

impl<'a> LedTable<'a> {
    pub const fn new(leds: &'a [LedDescriptor]) -> Self {
        Self { leds }
    }

    /// Anzahl N der LEDs
    pub const fn count(&self) -> usize {
        self.leds.len()
    }

    /// Validiert eine rohe LED-Nummer und liefert den Tabelleneintrag
    ///
    /// # Fehlerbehandlung
    /// `LedError::InvalidLedId` wenn `raw` nicht in `1..=N` liegt
    pub fn resolve(&self, raw: i32) -> Result<(LedId, &'a LedDescriptor), LedError> {
        let id = LedId::new(raw, self.count())?;
        self.get(id)
            .map(|led| (id, led))
            .ok_or(LedError::InvalidLedId(raw))
    }

    pub fn get(&self, id: LedId) -> Option<&'a LedDescriptor> {
        self.leds.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a LedDescriptor> + use<'a> {
        self.leds.iter()
    }

    /// Prüft, dass Eintrag `i` die Nummer `i + 1` trägt
    pub fn is_consistent(&self) -> bool {
        self.leds
            .iter()
            .enumerate()
            .all(|(index, led)| usize::from(led.id) == index + 1)
    }
}
