//! Hardware Abstraction Traits
//!
//! Diese Traits definieren Schnittstellen für Pin-Registry und LED-Treiber
//! ohne konkrete Implementierung.

use core::cell::RefCell;
use core::fmt;

use crate::types::{OwnerKey, PinRef, PinState, PwmChannel};

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// LED-Nummer liegt nicht in `1..=N` (nur bei der Konstruktion)
    InvalidLedId(i32),
    /// Treiber konnte den Pin nicht ansteuern
    WriteFailed,
    /// PWM für diesen Kanal nicht verfügbar
    PwmUnavailable,
    /// Alle Handle-Slots des Bindings belegt
    NoFreeHandle,
    /// Anfrage unvollständig (fehlende Felder)
    MalformedRequest,
}

impl LedError {
    /// Kurzbeschreibung ohne Parameter (für Protokoll-Antworten)
    pub const fn as_str(self) -> &'static str {
        match self {
            LedError::InvalidLedId(_) => "LED does not exist",
            LedError::WriteFailed => "pin write failed",
            LedError::PwmUnavailable => "PWM unavailable",
            LedError::NoFreeHandle => "no free handle",
            LedError::MalformedRequest => "malformed request",
        }
    }
}

impl fmt::Display for LedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedError::InvalidLedId(id) => write!(f, "LED({id}) does not exist"),
            other => f.write_str(other.as_str()),
        }
    }
}

impl core::error::Error for LedError {}

/// Trait für die gemeinsame Pin-Registry (Mux-Manager)
///
/// Einziger Schiedsrichter über Pin-Belegungen aller Peripherie-Treiber.
///
/// # Implementierungen
/// - **Production/Testing:** `MuxRegistry` (statische Zuordnungstabelle)
/// - **Geteilt:** `&RefCell<T>` wenn mehrere Treiber dieselbe Registry nutzen
pub trait PinRegistry {
    /// Beansprucht exklusiv einen Pin für `key`
    ///
    /// `None` wenn kein Pin zugeordnet ist oder er bereits belegt ist.
    fn take(&mut self, key: &OwnerKey) -> Option<PinRef>;

    /// Gibt einen Pin frei (idempotent)
    fn give(&mut self, pin: PinRef);

    /// Aktueller Besitzer eines Pins (nur Diagnose)
    fn owner_of(&self, _pin: PinRef) -> Option<OwnerKey> {
        None
    }
}

impl<T: PinRegistry> PinRegistry for &RefCell<T> {
    fn take(&mut self, key: &OwnerKey) -> Option<PinRef> {
        self.borrow_mut().take(key)
    }

    fn give(&mut self, pin: PinRef) {
        self.borrow_mut().give(pin);
    }

    fn owner_of(&self, pin: PinRef) -> Option<OwnerKey> {
        self.borrow().owner_of(pin)
    }
}

impl<T: PinRegistry> PinRegistry for &mut T {
    fn take(&mut self, key: &OwnerKey) -> Option<PinRef> {
        (**self).take(key)
    }

    fn give(&mut self, pin: PinRef) {
        (**self).give(pin);
    }

    fn owner_of(&self, pin: PinRef) -> Option<OwnerKey> {
        (**self).owner_of(pin)
    }
}

/// Trait für LED-Hardware-Zugriff (GPIO + optional Timer/PWM)
///
/// Pins werden über [`PinRef`] adressiert.
///
/// # Implementierungen
/// - **Production:** `EspLedDriver` (ESP32 GPIO + LEDC, led-firmware)
/// - **Generisch:** `OutputBank` (embedded-hal Pins, ohne PWM)
/// - **Testing:** `MockLedDriver` (in-memory Mock)
pub trait LedDriver {
    /// Konfiguriert den Pin als Push-Pull-Ausgang mit Startpegel
    fn configure_output(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError>;

    /// Setzt den Ausgangspegel
    fn set_level(&mut self, pin: PinRef, level: PinState) -> Result<(), LedError>;

    /// Liest den aktuell gesetzten Ausgangspegel
    fn level(&mut self, pin: PinRef) -> Result<PinState, LedError>;

    /// Invertiert den Ausgangspegel
    fn toggle(&mut self, pin: PinRef) -> Result<(), LedError> {
        let level = self.level(pin)?;
        self.set_level(pin, !level)
    }

    /// Maximaler Duty-Wert des Kanals
    ///
    /// `None` = Kanal hat keine PWM-Hardware (Standard).
    fn pwm_max_duty(&self, _channel: PwmChannel) -> Option<u16> {
        None
    }

    /// Schaltet den Pin auf PWM und programmiert den Duty-Wert
    fn pwm_enable(
        &mut self,
        _pin: PinRef,
        _channel: PwmChannel,
        _duty: u16,
    ) -> Result<(), LedError> {
        Err(LedError::PwmUnavailable)
    }

    /// Beendet PWM, der Pin ist danach wieder ein normaler GPIO-Ausgang
    fn pwm_disable(&mut self, _pin: PinRef, _channel: PwmChannel) -> Result<(), LedError> {
        Ok(())
    }

    /// Liest den programmierten Duty-Wert zurück
    ///
    /// `None` = Readback nicht unterstützt (Standard).
    fn pwm_duty(&self, _channel: PwmChannel) -> Option<u16> {
        None
    }
}
