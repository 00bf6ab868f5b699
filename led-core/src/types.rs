//! Core Types für LED-Steuerung und Pin-Arbitrierung
//!
//! Datenstrukturen ohne Hardware-Dependencies

use core::fmt;

pub use embedded_hal::digital::PinState;

use crate::traits::LedError;

/// Intensität "aus"
pub const INTENSITY_OFF: u8 = 0;

/// Intensität "voll an"
pub const INTENSITY_FULL: u8 = 255;

/// Owner-Klasse, unter der LEDs in der Pin-Registry geführt werden
pub const LED_OWNER_CLASS: &str = "led";

/// Hint "beliebig" bzw. Platzhalter
pub const ANY_HINT: &str = "-";

/// Physische Pin-Referenz (GPIO-Nummer)
///
/// Opaker Handle auf eine GPIO-Leitung. Kann aus der Pin-Registry oder
/// aus der statischen LED-Tabelle stammen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinRef(pub u8);

impl PinRef {
    pub const fn gpio(number: u8) -> Self {
        Self(number)
    }

    pub const fn number(self) -> u8 {
        self.0
    }
}

impl fmt::Display for PinRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Logische LED-Nummer (1-basiert, 1 ≤ id ≤ N)
///
/// Existiert nur validiert: erzeugt über [`LedId::new`] bzw. die LED-Tabelle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LedId(u8);

impl LedId {
    /// Validiert eine rohe LED-Nummer gegen die Anzahl `count` der LEDs
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::InvalidLedId` zurück wenn `raw` nicht in `1..=count` liegt
    pub fn new(raw: i32, count: usize) -> Result<Self, LedError> {
        u8::try_from(raw)
            .ok()
            .filter(|id| *id >= 1 && usize::from(*id) <= count)
            .map(Self)
            .ok_or(LedError::InvalidLedId(raw))
    }

    pub const fn get(self) -> u8 {
        self.0
    }

    /// 0-basierter Index in die LED-Tabelle
    pub const fn index(self) -> usize {
        (self.0 - 1) as usize
    }
}

impl fmt::Display for LedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LED({})", self.0)
    }
}

/// Polarität einer LED-Leitung
///
/// `ActiveLow`: Pin auf Low schaltet die LED ein (typisch bei LEDs gegen VCC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    #[default]
    ActiveHigh,
    ActiveLow,
}

impl Polarity {
    /// Pegel für den gewünschten Zustand
    pub const fn level(self, on: bool) -> PinState {
        match (self, on) {
            (Polarity::ActiveHigh, true) | (Polarity::ActiveLow, false) => PinState::High,
            (Polarity::ActiveHigh, false) | (Polarity::ActiveLow, true) => PinState::Low,
        }
    }

    /// Pegel einer ausgeschalteten LED
    pub const fn inactive(self) -> PinState {
        self.level(false)
    }

    pub fn is_on(self, level: PinState) -> bool {
        level == self.level(true)
    }

    /// Vertauscht die Polarität (z.B. invertierter IR-Kanal)
    pub const fn inverted(self) -> Self {
        match self {
            Polarity::ActiveHigh => Polarity::ActiveLow,
            Polarity::ActiveLow => Polarity::ActiveHigh,
        }
    }
}

/// Timer/PWM-Kanal einer LED
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmChannel(pub u8);

/// Schlüssel eines Eintrags in der Pin-Registry
///
/// (Owner-Klasse, Index, Hint) - z.B. `("led", 1, "-")`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnerKey {
    pub class: &'static str,
    pub index: u8,
    pub hint: &'static str,
}

impl OwnerKey {
    /// Platzhalter für synthetisierte Fallback-Einträge
    pub const PLACEHOLDER: Self = Self::new(ANY_HINT, 0, ANY_HINT);

    pub const fn new(class: &'static str, index: u8, hint: &'static str) -> Self {
        Self { class, index, hint }
    }

    /// Registry-Schlüssel einer LED: `("led", id, "-")`
    pub const fn led(id: LedId) -> Self {
        Self::new(LED_OWNER_CLASS, id.get(), ANY_HINT)
    }

    pub fn is_placeholder(&self) -> bool {
        *self == Self::PLACEHOLDER
    }
}

impl fmt::Display for OwnerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]/{}", self.class, self.index, self.hint)
    }
}

/// Herkunft eines gebundenen Pins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinOrigin {
    /// Exklusiv aus der Pin-Registry geholt
    Registry,
    /// Fallback auf die statische LED-Tabelle (kein Registry-Eintrag)
    StaticTable,
}

/// Ownership-Record: Schlüssel → Pin, inkl. Herkunft
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxRecord {
    pub key: OwnerKey,
    pub pin: PinRef,
    pub origin: PinOrigin,
}

impl MuxRecord {
    /// Record für einen aus der Registry geholten Pin
    pub const fn claimed(key: OwnerKey, pin: PinRef) -> Self {
        Self {
            key,
            pin,
            origin: PinOrigin::Registry,
        }
    }

    /// Synthetisierter Record für den Fallback-Pin (Platzhalter-Schlüssel)
    pub const fn fallback(pin: PinRef) -> Self {
        Self {
            key: OwnerKey::PLACEHOLDER,
            pin,
            origin: PinOrigin::StaticTable,
        }
    }

    pub fn is_dynamic(&self) -> bool {
        self.origin == PinOrigin::Registry
    }
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for OwnerKey {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}[{}]/{}", self.class, self.index, self.hint)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for MuxRecord {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "MuxRecord {{ key: {}, pin: GPIO{}, origin: {} }}",
            self.key,
            self.pin.0,
            self.origin
        )
    }
}
