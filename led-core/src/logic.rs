//! Pure Business Logic Functions
//!
//! Umrechnung Intensität ↔ Duty-Cycle (ohne Hardware-Dependencies, testbar!)

use crate::types::{INTENSITY_FULL, INTENSITY_OFF, Polarity};

/// Prüft, ob eine Intensität PWM-Emulation erfordert
///
/// Nur echte Zwischenwerte (0 < value < 255). 0 und 255 sind reine
/// Aus/An-Zustände.
pub const fn needs_pwm(value: u8) -> bool {
    value > INTENSITY_OFF && value < INTENSITY_FULL
}

/// Rechnet eine Intensität (0..=255) in einen Duty-Wert um
///
/// duty = value / 255 der PWM-Periode
///
/// # Beispiele
///
/// ```
/// # use led_core::duty_for_intensity;
/// assert_eq!(duty_for_intensity(0, 10_000), 0);
/// assert_eq!(duty_for_intensity(255, 10_000), 10_000);
/// assert_eq!(duty_for_intensity(51, 100), 20);
/// ```
pub fn duty_for_intensity(value: u8, max_duty: u16) -> u16 {
    let duty = u32::from(value) * u32::from(max_duty) / u32::from(INTENSITY_FULL);
    duty as u16
}

/// Rechnet einen zurückgelesenen Duty-Wert in eine Intensität um (gerundet)
pub fn intensity_from_duty(duty: u16, max_duty: u16) -> u8 {
    if max_duty == 0 {
        return INTENSITY_OFF;
    }
    let duty = u32::from(duty.min(max_duty));
    let max = u32::from(max_duty);
    ((duty * u32::from(INTENSITY_FULL) + max / 2) / max) as u8
}

/// Rechnet Einschaltdauer ↔ Duty-Wert am Pin um
///
/// Bei active-low LEDs leuchtet die LED während der Low-Phase, der Duty-Wert
/// am Pin ist also das Komplement. Die Abbildung ist ihre eigene Umkehrung.
pub fn apply_polarity(duty: u16, max_duty: u16, polarity: Polarity) -> u16 {
    match polarity {
        Polarity::ActiveHigh => duty.min(max_duty),
        Polarity::ActiveLow => max_duty.saturating_sub(duty),
    }
}

/// Begrenzt einen rohen Intensitätswert auf 0..=255
///
/// Werte > 255 gelten als "an", negative Werte als "aus".
pub fn saturate_intensity(raw: i32) -> u8 {
    raw.clamp(i32::from(INTENSITY_OFF), i32::from(INTENSITY_FULL)) as u8
}
