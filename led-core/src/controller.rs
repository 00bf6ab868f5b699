//! LED Controller - Pin-Auflösung und LED-Zustandsmaschine
//!
//! Löst eine logische LED über die Pin-Registry auf (Fallback: statische
//! LED-Tabelle) und steuert Ein/Aus/Toggle/Intensität.
//!
//! Jeder [`LedHandle`] besitzt seinen Pin, seinen Ownership-Record und sein
//! PWM-Flag selbst. Es gibt keinen globalen Zustand pro LED-Nummer.

use core::fmt;

use crate::board::LedTable;
use crate::logic::{apply_polarity, duty_for_intensity, intensity_from_duty, needs_pwm};
use crate::traits::{LedDriver, LedError, PinRegistry};
use crate::types::{
    INTENSITY_OFF, LedId, MuxRecord, OwnerKey, PinOrigin, PinRef, Polarity, PwmChannel,
};

/// Handle auf eine konstruierte LED
///
/// Existiert nur mit gültiger LED-Nummer. Wird über
/// [`LedController::destroy`] freigegeben.
#[derive(Debug)]
pub struct LedHandle {
    id: LedId,
    record: MuxRecord,
    polarity: Polarity,
    pwm: Option<PwmChannel>,
    pwm_active: bool,
}

impl LedHandle {
    pub const fn id(&self) -> LedId {
        self.id
    }

    pub const fn pin(&self) -> PinRef {
        self.record.pin
    }

    pub const fn record(&self) -> &MuxRecord {
        &self.record
    }

    pub const fn origin(&self) -> PinOrigin {
        self.record.origin
    }

    pub const fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub const fn pwm_channel(&self) -> Option<PwmChannel> {
        self.pwm
    }

    /// PWM-Emulation aktiv?
    pub const fn is_pwm_active(&self) -> bool {
        self.pwm_active
    }
}

impl fmt::Display for LedHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for LedHandle {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "LED({}) {{ pin: GPIO{}, origin: {}, pwm: {} }}",
            self.id.get(),
            self.record.pin.0,
            self.record.origin,
            self.pwm_active
        )
    }
}

/// LED Controller
///
/// # Trait-basierte Abstraktion
/// - `R: PinRegistry` - gemeinsame Pin-Registry (oder `&RefCell` darauf)
/// - `D: LedDriver` - GPIO/PWM-Treiber (Hardware oder Mock)
pub struct LedController<'t, R, D> {
    table: LedTable<'t>,
    registry: R,
    driver: D,
}

impl<'t, R: PinRegistry, D: LedDriver> LedController<'t, R, D> {
    pub fn new(table: LedTable<'t>, registry: R, driver: D) -> Self {
        Self {
            table,
            registry,
            driver,
        }
    }

    pub fn table(&self) -> &LedTable<'t> {
        &self.table
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub fn into_parts(self) -> (R, D) {
        (self.registry, self.driver)
    }

    /// Board-Init: alle Pins der LED-Tabelle als Ausgang, alle LEDs aus
    pub fn init(&mut self) -> Result<(), LedError> {
        let table = self.table;
        for led in table.iter() {
            self.driver
                .configure_output(led.pin, led.polarity.inactive())?;
        }
        info!("{} LEDs initialized", table.count());
        Ok(())
    }

    /// Konstruiert eine LED
    ///
    /// 1. LED-Nummer gegen die Tabelle validieren
    /// 2. Pin exklusiv aus der Registry holen, als Ausgang konfigurieren (aus)
    /// 3. Registry liefert nichts → Fallback auf den Tabellen-Pin mit
    ///    Platzhalter-Record (niemals ein Fehler). Ist der Tabellen-Pin
    ///    belegt, bekommt das Handle keinen PWM-Kanal.
    ///
    /// # Fehlerbehandlung
    /// - `LedError::InvalidLedId` für Nummern außerhalb `1..=N`
    /// - Treiberfehler beim Konfigurieren (der Pin wird zurückgegeben)
    pub fn construct(&mut self, raw_id: i32) -> Result<LedHandle, LedError> {
        let (id, led) = self.table.resolve(raw_id)?;
        let key = OwnerKey::led(id);

        let (record, pwm) = match self.registry.take(&key) {
            Some(pin) => {
                if let Err(e) = self.driver.configure_output(pin, led.polarity.inactive()) {
                    self.registry.give(pin);
                    return Err(e);
                }
                debug!("LED({}) -> GPIO{} (registry)", id.get(), pin.0);
                (MuxRecord::claimed(key, pin), led.pwm)
            }
            None => {
                // Gehört der Pin schon jemandem, bleibt dessen PWM-Kanal unangetastet
                let pwm = match self.registry.owner_of(led.pin) {
                    Some(owner) => {
                        warn!(
                            "LED({}): fallback pin GPIO{} is owned by {}",
                            id.get(),
                            led.pin.0,
                            owner
                        );
                        None
                    }
                    None => led.pwm,
                };
                debug!("LED({}) -> GPIO{} (static table)", id.get(), led.pin.0);
                (MuxRecord::fallback(led.pin), pwm)
            }
        };

        Ok(LedHandle {
            id,
            record,
            polarity: led.polarity,
            pwm,
            pwm_active: false,
        })
    }

    /// Gibt den Ownership-Record frei
    ///
    /// Fallback-Records berühren die Registry nicht. Aktives PWM wird beendet.
    pub fn destroy(&mut self, mut led: LedHandle) {
        if led.pwm_active {
            if let Err(_e) = self.stop_pwm(&mut led) {
                warn!("LED({}): failed to stop PWM", led.id.get());
            }
        }

        match led.record.origin {
            PinOrigin::Registry => self.registry.give(led.record.pin),
            PinOrigin::StaticTable => {}
        }
        debug!("LED({}) released", led.id.get());
    }

    /// Setzt die LED ein/aus
    ///
    /// Beendet eine aktive PWM-Emulation (Flag wird immer gelöscht).
    /// Der Pegel wird auch dann geschrieben, wenn das Abschalten der PWM
    /// fehlschlägt. Zurück kommt der erste Fehler.
    pub fn set_state(&mut self, led: &mut LedHandle, on: bool) -> Result<(), LedError> {
        let stopped = if led.pwm_active {
            self.stop_pwm(led)
        } else {
            Ok(())
        };
        let written = self.driver.set_level(led.pin(), led.polarity.level(on));
        stopped.and(written)
    }

    pub fn on(&mut self, led: &mut LedHandle) -> Result<(), LedError> {
        self.set_state(led, true)
    }

    pub fn off(&mut self, led: &mut LedHandle) -> Result<(), LedError> {
        self.set_state(led, false)
    }

    /// Toggle
    ///
    /// Bei aktiver PWM hat die LED eine Zwischenhelligkeit → ausschalten.
    pub fn toggle(&mut self, led: &mut LedHandle) -> Result<(), LedError> {
        if led.pwm_active {
            return self.set_state(led, false);
        }
        self.driver.toggle(led.pin())
    }

    /// Ist die LED (laut Pin-Pegel) eingeschaltet?
    pub fn is_on(&mut self, led: &LedHandle) -> Result<bool, LedError> {
        let level = self.driver.level(led.pin())?;
        Ok(led.polarity.is_on(level))
    }

    /// Aktuelle Intensität (0..=255)
    ///
    /// 0, solange keine PWM aktiv ist oder der Treiber keinen Readback kann.
    pub fn intensity(&self, led: &LedHandle) -> u8 {
        let Some(channel) = led.pwm.filter(|_| led.pwm_active) else {
            return INTENSITY_OFF;
        };
        match (
            self.driver.pwm_duty(channel),
            self.driver.pwm_max_duty(channel),
        ) {
            (Some(duty), Some(max_duty)) => {
                let on_time = apply_polarity(duty, max_duty, led.polarity);
                intensity_from_duty(on_time, max_duty)
            }
            _ => INTENSITY_OFF,
        }
    }

    /// Setzt die Intensität (0..=255)
    ///
    /// Zwischenwerte auf einer LED mit PWM-Hardware → PWM-Emulation
    /// (Einschaltdauer = value / 255 der Periode).
    /// Sonst (0, 255, kein PWM) → `set_state(value > 0)`.
    pub fn set_intensity(&mut self, led: &mut LedHandle, value: u8) -> Result<(), LedError> {
        if needs_pwm(value) {
            if let Some(channel) = led.pwm {
                if let Some(max_duty) = self.driver.pwm_max_duty(channel) {
                    let on_time = duty_for_intensity(value, max_duty);
                    let duty = apply_polarity(on_time, max_duty, led.polarity);
                    self.driver.pwm_enable(led.pin(), channel, duty)?;
                    led.pwm_active = true;
                    debug!(
                        "LED({}): PWM channel {} duty {}/{}",
                        led.id.get(),
                        channel.0,
                        duty,
                        max_duty
                    );
                    return Ok(());
                }
            }
        }

        self.set_state(led, value > INTENSITY_OFF)
    }

    fn stop_pwm(&mut self, led: &mut LedHandle) -> Result<(), LedError> {
        led.pwm_active = false;
        match led.pwm {
            Some(channel) => self.driver.pwm_disable(led.pin(), channel),
            None => Ok(()),
        }
    }
}
