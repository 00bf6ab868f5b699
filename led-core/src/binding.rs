//! LED Binding - externe Aufrufe → Controller-Operationen
//!
//! Verwaltet lebende [`LedHandle`]s in Slots und adressiert sie über
//! [`HandleId`]. Aufrufe auf freie/ungültige Slots sind No-ops
//! (Getter liefern 0).
//!
//! Ein [`HandleId`] trägt neben der Slot-Nummer die Generation des Slots.
//! `destroy` erhöht die Generation, ein altes Handle trifft deshalb nie
//! die LED, die den Slot danach belegt.

use crate::controller::{LedController, LedHandle};
use crate::logic::saturate_intensity;
use crate::traits::{LedDriver, LedError, PinRegistry};
use crate::types::INTENSITY_OFF;

/// Handle-Nummer nach außen
///
/// Low-Byte = Slot, High-Byte = Generation des Slots. Die ersten Handles
/// eines frischen Bindings sind deshalb `0, 1, 2, ...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HandleId(pub u16);

impl HandleId {
    pub const fn new(slot: u8, generation: u8) -> Self {
        Self(u16::from_le_bytes([slot, generation]))
    }

    pub const fn slot(self) -> u8 {
        self.0.to_le_bytes()[0]
    }

    pub const fn generation(self) -> u8 {
        self.0.to_le_bytes()[1]
    }
}

/// Anfrage an das Binding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedRequest {
    /// Konstruiert LED `id` (1-basiert)
    Construct { id: i32 },
    On(HandleId),
    Off(HandleId),
    Toggle(HandleId),
    /// Intensität lesen
    Intensity(HandleId),
    /// Intensität setzen (Wert wird auf 0..=255 begrenzt)
    SetIntensity(HandleId, i32),
    Destroy(HandleId),
}

/// Antwort des Bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum LedReply {
    Handle { handle: u16 },
    Done,
    Intensity { value: u8 },
    Error { message: &'static str },
}

impl From<LedError> for LedReply {
    fn from(error: LedError) -> Self {
        LedReply::Error {
            message: error.as_str(),
        }
    }
}

/// Binding mit `H` Handle-Slots
pub struct LedBinding<'t, R, D, const H: usize> {
    controller: LedController<'t, R, D>,
    slots: [Option<LedHandle>; H],
    /// Generation pro Slot, wird bei jedem `destroy` erhöht
    generations: [u8; H],
}

impl<'t, R: PinRegistry, D: LedDriver, const H: usize> LedBinding<'t, R, D, H> {
    pub fn new(controller: LedController<'t, R, D>) -> Self {
        Self {
            controller,
            slots: core::array::from_fn(|_| None),
            generations: [0; H],
        }
    }

    pub fn controller(&self) -> &LedController<'t, R, D> {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut LedController<'t, R, D> {
        &mut self.controller
    }

    /// Lebendes Handle hinter `handle` (None für freie oder veraltete Handles)
    pub fn handle(&self, handle: HandleId) -> Option<&LedHandle> {
        let slot = self.live_slot(handle)?;
        self.slots[slot].as_ref()
    }

    /// Anzahl belegter Slots
    pub fn live_handles(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Konstruiert eine LED und legt das Handle in einen freien Slot
    ///
    /// # Fehlerbehandlung
    /// - `LedError::NoFreeHandle` wenn alle Slots belegt sind (kein Pin wird geholt)
    /// - `LedError::InvalidLedId` für ungültige Nummern
    pub fn construct(&mut self, raw_id: i32) -> Result<HandleId, LedError> {
        let slot = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(LedError::NoFreeHandle)?;
        let slot_id = u8::try_from(slot).map_err(|_| LedError::NoFreeHandle)?;
        let handle = HandleId::new(slot_id, self.generations[slot]);

        let led = self.controller.construct(raw_id)?;
        info!("LED({}) constructed (handle {})", led.id().get(), handle.0);
        self.slots[slot] = Some(led);
        Ok(handle)
    }

    pub fn on(&mut self, handle: HandleId) -> Result<(), LedError> {
        self.with_led(handle, Ok(()), |controller, led| controller.on(led))
    }

    pub fn off(&mut self, handle: HandleId) -> Result<(), LedError> {
        self.with_led(handle, Ok(()), |controller, led| controller.off(led))
    }

    pub fn toggle(&mut self, handle: HandleId) -> Result<(), LedError> {
        self.with_led(handle, Ok(()), |controller, led| controller.toggle(led))
    }

    pub fn intensity(&mut self, handle: HandleId) -> u8 {
        self.with_led(handle, INTENSITY_OFF, |controller, led| {
            controller.intensity(led)
        })
    }

    /// Setzt die Intensität, `value` wird auf 0..=255 begrenzt
    pub fn set_intensity(&mut self, handle: HandleId, value: i32) -> Result<(), LedError> {
        let value = saturate_intensity(value);
        self.with_led(handle, Ok(()), |controller, led| {
            controller.set_intensity(led, value)
        })
    }

    /// Gibt das Handle frei (idempotent)
    ///
    /// Der Slot bekommt eine neue Generation, `handle` bleibt danach ungültig.
    pub fn destroy(&mut self, handle: HandleId) {
        let Some(slot) = self.live_slot(handle) else {
            debug!("Handle {} not in use - ignored", handle.0);
            return;
        };
        if let Some(led) = self.slots[slot].take() {
            self.generations[slot] = self.generations[slot].wrapping_add(1);
            self.controller.destroy(led);
        }
    }

    /// Führt eine Anfrage aus
    pub fn dispatch(&mut self, request: LedRequest) -> LedReply {
        let result = match request {
            LedRequest::Construct { id } => self
                .construct(id)
                .map(|handle| LedReply::Handle { handle: handle.0 }),
            LedRequest::On(handle) => self.on(handle).map(|()| LedReply::Done),
            LedRequest::Off(handle) => self.off(handle).map(|()| LedReply::Done),
            LedRequest::Toggle(handle) => self.toggle(handle).map(|()| LedReply::Done),
            LedRequest::Intensity(handle) => Ok(LedReply::Intensity {
                value: self.intensity(handle),
            }),
            LedRequest::SetIntensity(handle, value) => self
                .set_intensity(handle, value)
                .map(|()| LedReply::Done),
            LedRequest::Destroy(handle) => {
                self.destroy(handle);
                Ok(LedReply::Done)
            }
        };

        result.unwrap_or_else(LedReply::from)
    }

    /// Slot-Index, solange `handle` lebt (Slot belegt, Generation passt)
    fn live_slot(&self, handle: HandleId) -> Option<usize> {
        let slot = usize::from(handle.slot());
        let generation = *self.generations.get(slot)?;
        (generation == handle.generation() && self.slots[slot].is_some()).then_some(slot)
    }

    fn with_led<T>(
        &mut self,
        handle: HandleId,
        default: T,
        f: impl FnOnce(&mut LedController<'t, R, D>, &mut LedHandle) -> T,
    ) -> T {
        let led = match self.live_slot(handle) {
            Some(slot) => self.slots[slot].as_mut(),
            None => None,
        };
        match led {
            Some(led) => f(&mut self.controller, led),
            None => {
                debug!("Handle {} not in use - ignored", handle.0);
                default
            }
        }
    }
}
