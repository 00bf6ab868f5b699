// Gemeinsame Pin-Registry
//
// Die Mux-Registry wird von mehreren Tasks benutzt (Console beim Start,
// LED Task bei jedem Construct/Destroy). Zugriffe laufen über eine
// Critical Section, damit take/give atomar bleiben.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use led_core::{OwnerKey, PinRef, PinRegistry};

use crate::BoardRegistry;

/// Globale Registry-Instanz des Boards
pub type RegistryMutex = Mutex<CriticalSectionRawMutex, RefCell<BoardRegistry>>;

/// Kopierbarer Zugriff auf die globale Registry
#[derive(Clone, Copy)]
pub struct SharedRegistry {
    inner: &'static RegistryMutex,
}

impl SharedRegistry {
    pub const fn new(inner: &'static RegistryMutex) -> Self {
        Self { inner }
    }

    /// Anzahl belegter Pins (für Logs)
    pub fn claim_count(&self) -> usize {
        self.inner.lock(|registry| registry.borrow().claim_count())
    }
}

impl PinRegistry for SharedRegistry {
    fn take(&mut self, key: &OwnerKey) -> Option<PinRef> {
        self.inner.lock(|registry| registry.borrow_mut().take(key))
    }

    fn give(&mut self, pin: PinRef) {
        self.inner.lock(|registry| registry.borrow_mut().give(pin));
    }

    fn owner_of(&self, pin: PinRef) -> Option<OwnerKey> {
        self.inner.lock(|registry| registry.borrow().owner_of(pin))
    }
}
