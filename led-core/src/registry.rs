//! Pin-Registry (Mux-Manager)
//!
//! In-memory Implementierung von [`PinRegistry`] über eine statische
//! Zuordnungstabelle. Jeder Pin hat höchstens einen Besitzer, jeder
//! Schlüssel hält höchstens einen Pin.

use heapless::Vec;

use crate::traits::PinRegistry;
use crate::types::{ANY_HINT, LED_OWNER_CLASS, OwnerKey, PinRef};

/// Eintrag der Mux-Tabelle: welche Peripherie darf welchen Pin nutzen
///
/// Mehrere Einträge dürfen denselben Pin nennen (konkurrierende Peripherie),
/// und ein Schlüssel darf mehrere Kandidaten-Pins haben (per Hint unterschieden).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MuxAssignment {
    pub class: &'static str,
    pub index: u8,
    pub hint: &'static str,
    pub pin: PinRef,
}

impl MuxAssignment {
    pub const fn new(class: &'static str, index: u8, hint: &'static str, pin: PinRef) -> Self {
        Self {
            class,
            index,
            hint,
            pin,
        }
    }

    /// Zuordnung LED `index` → `pin`
    pub const fn led(index: u8, pin: PinRef) -> Self {
        Self::new(LED_OWNER_CLASS, index, ANY_HINT, pin)
    }

    /// Hint "-" in der Anfrage akzeptiert jeden Eintrag
    fn accepts(&self, key: &OwnerKey) -> bool {
        self.class == key.class
            && self.index == key.index
            && (key.hint == ANY_HINT || self.hint == key.hint)
    }
}

#[derive(Debug, Clone, Copy)]
struct Claim {
    pin: PinRef,
    owner: OwnerKey,
}

/// Pin-Registry mit Platz für `N` gleichzeitige Belegungen
pub struct MuxRegistry<'a, const N: usize> {
    assignments: &'a [MuxAssignment],
    claims: Vec<Claim, N>,
}

impl<'a, const N: usize> MuxRegistry<'a, N> {
    pub const fn new(assignments: &'a [MuxAssignment]) -> Self {
        Self {
            assignments,
            claims: Vec::new(),
        }
    }

    pub fn is_claimed(&self, pin: PinRef) -> bool {
        self.claims.iter().any(|claim| claim.pin == pin)
    }

    /// Pin, den `key` aktuell hält
    pub fn claimed_by(&self, key: &OwnerKey) -> Option<PinRef> {
        self.claims
            .iter()
            .find(|claim| claim.owner == *key)
            .map(|claim| claim.pin)
    }

    /// Anzahl aktiver Belegungen
    pub fn claim_count(&self) -> usize {
        self.claims.len()
    }
}

impl<const N: usize> PinRegistry for MuxRegistry<'_, N> {
    fn take(&mut self, key: &OwnerKey) -> Option<PinRef> {
        if key.is_placeholder() {
            return None;
        }

        if let Some(pin) = self.claimed_by(key) {
            debug!("Mux: {} already holds GPIO{}", key, pin.0);
            return None;
        }

        let assignments = self.assignments;
        let Some(pin) = assignments
            .iter()
            .filter(|assignment| assignment.accepts(key))
            .map(|assignment| assignment.pin)
            .find(|pin| !self.is_claimed(*pin))
        else {
            debug!("Mux: no free pin for {}", key);
            return None;
        };

        if self.claims.push(Claim { pin, owner: *key }).is_err() {
            warn!("Mux: registry full ({} claims)", N);
            return None;
        }

        debug!("Mux: GPIO{} -> {}", pin.0, key);
        Some(pin)
    }

    fn give(&mut self, pin: PinRef) {
        if let Some(position) = self.claims.iter().position(|claim| claim.pin == pin) {
            let claim = self.claims.swap_remove(position);
            debug!("Mux: GPIO{} released by {}", pin.0, claim.owner);
        }
    }

    fn owner_of(&self, pin: PinRef) -> Option<OwnerKey> {
        self.claims
            .iter()
            .find(|claim| claim.pin == pin)
            .map(|claim| claim.owner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static MUX: [MuxAssignment; 4] = [
        MuxAssignment::led(1, PinRef(4)),
        MuxAssignment::led(2, PinRef(5)),
        MuxAssignment::new("uart", 1, "tx", PinRef(5)),
        MuxAssignment::new("spi", 1, "sck", PinRef(6)),
    ];

    fn led_key(index: u8) -> OwnerKey {
        OwnerKey::new(LED_OWNER_CLASS, index, ANY_HINT)
    }

    #[test]
    fn test_take_assigned_pin() {
        let mut registry: MuxRegistry<'_, 4> = MuxRegistry::new(&MUX);
        assert_eq!(registry.take(&led_key(1)), Some(PinRef(4)));
        assert!(registry.is_claimed(PinRef(4)));
        assert_eq!(registry.owner_of(PinRef(4)), Some(led_key(1)));
    }

    #[test]
    fn test_take_unassigned_key() {
        let mut registry: MuxRegistry<'_, 4> = MuxRegistry::new(&MUX);
        assert_eq!(registry.take(&led_key(3)), None);
        assert_eq!(registry.claim_count(), 0);
    }

    #[test]
    fn test_same_key_holds_one_pin() {
        let mut registry: MuxRegistry<'_, 4> = MuxRegistry::new(&MUX);
        assert!(registry.take(&led_key(1)).is_some());
        assert_eq!(registry.take(&led_key(1)), None);
        assert_eq!(registry.claim_count(), 1);
    }

    #[test]
    fn test_pin_conflict_between_peripherals() {
        let mut registry: MuxRegistry<'_, 4> = MuxRegistry::new(&MUX);
        let uart_tx = OwnerKey::new("uart", 1, "tx");
        assert_eq!(registry.take(&uart_tx), Some(PinRef(5)));
        assert_eq!(registry.take(&led_key(2)), None);

        registry.give(PinRef(5));
        assert_eq!(registry.take(&led_key(2)), Some(PinRef(5)));
    }

    #[test]
    fn test_hint_must_match_unless_any() {
        let mut registry: MuxRegistry<'_, 4> = MuxRegistry::new(&MUX);
        assert_eq!(registry.take(&OwnerKey::new("spi", 1, "miso")), None);
        assert_eq!(
            registry.take(&OwnerKey::new("spi", 1, ANY_HINT)),
            Some(PinRef(6))
        );
    }

    #[test]
    fn test_give_is_idempotent() {
        let mut registry: MuxRegistry<'_, 4> = MuxRegistry::new(&MUX);
        registry.take(&led_key(1));
        registry.give(PinRef(4));
        registry.give(PinRef(4));
        registry.give(PinRef(30));
        assert_eq!(registry.claim_count(), 0);
    }

    #[test]
    fn test_placeholder_never_claims() {
        let mut registry: MuxRegistry<'_, 4> = MuxRegistry::new(&MUX);
        assert_eq!(registry.take(&OwnerKey::PLACEHOLDER), None);
    }

    #[test]
    fn test_capacity_limit() {
        let mut registry: MuxRegistry<'_, 1> = MuxRegistry::new(&MUX);
        assert!(registry.take(&led_key(1)).is_some());
        assert_eq!(registry.take(&led_key(2)), None);
        assert!(!registry.is_claimed(PinRef(5)));
    }
}
