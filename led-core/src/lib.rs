//! LED Core - Plattformunabhängige LED-Steuerung und Pin-Arbitrierung
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Sie definiert Traits (Pin-Registry, LED-Treiber), die statische
//! LED-Tabelle und die LED-Zustandsmaschine.

#![no_std]

// Muss vor den anderen Modulen stehen (Makros)
#[macro_use]
mod fmt;

pub mod binding;
pub mod board;
pub mod controller;
pub mod hal;
pub mod logic;
#[cfg(feature = "serde")]
pub mod protocol;
pub mod registry;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use binding::{HandleId, LedBinding, LedReply, LedRequest};
pub use board::{LedDescriptor, LedTable};
pub use controller::{LedController, LedHandle};
pub use hal::OutputBank;
pub use logic::{apply_polarity, duty_for_intensity, intensity_from_duty, saturate_intensity};
#[cfg(feature = "serde")]
pub use protocol::{LedOp, LedRequestMessage, LineBuffer, parse_request, render_reply};
pub use registry::{MuxAssignment, MuxRegistry};
pub use traits::{LedDriver, LedError, PinRegistry};
pub use types::{
    INTENSITY_FULL, INTENSITY_OFF, LedId, MuxRecord, OwnerKey, PinOrigin, PinRef, PinState,
    Polarity, PwmChannel,
};
