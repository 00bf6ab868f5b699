// Hardware Abstraction Layer (HAL) Module
//
// Board-spezifische Implementierungen der led-core Traits:
// - EspLedDriver: LedDriver über esp-hal GPIO + LEDC
// - SharedRegistry: PinRegistry über eine Critical-Section-geschützte MuxRegistry

pub mod led_driver;
pub mod registry;

pub use led_driver::EspLedDriver;
pub use registry::{RegistryMutex, SharedRegistry};
