// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

use led_core::{LedDescriptor, MuxAssignment, OwnerKey, PinRef, PwmChannel};

// ============================================================================
// LED Konfiguration
// ============================================================================

/// Anzahl der logischen LEDs auf dem Board
pub const LED_COUNT: usize = 4;

/// Statische LED-Tabelle (LED-Nummer → GPIO, Polarität, PWM-Kanal)
///
/// Alle LEDs hängen gegen 3V3 (active-low). LED 4 ist ein IR-Kanal
/// mit Treiberstufe und deshalb invertiert (active-high).
pub static BOARD_LEDS: [LedDescriptor; LED_COUNT] = [
    LedDescriptor::new(1, PinRef(4))
        .active_low()
        .with_pwm(PwmChannel(0)),
    LedDescriptor::new(2, PinRef(5))
        .active_low()
        .with_pwm(PwmChannel(1)),
    LedDescriptor::new(3, PinRef(6)).active_low(),
    LedDescriptor::new(4, PinRef(7)).active_low().inverted(),
];

/// Anzahl LEDs mit LEDC-Kanal (LED 1 + 2)
pub const PWM_LED_COUNT: usize = 2;

/// Anzahl LEDs an einfachen GPIO-Ausgängen (LED 3 + 4)
pub const GPIO_LED_COUNT: usize = LED_COUNT - PWM_LED_COUNT;

/// LEDC Timer-Frequenz in Hz
/// 100 Hz = 10 ms PWM-Periode
pub const LED_PWM_FREQUENCY_HZ: u32 = 100;

/// Duty-Auflösung der LEDC-Kanäle (esp-hal rechnet in Prozent)
pub const LED_PWM_MAX_DUTY: u16 = 100;

// ============================================================================
// Pin-Registry (Mux-Tabelle)
// ============================================================================

/// Console-UART (UART1)
pub const CONSOLE_TX_PIN: PinRef = PinRef(2);
pub const CONSOLE_RX_PIN: PinRef = PinRef(3);
pub const CONSOLE_TX_KEY: OwnerKey = OwnerKey::new("uart", 1, "tx");
pub const CONSOLE_RX_KEY: OwnerKey = OwnerKey::new("uart", 1, "rx");

/// Mux-Zuordnungen des Boards
///
/// LED 3 ist nicht eingetragen und läuft immer über den Tabellen-Fallback.
pub static BOARD_MUX: [MuxAssignment; 5] = [
    MuxAssignment::led(1, PinRef(4)),
    MuxAssignment::led(2, PinRef(5)),
    MuxAssignment::led(4, PinRef(7)),
    MuxAssignment::new("uart", 1, "tx", CONSOLE_TX_PIN),
    MuxAssignment::new("uart", 1, "rx", CONSOLE_RX_PIN),
];

/// Maximale Anzahl gleichzeitiger Pin-Claims
pub const MUX_CAPACITY: usize = 8;

// ============================================================================
// Binding / Tasks
// ============================================================================

/// Anzahl Handle-Slots im Binding
pub const HANDLE_SLOTS: usize = 8;

/// Kapazität des Anfrage-Channels (Clients → LED Task)
pub const REQUEST_QUEUE_DEPTH: usize = 4;

/// Kapazität eines Antwort-Channels (ein Client wartet immer nur auf eine Antwort)
pub const REPLY_QUEUE_DEPTH: usize = 1;

/// LED für den Heartbeat
pub const HEARTBEAT_LED: i32 = 1;

/// Heartbeat-Intervall in Millisekunden
pub const HEARTBEAT_INTERVAL_MS: u64 = 500;

/// Anzahl Toggles pro Zyklus, danach eine Dimm-Rampe
pub const HEARTBEAT_BLINKS: usize = 6;

/// Schrittweite der Dimm-Rampe
pub const HEARTBEAT_RAMP_STEP: usize = 32;

// ============================================================================
// Console Konfiguration
// ============================================================================

/// UART Baudrate
pub const CONSOLE_BAUDRATE: u32 = 115_200;

/// Zeilen-Buffer für eingehende JSON-Anfragen
/// {"op":"intensity","handle":0,"value":128} passt mit Reserve
pub const CONSOLE_LINE_BUFFER_SIZE: usize = 128;

/// UART Lese-Chunk in Bytes
pub const CONSOLE_READ_CHUNK_SIZE: usize = 32;

/// JSON Serialisierungs-Buffer für Antworten
/// Für {"type":"error","message":"..."}
pub const JSON_REPLY_BUFFER_SIZE: usize = 96;
