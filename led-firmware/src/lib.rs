// Library-Root: Board-Konfiguration, Treiber und Tasks der LED-Firmware
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;

// Re-exports von led-core
pub use led_core::{
    HandleId, LedBinding, LedController, LedError, LedReply, LedRequest, LedRequestMessage,
    LedTable, MuxRegistry, PinRegistry,
};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};

use crate::config::{HANDLE_SLOTS, MUX_CAPACITY, REPLY_QUEUE_DEPTH, REQUEST_QUEUE_DEPTH};
use crate::hal::{EspLedDriver, SharedRegistry};

// ============================================================================
// Board-Typen
// ============================================================================

/// Pin-Registry des Boards (Kapazität aus config.rs)
pub type BoardRegistry = MuxRegistry<'static, MUX_CAPACITY>;

/// Binding des Boards: gemeinsame Registry + ESP32-C6 Treiber
pub type BoardBinding = LedBinding<'static, SharedRegistry, EspLedDriver, HANDLE_SLOTS>;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Statt:  Sender<'static, NoopRawMutex, LedEnvelope, 4>
// Nutze:  LedRequestSender

/// Antwort-Channel eines Clients (LED Task → Client)
/// Jeder Client besitzt seinen eigenen, damit Antworten nicht vertauscht werden
pub type LedReplyChannel = Channel<NoopRawMutex, LedReply, REPLY_QUEUE_DEPTH>;

/// Sender für Antworten (wird in jeder Anfrage mitgeschickt)
pub type LedReplySender = Sender<'static, NoopRawMutex, LedReply, REPLY_QUEUE_DEPTH>;

/// Receiver für Antworten (Client wartet darauf)
pub type LedReplyReceiver = Receiver<'static, NoopRawMutex, LedReply, REPLY_QUEUE_DEPTH>;

/// Anfrage + Rückkanal
#[derive(Clone, Copy)]
pub struct LedEnvelope {
    pub request: LedRequest,
    pub reply_to: LedReplySender,
}

/// Channel für LED-Anfragen (Clients → LED Task)
pub type LedRequestChannel = Channel<NoopRawMutex, LedEnvelope, REQUEST_QUEUE_DEPTH>;

/// Sender für LED-Anfragen (Console, Heartbeat)
pub type LedRequestSender = Sender<'static, NoopRawMutex, LedEnvelope, REQUEST_QUEUE_DEPTH>;

/// Receiver für LED-Anfragen (nur der LED Task)
pub type LedRequestReceiver = Receiver<'static, NoopRawMutex, LedEnvelope, REQUEST_QUEUE_DEPTH>;

/// Schickt eine Anfrage an den LED Task und wartet auf die Antwort
pub async fn request(
    requests: LedRequestSender,
    replies: LedReplyReceiver,
    reply_to: LedReplySender,
    request: LedRequest,
) -> LedReply {
    requests.send(LedEnvelope { request, reply_to }).await;
    replies.receive().await
}

// ============================================================================
// Testing
// ============================================================================
//
// Dieses Crate kompiliert nur für riscv32imac-unknown-none-elf. Die gesamte
// LED-Logik (Registry, Controller, Binding, JSON-Protokoll) liegt deshalb in
// led-core und wird in led-tests auf dem Host mit einem Mock-Treiber getestet.
// Hier bleibt nur Hardware-Glue: EspLedDriver, SharedRegistry und die Tasks.
