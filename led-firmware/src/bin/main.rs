// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

use core::cell::RefCell;

// Embassy Async Runtime
use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::timer::timg::TimerGroup;
use esp_hal::uart::{Config as UartConfig, Uart};

// Backtrace bei Panic und println!() Support
use {esp_backtrace as _, esp_println as _};

use defmt::{error, info};
use static_cell::StaticCell;

// Projekt-Module und Konfiguration
use led_firmware::config::{
    BOARD_MUX, CONSOLE_BAUDRATE, CONSOLE_RX_KEY, CONSOLE_RX_PIN, CONSOLE_TX_KEY, CONSOLE_TX_PIN,
};
use led_firmware::hal::{EspLedDriver, RegistryMutex, SharedRegistry};
use led_firmware::tasks::{console_task, heartbeat_task, led_control_task};
use led_firmware::{LedReplyChannel, LedRequestChannel, MuxRegistry, PinRegistry};

// ESP-IDF App Descriptor - erforderlich für den Bootloader!
// Ohne diesen schlägt das Flashen mit "ESP-IDF App Descriptor missing" fehl
esp_bootloader_esp_idf::esp_app_desc!();

/// Pin-Registry des Boards (von allen Tasks geteilt)
static MUX_REGISTRY: RegistryMutex = Mutex::new(RefCell::new(MuxRegistry::new(&BOARD_MUX)));

/// Main Entry Point
///
/// Initialisiert Hardware, startet Embassy Runtime und spawnt Tasks.
/// Danach schläft main() - alle Arbeit läuft in Tasks.
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // ESP32-C6 Konfiguration: CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Embassy Runtime initialisieren (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    let mut registry = SharedRegistry::new(&MUX_REGISTRY);

    // LED-Hardware: GPIO6/7 als Ausgang, GPIO4/5 an LEDC
    let driver = EspLedDriver::new(
        peripherals.GPIO4,
        peripherals.GPIO5,
        peripherals.GPIO6,
        peripherals.GPIO7,
        peripherals.LEDC,
    )
    .expect("Failed to initialize LED driver");

    // Anfrage-Channel (alle Clients → LED Task)
    static REQUEST_CHANNEL: StaticCell<LedRequestChannel> = StaticCell::new();
    let request_channel = &*REQUEST_CHANNEL.init(LedRequestChannel::new());

    // Antwort-Channels (je Client einer)
    static HEARTBEAT_REPLIES: StaticCell<LedReplyChannel> = StaticCell::new();
    let heartbeat_replies = &*HEARTBEAT_REPLIES.init(LedReplyChannel::new());
    static CONSOLE_REPLIES: StaticCell<LedReplyChannel> = StaticCell::new();
    let console_replies = &*CONSOLE_REPLIES.init(LedReplyChannel::new());

    // Spawn LED Task (einziger Besitzer des Bindings)
    spawner
        .spawn(led_control_task(
            registry,
            driver,
            request_channel.receiver(),
        ))
        .unwrap();

    // Spawn Heartbeat Task
    spawner
        .spawn(heartbeat_task(
            request_channel.sender(),
            heartbeat_replies.receiver(),
            heartbeat_replies.sender(),
        ))
        .unwrap();

    // Console-Pins über die Registry anfordern, erst dann UART1 aufsetzen
    let console_pins = (
        registry.take(&CONSOLE_TX_KEY),
        registry.take(&CONSOLE_RX_KEY),
    );
    match console_pins {
        (Some(CONSOLE_TX_PIN), Some(CONSOLE_RX_PIN)) => {
            let uart = Uart::new(
                peripherals.UART1,
                UartConfig::default().with_baudrate(CONSOLE_BAUDRATE),
            )
            .expect("Failed to initialize UART1")
            .with_tx(peripherals.GPIO2)
            .with_rx(peripherals.GPIO3)
            .into_async();

            spawner
                .spawn(console_task(
                    uart,
                    request_channel.sender(),
                    console_replies.receiver(),
                    console_replies.sender(),
                ))
                .unwrap();
        }
        (tx, rx) => {
            // Teilweise erhaltene Claims zurückgeben
            for pin in [tx, rx].into_iter().flatten() {
                registry.give(pin);
            }
            error!("Console pins unavailable, console disabled");
        }
    }

    info!("Pin registry: {} claims", registry.claim_count());

    // Main-Loop: schläft (alle Arbeit läuft in Tasks)
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
