// LED Control Task - Besitzt das Binding und arbeitet Anfragen ab
use defmt::{debug, error, info, warn};
use led_core::{LedBinding, LedController, LedDriver, LedReply, LedTable, PinRegistry};

use crate::config::BOARD_LEDS;
use crate::hal::{EspLedDriver, SharedRegistry};
use crate::{BoardBinding, LedEnvelope, LedRequestReceiver};

/// LED Control Logic - Testbare Schleife ohne Hardware-Abhängigkeit
///
/// Einziger Besitzer des Bindings: alle anderen Tasks schicken
/// [`LedEnvelope`]s und bekommen die Antwort über ihren eigenen Channel.
///
/// # Trait-basierte Abstraktion
/// - `R: PinRegistry` - gemeinsame Registry (oder Mock)
/// - `D: LedDriver` - ESP32-C6 Treiber (oder Mock)
pub async fn led_control_logic<R: PinRegistry, D: LedDriver, const H: usize>(
    binding: &mut LedBinding<'static, R, D, H>,
    requests: LedRequestReceiver,
) -> ! {
    loop {
        let LedEnvelope { request, reply_to } = requests.receive().await;
        let reply = binding.dispatch(request);

        match reply {
            LedReply::Error { message } => warn!("LED: {} rejected: {}", request, message),
            _ => debug!("LED: {} -> {}", request, reply),
        }

        reply_to.send(reply).await;
    }
}

/// LED Control Task - Embassy Task für parallele Ausführung
///
/// Initialisiert das Board (alle LEDs aus) und ruft dann die testbare
/// `led_control_logic()` Funktion auf.
///
/// # Parameter
/// - `registry`: gemeinsame Pin-Registry
/// - `driver`: fertig konfigurierter GPIO/LEDC-Treiber
/// - `requests`: Channel Receiver für Anfragen aller Clients
#[embassy_executor::task]
pub async fn led_control_task(
    registry: SharedRegistry,
    driver: EspLedDriver,
    requests: LedRequestReceiver,
) {
    let mut controller = LedController::new(LedTable::new(&BOARD_LEDS), registry, driver);

    if let Err(e) = controller.init() {
        error!("LED: init failed: {}", e);
    }

    let mut binding: BoardBinding = LedBinding::new(controller);
    info!("LED: task ready");

    led_control_logic(&mut binding, requests).await
}
