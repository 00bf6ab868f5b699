// Heartbeat Task - Demo-Client für das LED Binding
//
// Blinkt die Heartbeat-LED und fährt danach eine Dimm-Rampe über PWM.
// Nutzt ausschließlich Anfragen über den Channel wie jeder andere Client.
use defmt::{debug, error, info};
use embassy_time::{Duration, Timer};
use led_core::INTENSITY_FULL;

use crate::config::{HEARTBEAT_BLINKS, HEARTBEAT_INTERVAL_MS, HEARTBEAT_LED, HEARTBEAT_RAMP_STEP};
use crate::{HandleId, LedReply, LedReplyReceiver, LedReplySender, LedRequest, LedRequestSender, request};

/// Heartbeat Logic
///
/// Konstruiert die LED einmal und hält das Handle für immer.
pub async fn heartbeat_logic(
    requests: LedRequestSender,
    replies: LedReplyReceiver,
    reply_to: LedReplySender,
) -> ! {
    let send = |req| request(requests, replies, reply_to, req);

    let handle = match send(LedRequest::Construct { id: HEARTBEAT_LED }).await {
        LedReply::Handle { handle } => HandleId(handle),
        other => {
            error!("Heartbeat: LED unavailable: {}", other);
            loop {
                Timer::after(Duration::from_secs(3600)).await;
            }
        }
    };
    info!("Heartbeat: LED({}) -> {}", HEARTBEAT_LED, handle);

    let interval = Duration::from_millis(HEARTBEAT_INTERVAL_MS);
    loop {
        for _ in 0..HEARTBEAT_BLINKS {
            send(LedRequest::Toggle(handle)).await;
            Timer::after(interval).await;
        }

        // Dimm-Rampe (ab 1, 0 wäre reines "aus")
        for value in (1..=i32::from(INTENSITY_FULL)).step_by(HEARTBEAT_RAMP_STEP) {
            send(LedRequest::SetIntensity(handle, value)).await;
            if let LedReply::Intensity { value: readback } =
                send(LedRequest::Intensity(handle)).await
            {
                debug!("Heartbeat: ramp set {} / read {}", value, readback);
            }
            Timer::after(interval).await;
        }

        send(LedRequest::Off(handle)).await;
        Timer::after(interval).await;
    }
}

#[embassy_executor::task]
pub async fn heartbeat_task(
    requests: LedRequestSender,
    replies: LedReplyReceiver,
    reply_to: LedReplySender,
) {
    heartbeat_logic(requests, replies, reply_to).await
}
