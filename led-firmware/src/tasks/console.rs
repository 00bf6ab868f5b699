// Console Task - JSON-Zeilenprotokoll über UART
//
// Eine Anfrage pro Zeile, eine Antwort pro Zeile:
//   → {"op":"construct","id":2}
//   ← {"type":"handle","handle":0}
//   → {"op":"intensity","handle":0,"value":128}
//   ← {"type":"done"}
use defmt::{info, warn};
use esp_hal::Async;
use esp_hal::uart::Uart;
use led_core::{LedError, LedReply, LineBuffer, render_reply};

use crate::config::{CONSOLE_LINE_BUFFER_SIZE, CONSOLE_READ_CHUNK_SIZE, JSON_REPLY_BUFFER_SIZE};
use crate::{LedReplyReceiver, LedReplySender, LedRequestSender, request};

/// Console Logic: liest Zeilen, leitet sie an den LED Task weiter, antwortet
pub async fn console_logic(
    mut uart: Uart<'static, Async>,
    requests: LedRequestSender,
    replies: LedReplyReceiver,
    reply_to: LedReplySender,
) -> ! {
    let mut lines = LineBuffer::<CONSOLE_LINE_BUFFER_SIZE>::new();
    let mut chunk = [0u8; CONSOLE_READ_CHUNK_SIZE];

    loop {
        let n = match uart.read_async(&mut chunk).await {
            Ok(n) => n,
            Err(_e) => {
                warn!("Console: UART RX error");
                continue;
            }
        };

        for &byte in &chunk[..n] {
            let Some(parsed) = lines.push(byte) else {
                continue;
            };

            let reply = match parsed {
                Ok(req) => request(requests, replies, reply_to, req).await,
                Err(e) => {
                    info!("Console: malformed request");
                    LedReply::from(e)
                }
            };

            if let Err(_e) = write_reply(&mut uart, &reply).await {
                warn!("Console: UART TX error");
            }
        }
    }
}

async fn write_reply(uart: &mut Uart<'static, Async>, reply: &LedReply) -> Result<(), LedError> {
    let mut json_buffer = [0u8; JSON_REPLY_BUFFER_SIZE];
    let json = render_reply(reply, &mut json_buffer).ok_or(LedError::WriteFailed)?;
    write_all(uart, json).await?;
    write_all(uart, b"\n").await
}

async fn write_all(uart: &mut Uart<'static, Async>, mut bytes: &[u8]) -> Result<(), LedError> {
    while !bytes.is_empty() {
        let written = uart
            .write_async(bytes)
            .await
            .map_err(|_| LedError::WriteFailed)?;
        bytes = &bytes[written..];
    }
    Ok(())
}

/// Console Task
///
/// # Parameter
/// - `uart`: UART1 im Async-Modus (Pins vorher aus der Registry geholt)
/// - `requests`: Sender für LED-Anfragen
/// - `replies` / `reply_to`: eigener Antwort-Channel
#[embassy_executor::task]
pub async fn console_task(
    uart: Uart<'static, Async>,
    requests: LedRequestSender,
    replies: LedReplyReceiver,
    reply_to: LedReplySender,
) {
    info!("Console: ready (one JSON request per line)");
    console_logic(uart, requests, replies, reply_to).await
}
