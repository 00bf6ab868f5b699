//! JSON-Protokoll für LED-Anfragen (Feature "serde")
//!
//! Client → Binding: `{"op":"on","handle":0}`
//! Binding → Client: `{"type":"done"}` (siehe [`LedReply`](crate::LedReply))
//!
//! Hinweis: Verwendet eine flache Struct statt getaggtem Enum für
//! serde-json-core Kompatibilität (kein alloc).
//!
//! Für zeilenbasierte Transporte (UART) sammelt [`LineBuffer`] Bytes bis
//! zum Zeilenende und parst dann genau eine Anfrage.

use heapless::Vec;
use serde::Deserialize;

use crate::binding::{HandleId, LedReply, LedRequest};
use crate::traits::LedError;

/// Operation einer Anfrage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedOp {
    Construct,
    On,
    Off,
    Toggle,
    /// Ohne `value` lesen, mit `value` setzen
    Intensity,
    Destroy,
}

/// Rohe Anfrage, wie sie über die Leitung kommt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LedRequestMessage {
    pub op: LedOp,
    #[serde(default)]
    pub id: Option<i32>,
    #[serde(default)]
    pub handle: Option<u16>,
    #[serde(default)]
    pub value: Option<i32>,
}

impl TryFrom<LedRequestMessage> for LedRequest {
    type Error = LedError;

    fn try_from(message: LedRequestMessage) -> Result<Self, Self::Error> {
        let handle = || {
            message
                .handle
                .map(HandleId)
                .ok_or(LedError::MalformedRequest)
        };

        match message.op {
            LedOp::Construct => message
                .id
                .map(|id| LedRequest::Construct { id })
                .ok_or(LedError::MalformedRequest),
            LedOp::On => Ok(LedRequest::On(handle()?)),
            LedOp::Off => Ok(LedRequest::Off(handle()?)),
            LedOp::Toggle => Ok(LedRequest::Toggle(handle()?)),
            LedOp::Intensity => {
                let handle = handle()?;
                Ok(match message.value {
                    Some(value) => LedRequest::SetIntensity(handle, value),
                    None => LedRequest::Intensity(handle),
                })
            }
            LedOp::Destroy => Ok(LedRequest::Destroy(handle()?)),
        }
    }
}

/// Parst eine JSON-Anfrage
///
/// Ungültiges JSON und fehlende Felder → `LedError::MalformedRequest`
pub fn parse_request(json: &[u8]) -> Result<LedRequest, LedError> {
    let (message, _) = serde_json_core::from_slice::<LedRequestMessage>(json)
        .map_err(|_| LedError::MalformedRequest)?;
    LedRequest::try_from(message)
}

/// Serialisiert eine Antwort in den Buffer (ohne Zeilenende)
///
/// `None`, wenn der Buffer zu klein ist.
pub fn render_reply<'b>(reply: &LedReply, buffer: &'b mut [u8]) -> Option<&'b [u8]> {
    let len = serde_json_core::to_slice(reply, buffer).ok()?;
    Some(&buffer[..len])
}

// ============================================================================
// Zeilen-Assembler
// ============================================================================

/// Sammelt eingehende Bytes zu Zeilen mit je einer Anfrage
///
/// `\r` wird ignoriert, Leerzeilen erzeugen keine Anfrage. Zeilen länger
/// als `N` Bytes werden verworfen und als fehlerhafte Anfrage gemeldet.
#[derive(Debug, Default)]
pub struct LineBuffer<const N: usize> {
    line: Vec<u8, N>,
    overflow: bool,
}

impl<const N: usize> LineBuffer<N> {
    pub const fn new() -> Self {
        Self {
            line: Vec::new(),
            overflow: false,
        }
    }

    /// Nimmt ein Byte an. Liefert `Some` am Ende jeder nicht-leeren Zeile.
    pub fn push(&mut self, byte: u8) -> Option<Result<LedRequest, LedError>> {
        match byte {
            b'\r' => None,
            b'\n' => {
                let result = if self.overflow {
                    Some(Err(LedError::MalformedRequest))
                } else if self.line.is_empty() {
                    None
                } else {
                    Some(parse_request(&self.line))
                };
                self.line.clear();
                self.overflow = false;
                result
            }
            _ => {
                if self.line.push(byte).is_err() {
                    self.overflow = true;
                }
                None
            }
        }
    }
}
