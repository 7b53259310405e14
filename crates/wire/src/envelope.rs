// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The signed envelope carried inside a reassembled packet group.
//!
//! The payload is embedded as an exact, byte-identical JSON fragment via
//! [`serde_json::value::RawValue`] so an optional HMAC-SHA1 (hex-encoded)
//! can be computed and verified over those exact bytes, independent of how
//! `serde_json` would otherwise re-serialize the value. This replaces the
//! "trailing raw MAC bytes after the last space" framing with a
//! self-describing one: the datagram layer always zero-pads the final
//! fragment, and JSON text never contains an embedded NUL byte, so trimming
//! trailing zero padding before parsing is always safe.

use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha1::Sha1;

use crate::error::WireError;
use crate::message::Message;

type HmacSha1 = Hmac<Sha1>;

#[derive(Serialize)]
struct EnvelopeOut<'a> {
    payload: &'a serde_json::value::RawValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    mac: Option<String>,
}

#[derive(Deserialize)]
struct EnvelopeIn<'a> {
    #[serde(borrow)]
    payload: &'a serde_json::value::RawValue,
    #[serde(default)]
    mac: Option<String>,
}

/// Result of [`load`]: a message whose signature matched the configured
/// key, or one accepted unsigned because no key is configured on this node.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadOutcome {
    Verified(Message),
    Unsigned(Message),
}

impl LoadOutcome {
    pub fn into_message(self) -> Message {
        match self {
            LoadOutcome::Verified(m) | LoadOutcome::Unsigned(m) => m,
        }
    }
}

fn mac_hex(key: &[u8], payload: &str) -> Result<String, WireError> {
    let mut mac = HmacSha1::new_from_slice(key).map_err(|_| WireError::BadSignature)?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Serialize `msg` to an envelope buffer, signing it with `key` if given.
pub fn dump(msg: &Message, key: Option<&[u8]>) -> Result<Vec<u8>, WireError> {
    let payload_json = serde_json::to_string(msg)?;
    let payload = serde_json::value::RawValue::from_string(payload_json)?;
    let mac = key.map(|k| mac_hex(k, payload.get())).transpose()?;
    let envelope = EnvelopeOut { payload: &payload, mac };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Parse a reassembled buffer back into a [`Message`].
///
/// Signature verification happens before deserialization: a present-but-
/// mismatched mac is rejected without ever constructing a [`Message`]. A
/// buffer signed under a key this node does not have configured is
/// rejected outright rather than silently accepted unsigned, since a
/// missing key on the receiving side is itself a configuration error worth
/// surfacing to the caller (who decides whether to drop or log it).
pub fn load(buf: &[u8], key: Option<&[u8]>) -> Result<LoadOutcome, WireError> {
    let trimmed = trim_trailing_nul(buf);
    let envelope: EnvelopeIn =
        serde_json::from_slice(trimmed).map_err(WireError::Decode)?;

    match (envelope.mac.as_deref(), key) {
        (Some(sent_mac), Some(k)) => {
            let sent_raw = hex::decode(sent_mac).map_err(|_| WireError::BadMacEncoding)?;
            let mut mac = HmacSha1::new_from_slice(k).map_err(|_| WireError::BadSignature)?;
            mac.update(envelope.payload.get().as_bytes());
            mac.verify_slice(&sent_raw).map_err(|_| WireError::BadSignature)?;
            let msg: Message =
                serde_json::from_str(envelope.payload.get()).map_err(WireError::Decode)?;
            Ok(LoadOutcome::Verified(msg))
        }
        (Some(_), None) => Err(WireError::MissingKey),
        (None, _) => {
            let msg: Message =
                serde_json::from_str(envelope.payload.get()).map_err(WireError::Decode)?;
            Ok(LoadOutcome::Unsigned(msg))
        }
    }
}

fn trim_trailing_nul(buf: &[u8]) -> &[u8] {
    let end = buf.iter().rposition(|&b| b != 0).map(|i| i + 1).unwrap_or(0);
    &buf[..end]
}

#[cfg(test)]
#[path = "envelope_tests.rs"]
mod tests;
