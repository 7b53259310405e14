// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fragmenting and broadcasting one outbound message, shared by the
//! processor, executor, and periodic loops.

use fc_transport::UdpTransport;
use fc_wire::Message;
use uuid::Uuid;

use crate::error::EngineError;

pub async fn broadcast(
    transport: &UdpTransport,
    hmac_key: Option<&[u8]>,
    msg: &Message,
) -> Result<(), EngineError> {
    let buf = fc_wire::dump(msg, hmac_key)?;
    let uuid = Uuid::new_v4().to_string();
    for packet in fc_wire::fragment(&uuid, &buf) {
        if let Err(err) = transport.send_broadcast(&packet.encode()).await {
            tracing::warn!(error = %err, "udp broadcast send failed, will retry next heartbeat");
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "gossip_tests.rs"]
mod tests;
