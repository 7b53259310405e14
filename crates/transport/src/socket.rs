// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The shared UDP socket: `SO_BROADCAST` sender targeting
//! `255.255.255.255:<port>`, receiver bound to the same port.

use std::net::Ipv4Addr;
use std::sync::Arc;

use fc_wire::DATAGRAM_LEN;
use tokio::net::UdpSocket;
use tokio::task::JoinHandle;

use crate::error::TransportError;
use crate::queue::DatagramQueue;

pub const DEFAULT_PORT: u16 = 12345;
pub const BROADCAST_ADDR: Ipv4Addr = Ipv4Addr::new(255, 255, 255, 255);

pub struct UdpTransport {
    socket: Arc<UdpSocket>,
    port: u16,
}

impl UdpTransport {
    pub async fn bind(port: u16) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(("0.0.0.0", port))
            .await
            .map_err(|source| TransportError::Bind { port, source })?;
        socket.set_broadcast(true).map_err(|source| TransportError::Bind { port, source })?;
        Ok(UdpTransport { socket: Arc::new(socket), port })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn send_broadcast(&self, buf: &[u8]) -> Result<(), TransportError> {
        self.socket
            .send_to(buf, (BROADCAST_ADDR, self.port))
            .await
            .map(|_| ())
            .map_err(TransportError::Send)
    }

    /// Spawn the receive loop: every well-formed datagram is pushed onto
    /// `queue`; anything of the wrong size is dropped with a debug log,
    /// same as a malformed packet at the codec layer.
    pub fn spawn_recv_loop(&self, queue: Arc<DatagramQueue>) -> JoinHandle<()> {
        let socket = Arc::clone(&self.socket);
        tokio::spawn(async move {
            let mut buf = [0u8; DATAGRAM_LEN];
            loop {
                match socket.recv_from(&mut buf).await {
                    Ok((n, _addr)) if n == DATAGRAM_LEN => {
                        queue.push(buf.to_vec());
                    }
                    Ok((n, addr)) => {
                        tracing::debug!(n, %addr, "dropped datagram of unexpected size");
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "udp recv error");
                    }
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "socket_tests.rs"]
mod tests;
