// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Discovering this node's outward IPv4 address, kept behind a trait so
//! tests substitute a fixed address.

use std::net::Ipv4Addr;

use async_trait::async_trait;

use crate::error::PlatformError;

#[async_trait]
pub trait IpDiscovery: Send + Sync {
    async fn local_ipv4(&self) -> Result<Ipv4Addr, PlatformError>;
}

/// Real discovery via the well-known "connect a UDP socket, read the local
/// address the kernel picked" trick. No packets are sent; `connect` on a
/// datagram socket only consults the routing table.
#[derive(Debug, Default, Clone, Copy)]
pub struct UdpConnectIpDiscovery;

#[async_trait]
impl IpDiscovery for UdpConnectIpDiscovery {
    async fn local_ipv4(&self) -> Result<Ipv4Addr, PlatformError> {
        tokio::task::spawn_blocking(|| {
            let socket =
                std::net::UdpSocket::bind("0.0.0.0:0").map_err(PlatformError::NoOutwardIp)?;
            socket.connect("8.8.8.8:80").map_err(PlatformError::NoOutwardIp)?;
            match socket.local_addr().map_err(PlatformError::NoOutwardIp)?.ip() {
                std::net::IpAddr::V4(ip) => Ok(ip),
                std::net::IpAddr::V6(_) => Ok(Ipv4Addr::LOCALHOST),
            }
        })
        .await
        .unwrap_or(Ok(Ipv4Addr::LOCALHOST))
    }
}

/// Fixed address for tests.
#[derive(Debug, Clone, Copy)]
pub struct FakeIpDiscovery(pub Ipv4Addr);

#[async_trait]
impl IpDiscovery for FakeIpDiscovery {
    async fn local_ipv4(&self) -> Result<Ipv4Addr, PlatformError> {
        Ok(self.0)
    }
}

#[cfg(test)]
#[path = "ip_tests.rs"]
mod tests;
