// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The startup NTP skew check: a minimal RFC 4330 SNTP v4 client query,
//! kept behind a trait so tests substitute a fixed skew instead of hitting
//! the network.

use std::net::UdpSocket;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use async_trait::async_trait;

use crate::error::PlatformError;

/// Seconds between the NTP epoch (1900-01-01) and the Unix epoch.
const NTP_UNIX_EPOCH_DELTA: u64 = 2_208_988_800;

#[async_trait]
pub trait NtpCheck: Send + Sync {
    /// Signed skew in milliseconds, `server time - local time`.
    async fn skew_millis(&self, server: &str) -> Result<i64, PlatformError>;
}

/// Real check: a bare client-mode SNTP request/response, good enough for a
/// one-shot startup gate (no round-trip-delay correction).
#[derive(Debug, Default, Clone, Copy)]
pub struct SntpCheck;

#[async_trait]
impl NtpCheck for SntpCheck {
    async fn skew_millis(&self, server: &str) -> Result<i64, PlatformError> {
        let server = server.to_string();
        tokio::task::spawn_blocking(move || query_skew_millis(&server)).await.unwrap_or_else(
            |_| {
                Err(PlatformError::Ntp {
                    server: "unknown".to_string(),
                    source: std::io::Error::other("ntp query task panicked"),
                })
            },
        )
    }
}

fn query_skew_millis(server: &str) -> Result<i64, PlatformError> {
    let to_err = |source: std::io::Error| PlatformError::Ntp { server: server.to_string(), source };

    let socket = UdpSocket::bind("0.0.0.0:0").map_err(to_err)?;
    socket.set_read_timeout(Some(Duration::from_secs(5))).map_err(to_err)?;
    socket.connect((server, 123)).map_err(to_err)?;

    let mut request = [0u8; 48];
    request[0] = 0x1B; // LI=0, VN=3, Mode=3 (client)
    socket.send(&request).map_err(to_err)?;

    let mut response = [0u8; 48];
    let n = socket.recv(&mut response).map_err(to_err)?;
    let received_at = SystemTime::now();
    if n < 48 {
        return Err(PlatformError::MalformedNtpResponse { server: server.to_string() });
    }

    let mut seconds_buf = [0u8; 4];
    seconds_buf.copy_from_slice(&response[40..44]);
    let seconds = u32::from_be_bytes(seconds_buf) as u64;

    let mut fraction_buf = [0u8; 4];
    fraction_buf.copy_from_slice(&response[44..48]);
    let fraction = u32::from_be_bytes(fraction_buf) as u64;
    if seconds < NTP_UNIX_EPOCH_DELTA {
        return Err(PlatformError::MalformedNtpResponse { server: server.to_string() });
    }

    let frac_millis = (fraction * 1000) >> 32;
    let server_time = UNIX_EPOCH
        + Duration::from_secs(seconds - NTP_UNIX_EPOCH_DELTA)
        + Duration::from_millis(frac_millis);

    let server_millis = server_time.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64;
    let local_millis = received_at.duration_since(UNIX_EPOCH).unwrap_or_default().as_millis() as i64;
    Ok(server_millis - local_millis)
}

/// Fixed skew for tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedSkewNtpCheck(pub i64);

#[async_trait]
impl NtpCheck for FixedSkewNtpCheck {
    async fn skew_millis(&self, _server: &str) -> Result<i64, PlatformError> {
        Ok(self.0)
    }
}

#[cfg(test)]
#[path = "ntp_tests.rs"]
mod tests;
