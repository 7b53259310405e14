// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("refused to kill this node's own process (pid {0})")]
    KillSelf(u32),

    #[error("no process found with pid {0}")]
    NoSuchProcess(u32),

    #[error("ntp query to {server} failed: {source}")]
    Ntp { server: String, #[source] source: std::io::Error },

    #[error("ntp response from {server} was malformed")]
    MalformedNtpResponse { server: String },

    #[error("could not determine an outward ip address: {0}")]
    NoOutwardIp(#[source] std::io::Error),
}
