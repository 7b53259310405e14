// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to bind udp socket on port {port}: {source}")]
    Bind { port: u16, #[source] source: std::io::Error },

    #[error("udp send failed: {0}")]
    Send(#[source] std::io::Error),
}
