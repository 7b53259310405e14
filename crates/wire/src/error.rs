// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WireError {
    #[error("failed to serialize message: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to deserialize message")]
    Decode(#[source] serde_json::Error),

    #[error("envelope signature did not verify")]
    BadSignature,

    #[error("envelope is signed but no shared key was configured")]
    MissingKey,

    #[error("malformed hmac hex encoding")]
    BadMacEncoding,
}
