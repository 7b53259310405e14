// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared error type for core domain operations.

use thiserror::Error;

/// Errors raised while constructing or validating core domain types.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid cron pattern: {0}")]
    Cron(#[from] crate::cron::CronParseError),
    #[error("invalid ip address: {0}")]
    InvalidIp(String),
}
