// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to read snapshot {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },

    #[error("failed to write snapshot {path}: {source}")]
    Write { path: PathBuf, #[source] source: std::io::Error },

    #[error("failed to decode snapshot {path}: {source}")]
    Decode { path: PathBuf, #[source] source: serde_json::Error },

    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}
