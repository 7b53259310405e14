// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Storage(#[from] fc_storage::StorageError),

    #[error(transparent)]
    Wire(#[from] fc_wire::WireError),

    #[error(transparent)]
    Shell(#[from] fc_shell::ShellError),

    #[error(transparent)]
    Platform(#[from] fc_platform::PlatformError),

    #[error("failed to read or write the crontab for {user}: {source}")]
    Crontab { user: String, #[source] source: std::io::Error },
}
