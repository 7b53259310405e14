// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShellError {
    #[error("failed to spawn /bin/sh -c {command:?}: {source}")]
    Spawn { command: String, #[source] source: std::io::Error },
}
