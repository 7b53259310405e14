// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fc-shell: runs a job's command as an opaque string via `/bin/sh -c`,
//! capturing its exit code, stdout, and stderr.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error;
pub mod runner;

pub use error::ShellError;
pub use runner::{run, RunOutput};
