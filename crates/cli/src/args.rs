// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::path::PathBuf;

use clap::Parser;

/// fleetcrond — a masterless, gossip-coordinated cron cluster node.
#[derive(Debug, Parser)]
#[command(name = "fleetcrond", version = env!("BUILD_GIT_HASH"))]
pub struct Args {
    /// Append log file (stderr if omitted).
    #[arg(short = 'l', long = "log-file")]
    pub log_file: Option<PathBuf>,

    /// Snapshot directory (omit for no persistence).
    #[arg(short = 'p', long = "storage-path")]
    pub storage_path: Option<PathBuf>,

    /// UDP gossip port.
    #[arg(short = 'c', long = "communication-port", default_value_t = fc_transport::DEFAULT_PORT)]
    pub communication_port: u16,

    /// HTTP web surface port.
    #[arg(short = 'w', long = "web-port", default_value_t = 8080)]
    pub web_port: u16,

    /// NTP host for the startup skew check.
    #[arg(short = 'n', long = "ntp-server", default_value = "pool.ntp.org")]
    pub ntp_server: String,

    /// Liveness window in seconds.
    #[arg(short = 's', long = "node-staleness", default_value_t = fc_engine::scheduler::DEFAULT_STALENESS_SECS)]
    pub node_staleness: i64,

    /// Enable debug logging.
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;
