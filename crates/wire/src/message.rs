// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The gossip message kinds carried inside a signed envelope.

use chrono::{DateTime, Utc};
use fc_core::{Job, NodeStatus};
use serde::{Deserialize, Serialize};

/// A gossip message, tagged on the wire by `kind`.
///
/// `Job` carries `remove = false` for an upsert and `remove = true` for a
/// tombstone (a delete-by-re-announce convention); the other four kinds
/// name the job and node they target by full value, since the receiver
/// needs the job's pattern to find its store entry regardless of which
/// field changed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Message {
    Status(NodeStatus),
    Job(Job),
    Rebalance { timestamp: DateTime<Utc> },
    Run { job: Job },
    Kill { job: Job, pid: Option<u32> },
    Toggle { job: Job },
}

impl Message {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Message::Status(_) => "status",
            Message::Job(_) => "job",
            Message::Rebalance { .. } => "rebalance",
            Message::Run { .. } => "run",
            Message::Kill { .. } => "kill",
            Message::Toggle { .. } => "toggle",
        }
    }
}

#[cfg(test)]
#[path = "message_tests.rs"]
mod tests;
