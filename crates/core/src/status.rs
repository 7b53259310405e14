// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Node status — the heartbeat fact broadcast by every node every 5 seconds.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Liveness state attached to a [`NodeStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeState {
    Running,
    Disconnected,
}

crate::simple_display! {
    NodeState {
        Running => "running",
        Disconnected => "disconnected",
    }
}

/// A single heartbeat sample from one node.
///
/// Equal iff `(ip, time)` match,
/// hashed by `ip` alone so a `HashSet<NodeStatus>` collapses to one bucket
/// per node while still distinguishing samples by arrival time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeStatus {
    pub ip: Ipv4Addr,
    pub load: f64,
    pub time: DateTime<Utc>,
    pub state: NodeState,
}

impl NodeStatus {
    pub fn new(ip: Ipv4Addr, load: f64, time: DateTime<Utc>) -> Self {
        Self { ip, load, time, state: NodeState::Running }
    }

    pub fn disconnected(mut self) -> Self {
        self.state = NodeState::Disconnected;
        self
    }
}

impl PartialEq for NodeStatus {
    fn eq(&self, other: &Self) -> bool {
        self.ip == other.ip && self.time == other.time
    }
}

impl Eq for NodeStatus {}

impl std::hash::Hash for NodeStatus {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.ip.hash(state);
    }
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
