// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Periodic loops that keep the cluster converging independently of any one
//! node's job traffic: the rebalance-check trigger and the snapshot timer.

use std::sync::Arc;
use std::time::Duration;

use fc_core::Clock;
use fc_storage::ClusterStore;
use fc_transport::UdpTransport;
use fc_wire::Message;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::gossip;
use crate::scheduler::{self, ClusterValidity};
use crate::time::utc_now;

pub const REBALANCE_CHECK_INTERVAL: Duration = Duration::from_secs(23);
pub const REBALANCE_SETTLE_DELAY: Duration = Duration::from_secs(5);
/// Not specified numerically upstream; chosen as a conservative default that
/// bounds data loss on a crash without snapshotting every tick.
pub const SNAPSHOT_INTERVAL: Duration = Duration::from_secs(60);

pub struct PeriodicLoops<C: Clock> {
    store: Arc<Mutex<ClusterStore>>,
    transport: Arc<UdpTransport>,
    hmac_key: Option<Vec<u8>>,
    clock: C,
    staleness: chrono::Duration,
}

impl<C: Clock> PeriodicLoops<C> {
    pub fn new(
        store: Arc<Mutex<ClusterStore>>,
        transport: Arc<UdpTransport>,
        hmac_key: Option<Vec<u8>>,
        clock: C,
        staleness: chrono::Duration,
    ) -> Self {
        PeriodicLoops { store, transport, hmac_key, clock, staleness }
    }

    /// Check whether the cluster's job placement is still valid; if not,
    /// recompute placement locally first, then tell the rest of the cluster
    /// to clear their view via a `Rebalance` broadcast, wait for the
    /// cluster to settle, then rebroadcast the full rebalanced job set.
    ///
    /// Local recomputation has to happen before the broadcast: nothing
    /// filters out this node's own broadcasts, so if the `Rebalance`
    /// message went out first, this node could receive it back and clear
    /// its own store before (or while) `scheduler::rebalance` runs,
    /// losing the assignments it was about to compute.
    pub async fn rebalance_check(&self) {
        let now = utc_now(&self.clock);
        let validity = {
            let mut store = self.store.lock();
            scheduler::check_cluster_state(&mut store, now, self.staleness)
        };
        if validity == ClusterValidity::Valid {
            return;
        }

        tracing::info!("cluster state invalid, triggering rebalance");

        let rebalanced_jobs: Vec<_> = {
            let mut store = self.store.lock();
            let active = scheduler::active_nodes(&mut store, now, self.staleness);
            let mut rng = StdRng::from_entropy();
            scheduler::rebalance(&mut store, &active, &mut rng);
            store.jobs().cloned().collect()
        };

        // Captured above, not re-read from the store after this broadcast:
        // nothing filters out this node's own broadcasts, so this node will
        // receive its own `Rebalance` message and clear its store just like
        // every other node.
        if let Err(err) = self.broadcast(&Message::Rebalance { timestamp: now }).await {
            tracing::warn!(error = %err, "failed to broadcast rebalance trigger");
        }

        tokio::time::sleep(REBALANCE_SETTLE_DELAY).await;

        for job in rebalanced_jobs {
            if let Err(err) = self.broadcast(&Message::Job(job)).await {
                tracing::warn!(error = %err, "failed to rebroadcast a rebalanced job");
            }
        }
    }

    /// Persist the current store to disk, logging but not propagating a
    /// failure: a missed snapshot costs recent history on the next crash,
    /// not correctness of the running cluster.
    pub async fn snapshot(&self) {
        let store = self.store.clone();
        let result = tokio::task::spawn_blocking(move || store.lock().save()).await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tracing::warn!(error = %err, "failed to save cluster snapshot"),
            Err(err) => tracing::warn!(error = %err, "snapshot task panicked"),
        }
    }

    async fn broadcast(&self, msg: &Message) -> Result<(), crate::error::EngineError> {
        gossip::broadcast(&self.transport, self.hmac_key.as_deref(), msg).await
    }
}

#[cfg(test)]
#[path = "loops_tests.rs"]
mod tests;
