// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Liveness classification and job placement: deciding which nodes are
//! active, whether the current assignment is valid, and how to reassign
//! the job set across active nodes when it isn't.

use std::collections::HashSet;
use std::net::Ipv4Addr;

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use fc_core::{Job, NodeStatus};
use fc_storage::ClusterStore;
use rand::seq::SliceRandom;
use rand::Rng;

pub const DEFAULT_STALENESS_SECS: i64 = 180;

pub fn default_staleness() -> ChronoDuration {
    ChronoDuration::seconds(DEFAULT_STALENESS_SECS)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterValidity {
    Valid,
    Invalid,
}

/// Nodes whose latest status is within `staleness` of `now`. Every excluded
/// node's latest status is rewritten to `NodeState::Disconnected` in the
/// store, so its last-known record reflects the eviction instead of
/// reading `Running` forever.
pub fn active_nodes(store: &mut ClusterStore, now: DateTime<Utc>, staleness: ChronoDuration) -> Vec<Ipv4Addr> {
    let mut active = Vec::new();
    let mut stale: Vec<NodeStatus> = Vec::new();
    for status in store.cluster_state() {
        if now - status.time < staleness {
            active.push(status.ip);
        } else {
            stale.push(status.clone());
        }
    }
    for status in stale {
        store.put_status(status.disconnected());
    }
    active
}

/// Invalid if any job has no owner, or an owner that isn't currently active.
pub fn check_cluster_state(
    store: &mut ClusterStore,
    now: DateTime<Utc>,
    staleness: ChronoDuration,
) -> ClusterValidity {
    let active: HashSet<Ipv4Addr> = active_nodes(store, now, staleness).into_iter().collect();
    let all_assigned_and_live = store.jobs().all(|job| job.assigned_to.is_some_and(|ip| active.contains(&ip)));
    if all_assigned_and_live {
        ClusterValidity::Valid
    } else {
        ClusterValidity::Invalid
    }
}

/// Picks a uniformly random index in `[0, node_count)`. The source's
/// `randint(0, node_count)` drew an inclusive upper bound, an off-by-one
/// that could hand back an out-of-range node index; this range is
/// exclusive.
pub fn node_pick<R: Rng + ?Sized>(rng: &mut R, node_count: usize) -> usize {
    rng.gen_range(0..node_count)
}

/// Reassign every job in `store` across `active` nodes: shuffle the job
/// list, partition it into `active.len()` near-equal chunks by index
/// modulo node count, then run a greedy pass that moves one of two
/// same-pattern ("overlapping") jobs off a node they both landed on, when
/// another node without that pattern is available. A no-op when `active`
/// is empty, per the "stays invalid until a node reappears" contract.
pub fn rebalance<R: Rng>(store: &mut ClusterStore, active: &[Ipv4Addr], rng: &mut R) {
    if active.is_empty() {
        return;
    }

    let mut jobs: Vec<Job> = store.jobs().cloned().collect();
    jobs.shuffle(rng);

    let node_count = active.len();
    let mut buckets: Vec<Vec<Job>> = vec![Vec::new(); node_count];
    for (i, mut job) in jobs.into_iter().enumerate() {
        let node = i % node_count;
        job.assigned_to = Some(active[node]);
        buckets[node].push(job);
    }

    resolve_overlaps(&mut buckets, active, rng);

    store.clear_jobs();
    for job in buckets.into_iter().flatten() {
        store.add_or_update_job(job);
    }
}

fn resolve_overlaps<R: Rng>(buckets: &mut [Vec<Job>], active: &[Ipv4Addr], rng: &mut R) {
    let node_count = buckets.len();
    if node_count < 2 {
        return;
    }
    for node in 0..node_count {
        let mut i = 0;
        while i < buckets[node].len() {
            let overlap_at = (i + 1..buckets[node].len()).find(|&j| buckets[node][i].overlaps(&buckets[node][j]));
            let Some(j) = overlap_at else {
                i += 1;
                continue;
            };
            let mut attempts = 0;
            let mut swapped = false;
            while attempts < node_count {
                attempts += 1;
                let candidate = node_pick(rng, node_count);
                if candidate == node {
                    continue;
                }
                let clashes = buckets[candidate].iter().any(|job| job.overlaps(&buckets[node][j]));
                if !clashes {
                    let mut moved = buckets[node].remove(j);
                    moved.assigned_to = Some(active[candidate]);
                    buckets[candidate].push(moved);
                    swapped = true;
                    break;
                }
            }
            if !swapped {
                i += 1;
            }
        }
    }
}

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;
