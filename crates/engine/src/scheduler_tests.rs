// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use fc_core::{CronPattern, Job, NodeStatus};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::net::Ipv4Addr;

fn node(n: u8) -> Ipv4Addr {
    Ipv4Addr::new(10, 0, 0, n)
}

fn store_with_active_nodes(now: DateTime<Utc>, ips: &[Ipv4Addr]) -> ClusterStore {
    let mut store = ClusterStore::new(None);
    for ip in ips {
        store.put_status(NodeStatus::new(*ip, 0.0, now));
    }
    store
}

fn job(pattern: &str, command: &str) -> Job {
    Job::new(CronPattern::parse(pattern).unwrap(), command)
}

#[test]
fn active_nodes_excludes_entries_older_than_staleness() {
    let now = Utc::now();
    let mut store = ClusterStore::new(None);
    store.put_status(NodeStatus::new(node(1), 0.0, now));
    store.put_status(NodeStatus::new(node(2), 0.0, now - ChronoDuration::seconds(300)));

    let active = active_nodes(&mut store, now, ChronoDuration::seconds(180));
    assert_eq!(active, vec![node(1)]);
}

#[test]
fn active_nodes_marks_excluded_nodes_disconnected_in_the_store() {
    let now = Utc::now();
    let mut store = ClusterStore::new(None);
    store.put_status(NodeStatus::new(node(1), 0.0, now - ChronoDuration::seconds(300)));

    active_nodes(&mut store, now, ChronoDuration::seconds(180));

    assert_eq!(store.current(&node(1)).unwrap().state, fc_core::NodeState::Disconnected);
}

#[test]
fn check_cluster_state_is_invalid_when_a_job_has_no_owner() {
    let now = Utc::now();
    let mut store = store_with_active_nodes(now, &[node(1)]);
    store.add_or_update_job(job("* * * * *", "echo hi"));

    assert_eq!(check_cluster_state(&mut store, now, default_staleness()), ClusterValidity::Invalid);
}

#[test]
fn check_cluster_state_is_invalid_when_the_owner_is_stale() {
    let now = Utc::now();
    let mut store = ClusterStore::new(None);
    store.put_status(NodeStatus::new(node(1), 0.0, now - ChronoDuration::seconds(300)));
    let mut j = job("* * * * *", "echo hi");
    j.assigned_to = Some(node(1));
    store.add_or_update_job(j);

    assert_eq!(check_cluster_state(&mut store, now, default_staleness()), ClusterValidity::Invalid);
}

#[test]
fn check_cluster_state_is_valid_when_every_job_is_owned_by_an_active_node() {
    let now = Utc::now();
    let mut store = store_with_active_nodes(now, &[node(1)]);
    let mut j = job("* * * * *", "echo hi");
    j.assigned_to = Some(node(1));
    store.add_or_update_job(j);

    assert_eq!(check_cluster_state(&mut store, now, default_staleness()), ClusterValidity::Valid);
}

#[test]
fn node_pick_never_returns_an_out_of_range_index() {
    let mut rng = StdRng::seed_from_u64(7);
    for _ in 0..1000 {
        assert!(node_pick(&mut rng, 3) < 3);
    }
}

#[test]
fn rebalance_is_a_no_op_with_no_active_nodes() {
    let mut store = ClusterStore::new(None);
    store.add_or_update_job(job("* * * * *", "echo hi"));
    let mut rng = StdRng::seed_from_u64(1);

    rebalance(&mut store, &[], &mut rng);

    assert_eq!(store.jobs().next().unwrap().assigned_to, None);
}

#[test]
fn rebalance_assigns_every_job_to_an_active_node() {
    let mut store = ClusterStore::new(None);
    for i in 0..6 {
        store.add_or_update_job(job("* * * * *", &format!("echo {i}")));
    }
    let active = vec![node(1), node(2), node(3)];
    let mut rng = StdRng::seed_from_u64(42);

    rebalance(&mut store, &active, &mut rng);

    for j in store.jobs() {
        assert!(j.assigned_to.is_some_and(|ip| active.contains(&ip)));
    }
}

#[test]
fn rebalance_places_overlapping_jobs_on_different_nodes_when_possible() {
    let mut store = ClusterStore::new(None);
    store.add_or_update_job(job("* * * * *", "echo a"));
    store.add_or_update_job(job("* * * * *", "echo b"));
    let active = vec![node(1), node(2)];
    let mut rng = StdRng::seed_from_u64(3);

    rebalance(&mut store, &active, &mut rng);

    let assigned: Vec<Ipv4Addr> = store.jobs().map(|j| j.assigned_to.unwrap()).collect();
    assert_ne!(assigned[0], assigned[1]);
}

#[test]
fn rebalance_is_deterministic_given_the_same_seed() {
    let build = || {
        let mut store = ClusterStore::new(None);
        for i in 0..5 {
            store.add_or_update_job(job("* * * * *", &format!("echo {i}")));
        }
        store
    };
    let active = vec![node(1), node(2)];

    let mut store_a = build();
    rebalance(&mut store_a, &active, &mut StdRng::seed_from_u64(99));
    let mut store_b = build();
    rebalance(&mut store_b, &active, &mut StdRng::seed_from_u64(99));

    let mut a: Vec<_> = store_a.jobs().map(|j| (j.command.clone(), j.assigned_to)).collect();
    let mut b: Vec<_> = store_b.jobs().map(|j| (j.command.clone(), j.assigned_to)).collect();
    a.sort();
    b.sort();
    assert_eq!(a, b);
}
