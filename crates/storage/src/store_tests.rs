// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{Duration, Utc};
use fc_core::CronPattern;
use proptest::prelude::*;

fn status(ip: &str, load: f64, time: chrono::DateTime<Utc>) -> NodeStatus {
    NodeStatus::new(ip.parse().unwrap(), load, time)
}

fn job(command: &str) -> Job {
    Job::new(CronPattern::parse("* * * * *").unwrap(), command)
}

#[test]
fn current_is_latest_by_time() {
    let mut store = ClusterStore::new(None);
    let t0 = Utc::now();
    store.put_status(status("10.0.0.1", 0.1, t0));
    store.put_status(status("10.0.0.1", 0.2, t0 + Duration::seconds(5)));
    let ip = "10.0.0.1".parse().unwrap();
    assert_eq!(store.current(&ip).unwrap().load, 0.2);
}

#[test]
fn cluster_state_has_one_entry_per_ip() {
    let mut store = ClusterStore::new(None);
    let t0 = Utc::now();
    store.put_status(status("10.0.0.1", 0.1, t0));
    store.put_status(status("10.0.0.2", 0.1, t0));
    store.put_status(status("10.0.0.1", 0.3, t0 + Duration::seconds(5)));
    assert_eq!(store.cluster_state().count(), 2);
}

#[test]
fn duplicate_job_insert_merges_result_fields_and_keeps_assignment() {
    let mut store = ClusterStore::new(None);
    let mut first = job("echo 1");
    first.assigned_to = Some("10.0.0.1".parse().unwrap());
    store.add_or_update_job(first);

    let mut second = job("echo 1");
    second.last_exit_code = Some(0);
    second.last_stdout = "1\n".into();
    store.add_or_update_job(second);

    assert_eq!(store.job_count(), 1);
    let stored = store.jobs().next().unwrap();
    assert_eq!(stored.assigned_to, Some("10.0.0.1".parse().unwrap()));
    assert_eq!(stored.last_exit_code, Some(0));
}

#[test]
fn remove_job_deletes_by_equality() {
    let mut store = ClusterStore::new(None);
    store.add_or_update_job(job("echo 1"));
    assert!(store.remove_job(&job("echo 1")));
    assert_eq!(store.job_count(), 0);
}

#[yare::parameterized(
    present = { vec!["echo 1"], "echo 1", true, 0 },
    absent = { vec!["echo 1"], "echo 2", false, 1 },
    empty_store = { vec![], "echo 1", false, 0 },
)]
fn remove_job_reports_whether_a_match_was_present(
    seed: Vec<&str>,
    target: &str,
    expect_removed: bool,
    expect_remaining: usize,
) {
    let mut store = ClusterStore::new(None);
    for command in seed {
        store.add_or_update_job(job(command));
    }
    assert_eq!(store.remove_job(&job(target)), expect_removed);
    assert_eq!(store.job_count(), expect_remaining);
}

#[test]
fn clear_jobs_empties_the_set() {
    let mut store = ClusterStore::new(None);
    store.add_or_update_job(job("echo 1"));
    store.add_or_update_job(job("echo 2"));
    store.clear_jobs();
    assert_eq!(store.job_count(), 0);
}

#[test]
fn prune_preserves_latest_and_drops_redundant_runs() {
    let mut store = ClusterStore::new(None).with_prune_watermark(0);
    let t0 = Utc::now();
    store.put_status(status("10.0.0.1", 0.5, t0));
    store.put_status(status("10.0.0.1", 0.5, t0 + Duration::seconds(5)));
    store.put_status(status("10.0.0.1", 0.5, t0 + Duration::seconds(10)));
    store.put_status(status("10.0.0.1", 0.9, t0 + Duration::seconds(15)));

    let ip = "10.0.0.1".parse().unwrap();
    let before = store.current(&ip).cloned();
    store.prune();
    let after = store.current(&ip).cloned();
    assert_eq!(before, after);
}

#[test]
fn prune_is_a_no_op_below_the_watermark() {
    let mut store = ClusterStore::new(None);
    let t0 = Utc::now();
    store.put_status(status("10.0.0.1", 0.5, t0));
    store.put_status(status("10.0.0.1", 0.5, t0 + Duration::seconds(5)));
    store.prune();
    let ip = "10.0.0.1".parse().unwrap();
    assert_eq!(store.history.get(&ip).unwrap().len(), 2);
}

proptest! {
    #[test]
    fn job_count_equals_the_number_of_distinct_commands_inserted(commands in
        proptest::collection::hash_set("[a-z]{1,8}", 1..8)
    ) {
        let mut store = ClusterStore::new(None);
        for command in &commands {
            store.add_or_update_job(job(command));
        }
        prop_assert_eq!(store.job_count(), commands.len());
    }
}
