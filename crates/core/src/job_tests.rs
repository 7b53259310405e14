// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::cron::CronPattern;

fn pattern() -> CronPattern {
    CronPattern::parse("* * * * *").unwrap()
}

#[test]
fn equality_ignores_assignment_and_results() {
    let mut a = Job::new(pattern(), "echo 1");
    let mut b = Job::new(pattern(), "echo 1");
    a.assigned_to = Some("10.0.0.1".parse().unwrap());
    b.last_exit_code = Some(1);
    assert_eq!(a, b);

    let c = Job::new(pattern(), "echo 2");
    assert_ne!(a, c);
}

#[test]
fn overlapping_jobs_share_pattern_differ_by_command() {
    let a = Job::new(pattern(), "echo 1");
    let b = Job::new(pattern(), "echo 2");
    assert!(a.overlaps(&b));

    let other_pattern = CronPattern::parse("0 * * * *").unwrap();
    let c = Job::new(other_pattern, "echo 2");
    assert!(!b.overlaps(&c));
}

#[test]
fn merge_result_keeps_assignment() {
    let mut stored = Job::new(pattern(), "echo 1");
    stored.assigned_to = Some("10.0.0.1".parse().unwrap());

    let mut incoming = Job::new(pattern(), "echo 1");
    incoming.pid = Some(42);
    incoming.last_exit_code = Some(0);
    incoming.last_stdout = "hi".into();

    stored.merge_result_from(&incoming);
    assert_eq!(stored.assigned_to, Some("10.0.0.1".parse().unwrap()));
    assert_eq!(stored.pid, Some(42));
    assert_eq!(stored.last_stdout, "hi");
}

#[test]
fn log_is_bounded() {
    let mut job = Job::new(pattern(), "echo 1");
    for i in 0..(MAX_LOG_LINES + 10) {
        job.push_log_line(format!("line {i}"));
    }
    assert_eq!(job.log.len(), MAX_LOG_LINES);
    assert_eq!(job.log.first().unwrap(), &format!("line {}", 10));
}
