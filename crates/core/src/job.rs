// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job — a cron pattern + shell command pair, globally unique in the cluster.

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cron::CronPattern;

/// Bounded history of formatted result lines kept on a [`Job`].
pub const MAX_LOG_LINES: usize = 50;

/// One formatted execution log line (mirrors the classic
/// `localhost CRON[pid]: exit code, out, err` cron log format).
pub type JobLogLine = String;

/// A cron job as tracked cluster-wide.
///
/// Equality and hashing are by `(pattern, command)` only:
/// `assigned_to` and the result fields never participate, so two jobs with
/// the same pattern and command are the same job even if they carry
/// different placement or execution history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub pattern: CronPattern,
    pub command: String,
    pub enabled: bool,
    pub comment: String,
    pub user: Option<String>,
    pub assigned_to: Option<Ipv4Addr>,
    pub pid: Option<u32>,
    pub last_run: Option<DateTime<Utc>>,
    pub last_exit_code: Option<i32>,
    pub last_stdout: String,
    pub last_stderr: String,
    pub log: Vec<JobLogLine>,
    /// Tombstone flag. Only meaningful in transit on the wire;
    /// never participates in equality and is never set on a stored record.
    #[serde(default)]
    pub remove: bool,
}

impl Job {
    pub fn new(pattern: CronPattern, command: impl Into<String>) -> Self {
        Self {
            pattern,
            command: command.into(),
            enabled: true,
            comment: String::new(),
            user: None,
            assigned_to: None,
            pid: None,
            last_run: None,
            last_exit_code: None,
            last_stdout: String::new(),
            last_stderr: String::new(),
            log: Vec::new(),
            remove: false,
        }
    }

    pub fn tombstone(pattern: CronPattern, command: impl Into<String>) -> Self {
        let mut job = Self::new(pattern, command);
        job.remove = true;
        job
    }

    /// Do two jobs share a pattern but differ by command ("overlapping")?
    pub fn overlaps(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.command != other.command
    }

    pub fn is_assigned(&self) -> bool {
        self.assigned_to.is_some()
    }

    /// Merge another record's result fields into self, keeping self's
    /// `assigned_to` (the store's add_or_update_job contract).
    pub fn merge_result_from(&mut self, other: &Job) {
        self.pid = other.pid;
        self.last_run = other.last_run;
        self.last_exit_code = other.last_exit_code;
        self.last_stdout = other.last_stdout.clone();
        self.last_stderr = other.last_stderr.clone();
        self.log = other.log.clone();
    }

    pub fn push_log_line(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
        if self.log.len() > MAX_LOG_LINES {
            let excess = self.log.len() - MAX_LOG_LINES;
            self.log.drain(0..excess);
        }
    }

    /// Has this job already run for the minute-aligned `floor`?
    pub fn already_ran_for(&self, floor: DateTime<Utc>) -> bool {
        self.last_run.is_some_and(|t| t >= floor)
    }
}

impl PartialEq for Job {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.command == other.command
    }
}

impl Eq for Job {}

impl std::hash::Hash for Job {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.pattern.hash(state);
        self.command.hash(state);
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
