// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The in-memory cluster store: per-node status history and the job set.

use std::collections::{HashMap, HashSet};
use std::net::Ipv4Addr;
use std::path::PathBuf;

use fc_core::{Job, NodeStatus};

use crate::error::StorageError;
use crate::snapshot;

/// Status history entries above which [`ClusterStore::prune`] starts
/// dropping redundant samples. The contract leaves this configurable
/// rather than hard-coding a watermark so large it never fires in
/// practice.
pub const DEFAULT_PRUNE_WATERMARK: usize = 10_000_000;

/// Replicated soft-state store shared by the processor, scheduler, and web
/// surface on one node.
#[derive(Debug, Clone, Default)]
pub struct ClusterStore {
    history: HashMap<Ipv4Addr, Vec<NodeStatus>>,
    jobs: HashSet<Job>,
    path_prefix: Option<PathBuf>,
    prune_watermark: usize,
}

impl ClusterStore {
    pub fn new(path_prefix: Option<PathBuf>) -> Self {
        ClusterStore {
            history: HashMap::new(),
            jobs: HashSet::new(),
            path_prefix,
            prune_watermark: DEFAULT_PRUNE_WATERMARK,
        }
    }

    pub fn with_prune_watermark(mut self, watermark: usize) -> Self {
        self.prune_watermark = watermark;
        self
    }

    pub fn path_prefix(&self) -> Option<&PathBuf> {
        self.path_prefix.as_ref()
    }

    /// Append a status sample, preserving insertion order so the latest
    /// sample for an ip is always its last entry.
    pub fn put_status(&mut self, status: NodeStatus) {
        self.history.entry(status.ip).or_default().push(status);
    }

    /// Latest status for `ip` by `time`.
    pub fn current(&self, ip: &Ipv4Addr) -> Option<&NodeStatus> {
        self.history.get(ip).and_then(|samples| samples.iter().max_by_key(|s| s.time))
    }

    /// One latest-by-time status per known ip.
    pub fn cluster_state(&self) -> impl Iterator<Item = &NodeStatus> {
        self.history.keys().filter_map(move |ip| self.current(ip))
    }

    pub fn known_ips(&self) -> impl Iterator<Item = &Ipv4Addr> {
        self.history.keys()
    }

    /// If an equal job (same pattern + command) already exists, merge the
    /// incoming result fields into it and keep its `assigned_to`; otherwise
    /// insert the incoming job as a new record.
    pub fn add_or_update_job(&mut self, incoming: Job) {
        if let Some(mut existing) = self.jobs.take(&incoming) {
            existing.merge_result_from(&incoming);
            self.jobs.insert(existing);
        } else {
            self.jobs.insert(incoming);
        }
    }

    /// Delete a job by (pattern, command) equality. Returns whether a
    /// matching job was present.
    pub fn remove_job(&mut self, job: &Job) -> bool {
        self.jobs.remove(job)
    }

    pub fn clear_jobs(&mut self) {
        self.jobs.clear();
    }

    pub fn jobs(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Drop status entries whose `load` equals their immediate
    /// time-predecessor's, for every ip, never dropping the latest entry.
    /// Only runs once the total entry count crosses `prune_watermark`.
    pub fn prune(&mut self) {
        let total: usize = self.history.values().map(Vec::len).sum();
        if total <= self.prune_watermark {
            return;
        }
        for samples in self.history.values_mut() {
            if samples.len() < 2 {
                continue;
            }
            let last_index = samples.len() - 1;
            let mut kept = Vec::with_capacity(samples.len());
            for (i, s) in samples.drain(..).enumerate() {
                let redundant = kept
                    .last()
                    .map(|prev: &NodeStatus| prev.load == s.load)
                    .unwrap_or(false);
                if redundant && i != last_index {
                    continue;
                }
                kept.push(s);
            }
            *samples = kept;
        }
    }

    pub fn save(&self) -> Result<(), StorageError> {
        let Some(prefix) = &self.path_prefix else { return Ok(()) };
        snapshot::save(prefix, &self.history, &self.jobs)
    }

    pub fn load(&mut self) -> Result<(), StorageError> {
        let Some(prefix) = &self.path_prefix else { return Ok(()) };
        let (history, jobs) = snapshot::load(prefix)?;
        self.history = history;
        self.jobs = jobs;
        Ok(())
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
