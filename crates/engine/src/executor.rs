// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The local executor: a heartbeat loop that announces this node's load and
//! owned jobs every 5 s, and a tick loop that launches owned, enabled, due
//! jobs every 15 s and broadcasts their results.

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use fc_core::{Clock, Job, NodeStatus};
use fc_platform::{LoadSampler, ProcessScanner};
use fc_storage::ClusterStore;
use fc_transport::UdpTransport;
use fc_wire::Message;
use parking_lot::Mutex;

use crate::error::EngineError;
use crate::gossip;
use crate::time::{floor_to_minute, utc_now};

pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
pub const TICK_INTERVAL: Duration = Duration::from_secs(15);

pub struct Executor<P: ProcessScanner, L: LoadSampler, C: Clock> {
    store: Arc<Mutex<ClusterStore>>,
    transport: Arc<UdpTransport>,
    hmac_key: Option<Vec<u8>>,
    process_scanner: Arc<P>,
    load_sampler: Arc<L>,
    clock: C,
    self_ip: Ipv4Addr,
}

impl<P: ProcessScanner, L: LoadSampler, C: Clock> Executor<P, L, C> {
    pub fn new(
        store: Arc<Mutex<ClusterStore>>,
        transport: Arc<UdpTransport>,
        hmac_key: Option<Vec<u8>>,
        process_scanner: Arc<P>,
        load_sampler: Arc<L>,
        clock: C,
        self_ip: Ipv4Addr,
    ) -> Self {
        Executor { store, transport, hmac_key, process_scanner, load_sampler, clock, self_ip }
    }

    fn owned_jobs(&self) -> Vec<Job> {
        self.store.lock().jobs().filter(|j| j.assigned_to == Some(self.self_ip)).cloned().collect()
    }

    /// Sample load and each owned job's pid, then broadcast a fresh Status
    /// for this node followed by each owned job. Never re-broadcasts a
    /// peer's identity: the status emitted always names `self_ip`.
    pub async fn heartbeat(&self) {
        let load = self.load_sampler.sample().await;
        let now = utc_now(&self.clock);
        let status = NodeStatus::new(self.self_ip, load, now);
        if let Err(err) = self.broadcast(&Message::Status(status)).await {
            tracing::warn!(error = %err, "failed to broadcast heartbeat status");
        }

        for mut job in self.owned_jobs() {
            job.pid = self.process_scanner.find_pid_by_command(&job.command).await;
            self.store.lock().add_or_update_job(job.clone());
            if let Err(err) = self.broadcast(&Message::Job(job)).await {
                tracing::warn!(error = %err, "failed to broadcast owned job status");
            }
        }
    }

    /// Launch every owned, enabled job whose pattern matches the current
    /// UTC minute and that hasn't already run for it.
    pub async fn tick(&self) {
        let now = utc_now(&self.clock);
        let floor = floor_to_minute(now);
        let due: Vec<Job> = self
            .owned_jobs()
            .into_iter()
            .filter(|j| j.enabled && !j.pattern.reboot && j.pattern.matches(now) && !j.already_ran_for(floor))
            .collect();
        for job in due {
            self.launch_and_record(job).await;
        }
    }

    /// Run every owned `@reboot` job once. Called a single time at node
    /// startup, never from the per-minute tick loop.
    pub async fn run_reboot_jobs(&self) {
        let due: Vec<Job> =
            self.owned_jobs().into_iter().filter(|j| j.enabled && j.pattern.reboot).collect();
        for job in due {
            self.launch_and_record(job).await;
        }
    }

    async fn launch_and_record(&self, mut job: Job) {
        let outcome = match fc_shell::run(&job.command).await {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, command = %job.command, "failed to launch job");
                return;
            }
        };
        let now = utc_now(&self.clock);
        job.last_run = Some(now);
        job.last_exit_code = Some(outcome.exit_code);
        job.last_stdout = outcome.stdout;
        job.last_stderr = outcome.stderr;
        job.push_log_line(format_log_line(&job, now));
        self.store.lock().add_or_update_job(job.clone());
        if let Err(err) = self.broadcast(&Message::Job(job)).await {
            tracing::warn!(error = %err, "failed to rebroadcast job result");
        }
    }

    async fn broadcast(&self, msg: &Message) -> Result<(), EngineError> {
        gossip::broadcast(&self.transport, self.hmac_key.as_deref(), msg).await
    }
}

fn format_log_line(job: &Job, at: chrono::DateTime<chrono::Utc>) -> String {
    format!(
        "{} CRON: {} exit={} out={:?} err={:?}",
        at.to_rfc3339(),
        job.command,
        job.last_exit_code.unwrap_or(-1),
        job.last_stdout,
        job.last_stderr,
    )
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;
