// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Reassembles inbound datagrams into messages and dispatches each kind
//! against the local store, crontab, and process table.

use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use fc_core::{Clock, Job};
use fc_platform::ProcessScanner;
use fc_storage::ClusterStore;
use fc_transport::UdpTransport;
use fc_wire::{Message, Packet};
use parking_lot::Mutex;

use crate::crontab;
use crate::error::EngineError;
use crate::gossip;
use crate::time::utc_now;

/// Soft cap on the number of distinct in-flight reassembly groups; the
/// oldest incomplete group is evicted to make room for a new one, same
/// back-pressure policy as the datagram queue upstream of this processor.
pub const MAX_PENDING_GROUPS: usize = 10_000;

pub struct Processor<P: ProcessScanner, C: Clock> {
    store: Arc<Mutex<ClusterStore>>,
    groups: Mutex<HashMap<String, Vec<Packet>>>,
    group_order: Mutex<Vec<String>>,
    transport: Arc<UdpTransport>,
    hmac_key: Option<Vec<u8>>,
    process_scanner: Arc<P>,
    clock: C,
    self_ip: Ipv4Addr,
    self_pid: u32,
    default_user: Option<String>,
}

impl<P: ProcessScanner, C: Clock> Processor<P, C> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store: Arc<Mutex<ClusterStore>>,
        transport: Arc<UdpTransport>,
        hmac_key: Option<Vec<u8>>,
        process_scanner: Arc<P>,
        clock: C,
        self_ip: Ipv4Addr,
        self_pid: u32,
        default_user: Option<String>,
    ) -> Self {
        Processor {
            store,
            groups: Mutex::new(HashMap::new()),
            group_order: Mutex::new(Vec::new()),
            transport,
            hmac_key,
            process_scanner,
            clock,
            self_ip,
            self_pid,
            default_user,
        }
    }

    /// Feed one raw datagram off the wire, dispatching any message it
    /// completes.
    pub async fn accept_datagram(&self, datagram: &[u8]) -> Result<(), EngineError> {
        let Some(payload) = self.reassemble(datagram) else { return Ok(()) };
        let outcome = match fc_wire::load(&payload, self.hmac_key.as_deref()) {
            Ok(outcome) => outcome,
            Err(err) => {
                tracing::warn!(error = %err, "dropping message that failed to decode or verify");
                return Ok(());
            }
        };
        self.dispatch(outcome.into_message()).await
    }

    fn reassemble(&self, datagram: &[u8]) -> Option<Vec<u8>> {
        let Some(packet) = Packet::decode(datagram) else {
            tracing::debug!("dropping malformed datagram");
            return None;
        };
        let uuid = packet.uuid.clone();

        let mut groups = self.groups.lock();
        let mut order = self.group_order.lock();
        if !groups.contains_key(&uuid) {
            if groups.len() >= MAX_PENDING_GROUPS {
                if !order.is_empty() {
                    let oldest = order.remove(0);
                    groups.remove(&oldest);
                    tracing::warn!(capacity = MAX_PENDING_GROUPS, "reassembly buffer full, dropped oldest group");
                }
            }
            order.push(uuid.clone());
        }
        let entry = groups.entry(uuid.clone()).or_default();
        entry.push(packet);

        let complete = fc_wire::packet::reassemble(entry)?;
        groups.remove(&uuid);
        order.retain(|u| u != &uuid);
        Some(complete)
    }

    async fn dispatch(&self, msg: Message) -> Result<(), EngineError> {
        match msg {
            Message::Status(status) => {
                self.store.lock().put_status(status);
            }
            Message::Rebalance { .. } => self.dispatch_rebalance().await,
            Message::Job(job) if job.remove => self.dispatch_job_removal(job).await?,
            Message::Job(job) => self.dispatch_job_upsert(job).await?,
            Message::Run { job } => self.dispatch_run(job).await?,
            Message::Kill { job, pid } => self.dispatch_kill(job, pid).await?,
            Message::Toggle { job } => self.dispatch_toggle(job).await?,
        }
        Ok(())
    }

    async fn dispatch_rebalance(&self) {
        self.store.lock().clear_jobs();
        self.groups.lock().clear();
        self.group_order.lock().clear();
        let user = self.default_user.as_deref().unwrap_or("root");
        if let Err(err) = crontab::purge_all(user).await {
            tracing::warn!(error = %err, "failed to purge crontab on rebalance");
        }
    }

    async fn dispatch_job_upsert(&self, mut job: Job) -> Result<(), EngineError> {
        if job.user.is_none() {
            job.user.clone_from(&self.default_user);
        }
        let is_owner = job.assigned_to == Some(self.self_ip);
        self.store.lock().add_or_update_job(job.clone());
        if is_owner {
            if let Err(err) = crontab::append(&job).await {
                tracing::warn!(error = %err, "failed to append job to local crontab");
            }
        }
        Ok(())
    }

    async fn dispatch_job_removal(&self, job: Job) -> Result<(), EngineError> {
        let is_owner = job.assigned_to == Some(self.self_ip);
        if is_owner {
            if let Some(pid) = job.pid {
                if self.process_scanner.matches(pid, &job.command).await {
                    if let Err(err) = self.process_scanner.kill_tree(pid, self.self_pid).await {
                        tracing::warn!(error = %err, "failed to kill job process tree on removal");
                    }
                }
            }
            if let Err(err) = crontab::remove(&job).await {
                tracing::warn!(error = %err, "failed to remove job from local crontab");
            }
        }
        self.store.lock().remove_job(&job);
        Ok(())
    }

    async fn dispatch_run(&self, job: Job) -> Result<(), EngineError> {
        if job.assigned_to != Some(self.self_ip) {
            return Ok(());
        }
        let mut updated = job;
        let outcome = fc_shell::run(&updated.command).await?;
        let now = utc_now(&self.clock);
        updated.last_run = Some(now);
        updated.last_exit_code = Some(outcome.exit_code);
        updated.last_stdout = outcome.stdout;
        updated.last_stderr = outcome.stderr;
        updated.push_log_line(format_log_line(&updated, now));
        self.store.lock().add_or_update_job(updated.clone());
        gossip::broadcast(&self.transport, self.hmac_key.as_deref(), &Message::Job(updated)).await
    }

    async fn dispatch_kill(&self, job: Job, pid: Option<u32>) -> Result<(), EngineError> {
        if job.assigned_to != Some(self.self_ip) {
            return Ok(());
        }
        let Some(pid) = pid else { return Ok(()) };
        if pid == self.self_pid {
            tracing::warn!(pid, "refusing to kill this node's own process");
            return Ok(());
        }
        if self.process_scanner.matches(pid, &job.command).await {
            if let Err(err) = self.process_scanner.kill_tree(pid, self.self_pid).await {
                tracing::warn!(error = %err, "failed to kill process tree");
            }
        }
        Ok(())
    }

    async fn dispatch_toggle(&self, job: Job) -> Result<(), EngineError> {
        let flipped = {
            let mut store = self.store.lock();
            let Some(mut existing) = store.jobs().find(|j| **j == job).cloned() else {
                return Ok(());
            };
            existing.enabled = !existing.enabled;
            store.add_or_update_job(existing.clone());
            existing
        };
        gossip::broadcast(&self.transport, self.hmac_key.as_deref(), &Message::Job(flipped)).await
    }
}

fn format_log_line(job: &Job, at: DateTime<Utc>) -> String {
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
#[path = "processor_tests.rs"]
mod tests;
