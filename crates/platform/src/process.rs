// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Process-table scanning (find a job's pid by matching its command line)
//! and process-tree termination, kept behind a trait so tests substitute a
//! fake table instead of touching the real OS process list.

use async_trait::async_trait;
use sysinfo::{Pid, Signal, System};

use crate::error::PlatformError;

#[async_trait]
pub trait ProcessScanner: Send + Sync {
    /// Find a pid whose command line contains `command`, if any is alive.
    async fn find_pid_by_command(&self, command: &str) -> Option<u32>;

    /// Is `pid` alive and does its command line still contain `command`?
    async fn matches(&self, pid: u32, command: &str) -> bool;

    /// Send SIGTERM to `pid` and every descendant. Refuses to kill
    /// `self_pid` (this node's own process).
    async fn kill_tree(&self, pid: u32, self_pid: u32) -> Result<(), PlatformError>;
}

/// Real scanner backed by `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProcessScanner;

fn cmdline_contains(system: &System, pid: Pid, needle: &str) -> bool {
    system
        .process(pid)
        .map(|p| p.cmd().iter().map(|s| s.to_string_lossy()).collect::<Vec<_>>().join(" "))
        .is_some_and(|line| line.contains(needle))
}

fn descendants(system: &System, root: Pid) -> Vec<Pid> {
    let mut found = vec![root];
    let mut frontier = vec![root];
    while let Some(parent) = frontier.pop() {
        for (pid, process) in system.processes() {
            if process.parent() == Some(parent) && !found.contains(pid) {
                found.push(*pid);
                frontier.push(*pid);
            }
        }
    }
    found
}

#[async_trait]
impl ProcessScanner for SysinfoProcessScanner {
    async fn find_pid_by_command(&self, command: &str) -> Option<u32> {
        let command = command.to_string();
        tokio::task::spawn_blocking(move || {
            let system = System::new_all();
            system
                .processes()
                .iter()
                .find(|(pid, _)| cmdline_contains(&system, **pid, &command))
                .map(|(pid, _)| pid.as_u32())
        })
        .await
        .ok()
        .flatten()
    }

    async fn matches(&self, pid: u32, command: &str) -> bool {
        let command = command.to_string();
        tokio::task::spawn_blocking(move || {
            let system = System::new_all();
            cmdline_contains(&system, Pid::from_u32(pid), &command)
        })
        .await
        .unwrap_or(false)
    }

    async fn kill_tree(&self, pid: u32, self_pid: u32) -> Result<(), PlatformError> {
        if pid == self_pid {
            return Err(PlatformError::KillSelf(pid));
        }
        tokio::task::spawn_blocking(move || {
            let system = System::new_all();
            let root = Pid::from_u32(pid);
            if system.process(root).is_none() {
                return Err(PlatformError::NoSuchProcess(pid));
            }
            for descendant in descendants(&system, root) {
                if let Some(process) = system.process(descendant) {
                    process.kill_with(Signal::Term);
                }
            }
            Ok(())
        })
        .await
        .unwrap_or(Err(PlatformError::NoSuchProcess(pid)))
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
