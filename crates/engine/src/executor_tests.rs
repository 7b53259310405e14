// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use fc_core::CronPattern;
use fc_platform::{FakeLoadSampler, PlatformError};
use fc_transport::UdpTransport;

struct FakeProcessScanner;

#[async_trait]
impl ProcessScanner for FakeProcessScanner {
    async fn find_pid_by_command(&self, _command: &str) -> Option<u32> {
        Some(4242)
    }

    async fn matches(&self, _pid: u32, _command: &str) -> bool {
        true
    }

    async fn kill_tree(&self, _pid: u32, _self_pid: u32) -> Result<(), PlatformError> {
        Ok(())
    }
}

const SELF_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);

async fn new_executor() -> (Executor<FakeProcessScanner, FakeLoadSampler, fc_core::FakeClock>, Arc<Mutex<ClusterStore>>)
{
    let store = Arc::new(Mutex::new(ClusterStore::new(None)));
    let transport = Arc::new(UdpTransport::bind(0).await.unwrap());
    let executor = Executor::new(
        store.clone(),
        transport,
        None,
        Arc::new(FakeProcessScanner),
        Arc::new(FakeLoadSampler(0.5)),
        fc_core::FakeClock::new(),
        SELF_IP,
    );
    (executor, store)
}

fn always_due_job() -> Job {
    let mut job = Job::new(CronPattern::parse("* * * * *").unwrap(), "true");
    job.assigned_to = Some(SELF_IP);
    job
}

#[tokio::test]
async fn heartbeat_samples_pid_for_owned_jobs_and_updates_the_store() {
    let (executor, store) = new_executor().await;
    store.lock().add_or_update_job(always_due_job());

    executor.heartbeat().await;

    assert_eq!(store.lock().jobs().next().unwrap().pid, Some(4242));
}

#[tokio::test]
async fn tick_launches_a_due_owned_enabled_job() {
    let (executor, store) = new_executor().await;
    store.lock().add_or_update_job(always_due_job());

    executor.tick().await;

    let recorded = store.lock();
    let job = recorded.jobs().next().unwrap();
    assert_eq!(job.last_exit_code, Some(0));
    assert!(job.last_run.is_some());
}

#[tokio::test]
async fn tick_does_not_relaunch_a_job_already_run_for_the_current_minute() {
    let (executor, store) = new_executor().await;
    store.lock().add_or_update_job(always_due_job());

    executor.tick().await;
    let first_run = store.lock().jobs().next().unwrap().last_run;

    executor.tick().await;
    let second_run = store.lock().jobs().next().unwrap().last_run;

    assert_eq!(first_run, second_run);
}

#[tokio::test]
async fn tick_skips_a_disabled_job() {
    let (executor, store) = new_executor().await;
    let mut job = always_due_job();
    job.enabled = false;
    store.lock().add_or_update_job(job);

    executor.tick().await;

    assert!(store.lock().jobs().next().unwrap().last_run.is_none());
}

#[tokio::test]
async fn tick_never_fires_a_reboot_job() {
    let (executor, store) = new_executor().await;
    let mut job = always_due_job();
    job.pattern = CronPattern::parse("@reboot").unwrap();
    store.lock().add_or_update_job(job);

    executor.tick().await;

    assert!(store.lock().jobs().next().unwrap().last_run.is_none());
}

#[tokio::test]
async fn run_reboot_jobs_fires_owned_reboot_jobs_once() {
    let (executor, store) = new_executor().await;
    let mut job = always_due_job();
    job.pattern = CronPattern::parse("@reboot").unwrap();
    store.lock().add_or_update_job(job);

    executor.run_reboot_jobs().await;

    assert!(store.lock().jobs().next().unwrap().last_run.is_some());
}

#[tokio::test]
async fn tick_ignores_jobs_not_owned_by_this_node() {
    let (executor, store) = new_executor().await;
    let mut job = always_due_job();
    job.assigned_to = Some(Ipv4Addr::new(10, 0, 0, 9));
    store.lock().add_or_update_job(job);

    executor.tick().await;

    assert!(store.lock().jobs().next().unwrap().last_run.is_none());
}
