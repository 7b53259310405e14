// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use async_trait::async_trait;
use fc_core::{CronPattern, FakeClock, NodeStatus};
use fc_platform::PlatformError;
use fc_transport::UdpTransport;
use std::net::Ipv4Addr;

struct FakeProcessScanner {
    matches: bool,
}

#[async_trait]
impl ProcessScanner for FakeProcessScanner {
    async fn find_pid_by_command(&self, _command: &str) -> Option<u32> {
        None
    }

    async fn matches(&self, _pid: u32, _command: &str) -> bool {
        self.matches
    }

    async fn kill_tree(&self, pid: u32, self_pid: u32) -> Result<(), PlatformError> {
        if pid == self_pid {
            return Err(PlatformError::KillSelf(pid));
        }
        Ok(())
    }
}

const SELF_IP: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 1);
const GROUP_UUID: &str = "11111111-1111-1111-1111-111111111111";

async fn new_processor(matches: bool) -> Processor<FakeProcessScanner, FakeClock> {
    let store = Arc::new(Mutex::new(ClusterStore::new(None)));
    let transport = Arc::new(UdpTransport::bind(0).await.unwrap());
    Processor::new(
        store,
        transport,
        None,
        Arc::new(FakeProcessScanner { matches }),
        FakeClock::new(),
        SELF_IP,
        std::process::id(),
        None,
    )
}

fn one_datagram(msg: &Message) -> Vec<u8> {
    let buf = fc_wire::dump(msg, None).unwrap();
    let packets = fc_wire::fragment(GROUP_UUID, &buf);
    assert_eq!(packets.len(), 1, "test fixture must fit in a single fragment");
    packets[0].encode().to_vec()
}

fn sample_job() -> Job {
    let mut job = Job::new(CronPattern::parse("* * * * *").unwrap(), "true");
    job.assigned_to = Some(SELF_IP);
    job
}

#[tokio::test]
async fn status_message_updates_the_store() {
    let processor = new_processor(false).await;
    let status = NodeStatus::new(SELF_IP, 1.5, Utc::now());
    let datagram = one_datagram(&Message::Status(status));

    processor.accept_datagram(&datagram).await.unwrap();

    assert_eq!(processor.store.lock().current(&SELF_IP).unwrap().load, 1.5);
}

#[tokio::test]
async fn job_upsert_adds_a_new_job() {
    let processor = new_processor(false).await;
    let datagram = one_datagram(&Message::Job(sample_job()));

    processor.accept_datagram(&datagram).await.unwrap();

    assert_eq!(processor.store.lock().job_count(), 1);
}

#[tokio::test]
async fn job_upsert_merges_result_fields_into_an_existing_equal_job() {
    let processor = new_processor(false).await;
    processor.store.lock().add_or_update_job(sample_job());

    let mut updated = sample_job();
    updated.last_exit_code = Some(7);
    let datagram = one_datagram(&Message::Job(updated));
    processor.accept_datagram(&datagram).await.unwrap();

    let store = processor.store.lock();
    assert_eq!(store.job_count(), 1);
    assert_eq!(store.jobs().next().unwrap().last_exit_code, Some(7));
}

#[tokio::test]
async fn job_tombstone_removes_it_from_the_store() {
    let processor = new_processor(false).await;
    processor.store.lock().add_or_update_job(sample_job());

    let mut tombstone = sample_job();
    tombstone.remove = true;
    let datagram = one_datagram(&Message::Job(tombstone));
    processor.accept_datagram(&datagram).await.unwrap();

    assert_eq!(processor.store.lock().job_count(), 0);
}

#[tokio::test]
async fn kill_refuses_to_target_this_nodes_own_pid() {
    let processor = new_processor(true).await;
    let self_pid = std::process::id();

    processor.dispatch_kill(sample_job(), Some(self_pid)).await.unwrap();
    // No assertion beyond "did not panic and returned Ok": the fake scanner
    // would otherwise report a kill, but the self-pid guard short-circuits
    // before ever calling it.
}

#[tokio::test]
async fn kill_on_a_non_owned_job_is_a_no_op() {
    let processor = new_processor(true).await;
    let mut job = sample_job();
    job.assigned_to = Some(Ipv4Addr::new(10, 0, 0, 9));

    processor.dispatch_kill(job, Some(4242)).await.unwrap();
}

#[tokio::test]
async fn toggle_flips_enabled_on_the_matching_job() {
    let processor = new_processor(false).await;
    processor.store.lock().add_or_update_job(sample_job());

    processor.dispatch_toggle(sample_job()).await.unwrap();

    assert!(!processor.store.lock().jobs().next().unwrap().enabled);
}

#[tokio::test]
async fn toggle_on_an_unknown_job_is_a_no_op() {
    let processor = new_processor(false).await;
    processor.dispatch_toggle(sample_job()).await.unwrap();
    assert_eq!(processor.store.lock().job_count(), 0);
}

#[tokio::test]
async fn run_on_an_owned_job_records_the_result_in_the_store() {
    let processor = new_processor(false).await;
    let mut job = sample_job();
    job.command = "true".to_string();

    processor.dispatch_run(job).await.unwrap();

    let store = processor.store.lock();
    let recorded = store.jobs().next().unwrap();
    assert_eq!(recorded.last_exit_code, Some(0));
    assert!(recorded.last_run.is_some());
}

#[tokio::test]
async fn run_on_a_job_not_owned_by_this_node_does_nothing() {
    let processor = new_processor(false).await;
    let mut job = sample_job();
    job.assigned_to = Some(Ipv4Addr::new(10, 0, 0, 9));

    processor.dispatch_run(job).await.unwrap();

    assert_eq!(processor.store.lock().job_count(), 0);
}
