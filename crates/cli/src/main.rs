// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fleetcrond: wires the transport, store, message processor, executor,
//! periodic loops, and web surface into one running node.

mod args;
mod logging;

use std::net::Ipv4Addr;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use fc_core::SystemClock;
use fc_engine::{Executor, PeriodicLoops, Processor};
use fc_platform::{IpDiscovery, NtpCheck, SntpCheck, SysinfoLoadSampler, SysinfoProcessScanner, UdpConnectIpDiscovery};
use fc_storage::ClusterStore;
use fc_transport::{DatagramQueue, UdpTransport};
use parking_lot::Mutex;

const MAX_NTP_SKEW_MILLIS: i64 = 60_000;
const HMAC_KEY_ENV: &str = "FLEETCRON_HMAC_KEY";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = args::Args::parse();
    logging::init(args.log_file.as_deref(), args.verbose)?;

    let ntp = SntpCheck;
    match ntp.skew_millis(&args.ntp_server).await {
        Ok(skew) if skew.abs() > MAX_NTP_SKEW_MILLIS => {
            tracing::error!(skew_ms = skew, server = %args.ntp_server, "clock skew exceeds startup threshold");
            process::exit(1);
        }
        Ok(skew) => tracing::info!(skew_ms = skew, "ntp skew check passed"),
        Err(err) => tracing::warn!(error = %err, "ntp skew check failed, continuing without it"),
    }

    let self_ip = UdpConnectIpDiscovery.local_ipv4().await.unwrap_or(Ipv4Addr::LOCALHOST);
    let self_pid = process::id();
    tracing::info!(%self_ip, self_pid, "node identity resolved");

    let hmac_key = std::env::var(HMAC_KEY_ENV).ok().map(String::into_bytes);

    let mut store = ClusterStore::new(args.storage_path.clone());
    if let Err(err) = store.load() {
        tracing::warn!(error = %err, "failed to load cluster snapshot, starting empty");
    }
    let store = Arc::new(Mutex::new(store));

    let transport = Arc::new(
        UdpTransport::bind(args.communication_port)
            .await
            .with_context(|| format!("failed to bind udp port {}", args.communication_port))?,
    );
    let queue = Arc::new(DatagramQueue::default());
    transport.spawn_recv_loop(queue.clone());

    let processor = Arc::new(Processor::new(
        store.clone(),
        transport.clone(),
        hmac_key.clone(),
        Arc::new(SysinfoProcessScanner),
        SystemClock,
        self_ip,
        self_pid,
        None,
    ));
    tokio::spawn({
        let processor = processor.clone();
        let queue = queue.clone();
        async move {
            loop {
                let datagram = queue.recv().await;
                if let Err(err) = processor.accept_datagram(&datagram).await {
                    tracing::warn!(error = %err, "failed to process inbound datagram");
                }
            }
        }
    });

    let executor = Arc::new(Executor::new(
        store.clone(),
        transport.clone(),
        hmac_key.clone(),
        Arc::new(SysinfoProcessScanner),
        Arc::new(SysinfoLoadSampler),
        SystemClock,
        self_ip,
    ));
    executor.run_reboot_jobs().await;

    tokio::spawn({
        let executor = executor.clone();
        async move {
            let mut interval = tokio::time::interval(fc_engine::executor::HEARTBEAT_INTERVAL);
            loop {
                interval.tick().await;
                executor.heartbeat().await;
            }
        }
    });
    tokio::spawn({
        let executor = executor.clone();
        async move {
            let mut interval = tokio::time::interval(fc_engine::executor::TICK_INTERVAL);
            loop {
                interval.tick().await;
                executor.tick().await;
            }
        }
    });

    let loops = Arc::new(PeriodicLoops::new(
        store.clone(),
        transport.clone(),
        hmac_key.clone(),
        SystemClock,
        chrono::Duration::seconds(args.node_staleness),
    ));
    tokio::spawn({
        let loops = loops.clone();
        async move {
            let mut interval = tokio::time::interval(fc_engine::loops::REBALANCE_CHECK_INTERVAL);
            loop {
                interval.tick().await;
                loops.rebalance_check().await;
            }
        }
    });
    if args.storage_path.is_some() {
        tokio::spawn({
            let loops = loops.clone();
            async move {
                let mut interval = tokio::time::interval(fc_engine::loops::SNAPSHOT_INTERVAL);
                loop {
                    interval.tick().await;
                    loops.snapshot().await;
                }
            }
        });
    }

    let web_state = fc_web::AppState::new(store.clone(), transport.clone(), hmac_key, None, self_ip);
    let app = fc_web::router(web_state);
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", args.web_port))
        .await
        .with_context(|| format!("failed to bind web port {}", args.web_port))?;
    tracing::info!(port = args.web_port, "web surface listening");

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result.context("web server exited")?;
        }
        _ = &mut ctrl_c => {
            tracing::info!("received shutdown signal, saving final snapshot");
        }
    }

    if let Err(err) = store.lock().save() {
        tracing::warn!(error = %err, "failed to save final cluster snapshot");
    }

    Ok(())
}
