// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[tokio::test]
async fn fake_discovery_returns_its_fixed_address() {
    let discovery = FakeIpDiscovery(Ipv4Addr::new(10, 0, 0, 7));
    assert_eq!(discovery.local_ipv4().await.unwrap(), Ipv4Addr::new(10, 0, 0, 7));
}

#[tokio::test]
async fn real_discovery_returns_some_address() {
    let discovery = UdpConnectIpDiscovery;
    assert!(discovery.local_ipv4().await.is_ok());
}
