// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::net::Ipv4Addr;
use std::sync::Arc;

use fc_storage::ClusterStore;
use fc_transport::UdpTransport;
use fc_wire::Message;
use parking_lot::Mutex;

use crate::error::WebError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Mutex<ClusterStore>>,
    pub transport: Arc<UdpTransport>,
    pub hmac_key: Option<Vec<u8>>,
    pub default_user: Option<String>,
    pub self_ip: Ipv4Addr,
}

impl AppState {
    pub fn new(
        store: Arc<Mutex<ClusterStore>>,
        transport: Arc<UdpTransport>,
        hmac_key: Option<Vec<u8>>,
        default_user: Option<String>,
        self_ip: Ipv4Addr,
    ) -> Self {
        AppState { store, transport, hmac_key, default_user, self_ip }
    }

    pub async fn broadcast(&self, msg: &Message) -> Result<(), WebError> {
        fc_engine::gossip::broadcast(&self.transport, self.hmac_key.as_deref(), msg).await?;
        Ok(())
    }

    pub fn crontab_user(&self) -> String {
        self.default_user.clone().unwrap_or_else(|| "root".to_string())
    }
}
