// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded FIFO of raw datagrams between the UDP receive loop and the
//! message processor. A full queue drops the oldest undelivered datagram
//! with a warning rather than blocking the receiver.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::Notify;

/// Soft cap recommended for a processor queue: large enough to absorb a
/// burst, small enough that a stuck processor doesn't grow unbounded.
pub const DEFAULT_CAPACITY: usize = 10_000;

pub struct DatagramQueue {
    inner: Mutex<VecDeque<Vec<u8>>>,
    notify: Notify,
    capacity: usize,
}

impl DatagramQueue {
    pub fn new(capacity: usize) -> Self {
        DatagramQueue {
            inner: Mutex::new(VecDeque::new()),
            notify: Notify::new(),
            capacity,
        }
    }

    /// Push a datagram, dropping the oldest queued one if at capacity.
    pub fn push(&self, datagram: Vec<u8>) {
        {
            let mut guard = self.inner.lock();
            if guard.len() >= self.capacity {
                guard.pop_front();
                tracing::warn!(capacity = self.capacity, "datagram queue full, dropped oldest");
            }
            guard.push_back(datagram);
        }
        self.notify.notify_one();
    }

    /// Wait for and pop the oldest queued datagram.
    pub async fn recv(&self) -> Vec<u8> {
        loop {
            if let Some(datagram) = self.inner.lock().pop_front() {
                return datagram;
            }
            self.notify.notified().await;
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for DatagramQueue {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
