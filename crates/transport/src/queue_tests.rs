// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::sync::Arc;

#[tokio::test]
async fn recv_returns_items_in_fifo_order() {
    let queue = DatagramQueue::new(10);
    queue.push(vec![1]);
    queue.push(vec![2]);
    assert_eq!(queue.recv().await, vec![1]);
    assert_eq!(queue.recv().await, vec![2]);
}

#[test]
fn push_past_capacity_drops_the_oldest() {
    let queue = DatagramQueue::new(2);
    queue.push(vec![1]);
    queue.push(vec![2]);
    queue.push(vec![3]);
    assert_eq!(queue.len(), 2);
    let remaining: Vec<Vec<u8>> = queue.inner.lock().iter().cloned().collect();
    assert_eq!(remaining, vec![vec![2], vec![3]]);
}

#[tokio::test]
async fn recv_waits_for_a_push() {
    let queue = Arc::new(DatagramQueue::new(4));
    let waiter = {
        let queue = Arc::clone(&queue);
        tokio::spawn(async move { queue.recv().await })
    };
    tokio::task::yield_now().await;
    queue.push(vec![42]);
    let got = waiter.await.unwrap();
    assert_eq!(got, vec![42]);
}
