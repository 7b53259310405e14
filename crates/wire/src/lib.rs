// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fc-wire: the UDP wire protocol — fixed-layout datagram fragmentation
//! (packet codec) and the signed message envelope carried over it.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod envelope;
pub mod error;
pub mod message;
pub mod packet;

pub use envelope::{dump, load, LoadOutcome};
pub use error::WireError;
pub use message::Message;
pub use packet::{fragment, group, reassemble, Packet, DATA_LEN, DATAGRAM_LEN, UUID_LEN};
