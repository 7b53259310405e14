// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! fc-platform: narrow interfaces over the operating system (load average,
//! process table, outward IP, NTP skew) so the rest of the cluster can be
//! driven by fakes in tests.

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod error;
pub mod ip;
pub mod load;
pub mod ntp;
pub mod process;

pub use error::PlatformError;
pub use ip::{FakeIpDiscovery, IpDiscovery, UdpConnectIpDiscovery};
pub use load::{FakeLoadSampler, LoadSampler, SysinfoLoadSampler};
pub use ntp::{FixedSkewNtpCheck, NtpCheck, SntpCheck};
pub use process::{ProcessScanner, SysinfoProcessScanner};
