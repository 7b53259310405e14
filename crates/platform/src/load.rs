// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sampling the 1-minute system load average, kept behind a trait so tests
//! substitute a fixed value instead of reading real host state.

use async_trait::async_trait;

#[async_trait]
pub trait LoadSampler: Send + Sync {
    async fn sample(&self) -> f64;
}

/// Real sampler backed by `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoLoadSampler;

#[async_trait]
impl LoadSampler for SysinfoLoadSampler {
    async fn sample(&self) -> f64 {
        tokio::task::spawn_blocking(|| sysinfo::System::load_average().one)
            .await
            .unwrap_or(0.0)
    }
}

/// Fixed-value sampler for tests.
#[derive(Debug, Clone, Copy)]
pub struct FakeLoadSampler(pub f64);

#[async_trait]
impl LoadSampler for FakeLoadSampler {
    async fn sample(&self) -> f64 {
        self.0
    }
}

#[cfg(test)]
#[path = "load_tests.rs"]
mod tests;
