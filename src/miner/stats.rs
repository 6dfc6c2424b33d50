// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/miner/stats.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file tracks the miner-wide counters a UI or log line would want:
// hashrate, hashes computed, shares found/accepted/rejected, uptime, and
// lifecycle state. Everything here is readable without locking the
// mining loop.
//
// Tree Location:
// - src/miner/stats.rs (miner-wide statistics)
// - Depends on: std, core::types

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

use crate::core::types::{MinerState, MinerStateTag, Stats};

pub struct MinerStats {
    pub hashes_total: AtomicU64,
    pub shares_found: AtomicU64,
    pub shares_accepted: AtomicU64,
    pub shares_rejected: AtomicU64,
    start_time: Instant,
    pool_connected: AtomicBool,
    state: Mutex<MinerState>,
    current_difficulty: Mutex<f64>,
    last_hashrate_sample: Mutex<(Instant, u64)>,
    hashrate_hps: Mutex<f64>,
}

impl MinerStats {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            hashes_total: AtomicU64::new(0),
            shares_found: AtomicU64::new(0),
            shares_accepted: AtomicU64::new(0),
            shares_rejected: AtomicU64::new(0),
            start_time: now,
            pool_connected: AtomicBool::new(false),
            state: Mutex::new(MinerState::Stopped),
            current_difficulty: Mutex::new(1.0),
            last_hashrate_sample: Mutex::new((now, 0)),
            hashrate_hps: Mutex::new(0.0),
        }
    }

    pub fn set_pool_connected(&self, connected: bool) {
        self.pool_connected.store(connected, Ordering::Relaxed);
    }

    pub fn set_state(&self, state: MinerState) {
        *self.state.lock().unwrap() = state;
    }

    pub fn set_current_difficulty(&self, difficulty: f64) {
        *self.current_difficulty.lock().unwrap() = difficulty;
    }

    pub fn record_share_found(&self) {
        self.shares_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_share_result(&self, accepted: bool) {
        if accepted {
            self.shares_accepted.fetch_add(1, Ordering::Relaxed);
        } else {
            self.shares_rejected.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Folds `hashes_now` (the search thread's running total) into the
    /// hashrate EWMA. Call this roughly once per coordinator tick.
    pub fn update_hashrate(&self, hashes_now: u64) {
        self.hashes_total.store(hashes_now, Ordering::Relaxed);

        let mut sample = self.last_hashrate_sample.lock().unwrap();
        let (last_time, last_hashes) = *sample;
        let elapsed = last_time.elapsed().as_secs_f64();
        if elapsed < 0.25 {
            return;
        }

        let delta = hashes_now.saturating_sub(last_hashes);
        let instantaneous = delta as f64 / elapsed;

        let mut hashrate = self.hashrate_hps.lock().unwrap();
        // exponential moving average; smooths out batch-boundary jitter
        *hashrate = if *hashrate == 0.0 {
            instantaneous
        } else {
            0.8 * *hashrate + 0.2 * instantaneous
        };

        *sample = (Instant::now(), hashes_now);
    }

    pub fn snapshot(&self) -> Stats {
        let state = self.state.lock().unwrap();
        let error_message = match &*state {
            MinerState::Error(msg) => Some(msg.clone()),
            _ => None,
        };
        Stats {
            hashrate_hps: *self.hashrate_hps.lock().unwrap(),
            hashes_total: self.hashes_total.load(Ordering::Relaxed),
            shares_found: self.shares_found.load(Ordering::Relaxed),
            shares_accepted: self.shares_accepted.load(Ordering::Relaxed),
            shares_rejected: self.shares_rejected.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            pool_connected: self.pool_connected.load(Ordering::Relaxed),
            state: MinerStateTag::from(&*state),
            error_message,
            current_difficulty: *self.current_difficulty.lock().unwrap(),
        }
    }
}

impl Default for MinerStats {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    #[test]
    fn snapshot_reflects_recorded_shares() {
        let stats = MinerStats::new();
        stats.record_share_found();
        stats.record_share_result(true);
        stats.record_share_result(false);

        let snap = stats.snapshot();
        assert_eq!(snap.shares_found, 1);
        assert_eq!(snap.shares_accepted, 1);
        assert_eq!(snap.shares_rejected, 1);
    }

    #[test]
    fn hashrate_updates_after_enough_elapsed_time() {
        let stats = MinerStats::new();
        sleep(Duration::from_millis(300));
        stats.update_hashrate(10_000);
        assert!(stats.snapshot().hashrate_hps > 0.0);
    }

    #[test]
    fn error_state_surfaces_error_message() {
        let stats = MinerStats::new();
        stats.set_state(MinerState::Error("pool disconnected".to_string()));
        let snap = stats.snapshot();
        assert_eq!(snap.error_message.as_deref(), Some("pool disconnected"));
    }
}

// Changelog:
// - v1.0.0 (2026-07-27): A flat counter struct producing a
//   core::types::Stats snapshot, since this miner has one search thread,
//   not a worker pool, and no TUI/dashboard consumer — dropping the
//   per-thread stats vector and history deques a dashboard needs. Keeps
//   the AtomicU64-counters-plus-Instant pattern and the
//   hashrate-by-delta-over-elapsed-time approach.
