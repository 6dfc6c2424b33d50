// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/miner/coordinator.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file owns the miner's lifecycle: connecting and handshaking with
// the pool, publishing new work to the search thread, submitting found
// shares, and reconnecting when the link drops. It's the only place that
// decides the miner's externally visible MinerState.
//
// Tree Location:
// - src/miner/coordinator.rs (mining coordinator)
// - Depends on: core, miner::thread, miner::stats, pool::session, tokio

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::core::assembler::assemble;
use crate::core::types::{Args, MinerState};
use crate::error::{Error, Result};
use crate::miner::stats::MinerStats;
use crate::miner::thread::{self, SearchHandle};
use crate::pool::session::{SessionEvent, SessionManager};

const MAX_RECONNECT_ATTEMPTS: u32 = 3;
const RECONNECT_DELAY: Duration = Duration::from_secs(3);

pub struct Coordinator {
    args: Args,
    session: SessionManager,
    search: SearchHandle,
    pub stats: Arc<MinerStats>,
    state: MinerState,
    manually_stopped: bool,
    /// Bumped every time a job is assembled into a WorkTemplate.
    generation: u64,
    /// Shares tagged with a generation below this are discarded; only
    /// moves forward when a clean-jobs notify arrives.
    valid_since_generation: u64,
}

impl Coordinator {
    pub fn new(args: Args) -> Self {
        Self {
            args,
            session: SessionManager::new(),
            search: thread::spawn(),
            stats: Arc::new(MinerStats::new()),
            state: MinerState::Stopped,
            manually_stopped: false,
            generation: 0,
            valid_since_generation: 0,
        }
    }

    pub fn state(&self) -> &MinerState {
        &self.state
    }

    pub fn is_manually_stopped(&self) -> bool {
        self.manually_stopped
    }

    pub fn set_manually_stopped(&mut self, stopped: bool) {
        self.manually_stopped = stopped;
    }

    pub fn stats(&self) -> crate::core::types::Stats {
        self.stats.snapshot()
    }

    /// Connects, subscribes, and authorizes. Retries up to
    /// `MAX_RECONNECT_ATTEMPTS` times with a fixed delay between tries.
    async fn connect_and_handshake(&mut self) -> Result<()> {
        let mut last_err = None;
        for attempt in 1..=MAX_RECONNECT_ATTEMPTS {
            match self.try_handshake().await {
                Ok(()) => return Ok(()),
                Err(err) => {
                    warn!(attempt, error = %err, "pool handshake failed");
                    last_err = Some(err);
                    if attempt < MAX_RECONNECT_ATTEMPTS {
                        sleep(RECONNECT_DELAY).await;
                    }
                }
            }
        }
        Err(last_err.unwrap_or_else(|| Error::Link("handshake failed".to_string())))
    }

    async fn try_handshake(&mut self) -> Result<()> {
        self.session.connect(&self.args.pool).await?;
        self.session.subscribe().await?;
        let login = self.args.worker_login();
        let authorized = self.session.authorize(&login, &self.args.password).await?;
        if !authorized {
            return Err(Error::Config(format!("pool rejected login for '{login}'")));
        }
        self.stats.set_pool_connected(true);
        Ok(())
    }

    /// Starts mining: handshakes with the pool and transitions to
    /// `Mining` on success, `Error` on failure.
    pub async fn start(&mut self) -> Result<()> {
        self.manually_stopped = false;
        self.state = MinerState::Connecting;
        self.stats.set_state(self.state.clone());

        match self.connect_and_handshake().await {
            Ok(()) => {
                self.state = MinerState::Mining;
                self.stats.set_state(self.state.clone());
                info!("mining started");
                Ok(())
            }
            Err(err) => {
                self.state = MinerState::Error(err.to_string());
                self.stats.set_state(self.state.clone());
                Err(err)
            }
        }
    }

    /// Stops mining and marks the stop as user-initiated, so `tick()`
    /// won't try to reconnect.
    pub fn stop(&mut self) {
        self.manually_stopped = true;
        self.state = MinerState::Stopped;
        self.stats.set_state(self.state.clone());
        self.stats.set_pool_connected(false);
    }

    /// One control-loop iteration: drains pool events, publishes new
    /// work, submits any found share, and refreshes hashrate stats.
    /// Reconnects automatically on link loss unless `stop()` was called.
    pub async fn tick(&mut self) -> Result<()> {
        if self.manually_stopped {
            return Ok(());
        }

        match self.session.poll() {
            Ok(events) => {
                for event in events {
                    self.handle_event(event).await?;
                }
            }
            Err(err) => {
                warn!(error = %err, "pool link lost");
                self.stats.set_pool_connected(false);
                self.state = MinerState::Connecting;
                self.stats.set_state(self.state.clone());
                if let Err(reconnect_err) = self.connect_and_handshake().await {
                    self.state = MinerState::Error(reconnect_err.to_string());
                    self.stats.set_state(self.state.clone());
                    return Err(reconnect_err);
                }
                self.state = MinerState::Mining;
                self.stats.set_state(self.state.clone());
            }
        }

        self.check_found_share().await?;
        self.stats.update_hashrate(self.search.hashes_total());
        Ok(())
    }

    async fn handle_event(&mut self, event: SessionEvent) -> Result<()> {
        match event {
            SessionEvent::NewJob(job) => {
                self.generation += 1;
                if job.clean {
                    self.valid_since_generation = self.generation;
                }
                let template = assemble(&job, &mut self.session.session, self.generation)?;
                self.search.template.store(Arc::new(template));
            }
            SessionEvent::DifficultyChanged(difficulty) => {
                self.stats.set_current_difficulty(difficulty);
            }
            SessionEvent::ShareResult {
                accepted,
                job_id,
                generation,
            } => {
                self.stats.record_share_result(accepted);
                debug!(accepted, job_id = %job_id, generation, "share result");
            }
        }
        Ok(())
    }

    async fn check_found_share(&mut self) -> Result<()> {
        let share = {
            let mut slot = self.search.found_share.lock().unwrap();
            slot.take()
        };
        let Some(share) = share else {
            return Ok(());
        };

        if share.generation < self.valid_since_generation {
            debug!(job_id = %share.job_id, "discarding stale share after clean-jobs");
            return Ok(());
        }

        self.stats.record_share_found();
        let login = self.args.worker_login();
        self.session
            .submit(
                &login,
                &share.job_id,
                &share.extranonce2,
                share.ntime,
                share.nonce,
                share.generation,
            )
            .await?;
        Ok(())
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.search.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Job;

    fn sample_args() -> Args {
        Args {
            wallet: "bc1qexample".to_string(),
            pool: "127.0.0.1:1".to_string(),
            password: "x".to_string(),
            worker_suffix: None,
            poll_interval_ms: 100,
            log_level: "info".to_string(),
        }
    }

    #[tokio::test]
    async fn new_coordinator_starts_stopped() {
        let coordinator = Coordinator::new(sample_args());
        assert_eq!(*coordinator.state(), MinerState::Stopped);
        assert!(!coordinator.is_manually_stopped());
    }

    #[tokio::test]
    async fn stop_sets_manually_stopped_latch() {
        let mut coordinator = Coordinator::new(sample_args());
        coordinator.stop();
        assert!(coordinator.is_manually_stopped());
        assert_eq!(*coordinator.state(), MinerState::Stopped);
    }

    #[tokio::test]
    async fn clean_job_bumps_valid_since_generation() {
        let mut coordinator = Coordinator::new(sample_args());
        let job = Job {
            job_id: "job1".to_string(),
            prev_hash: [0u8; 32],
            coinbase_prefix: vec![0x01],
            coinbase_suffix: vec![0x02],
            merkle_branch: Vec::new(),
            version: 1,
            nbits: 0x1d00ffff,
            ntime: 0,
            clean: true,
        };
        coordinator.handle_event(SessionEvent::NewJob(job)).await.unwrap();
        assert_eq!(coordinator.generation, 1);
        assert_eq!(coordinator.valid_since_generation, 1);
    }

    #[tokio::test]
    async fn non_clean_job_does_not_bump_validity_floor() {
        let mut coordinator = Coordinator::new(sample_args());
        let job = Job {
            job_id: "job1".to_string(),
            prev_hash: [0u8; 32],
            coinbase_prefix: vec![0x01],
            coinbase_suffix: vec![0x02],
            merkle_branch: Vec::new(),
            version: 1,
            nbits: 0x1d00ffff,
            ntime: 0,
            clean: false,
        };
        coordinator.handle_event(SessionEvent::NewJob(job)).await.unwrap();
        assert_eq!(coordinator.generation, 1);
        assert_eq!(coordinator.valid_since_generation, 0);
    }
}

// Changelog:
// - v1.0.0 (2026-07-27): A Coordinator matching the original firmware's
//   MiningManager state machine (Stopped/Connecting/Mining/Error,
//   start/stop/process), reimplemented in tokio-idiomatic async/await
//   instead of FreeRTOS tasks, in place of a broadcast job channel
//   feeding N worker threads with id-range-based share response routing.
//   Reconnect policy (3 attempts, 3s delay) replaces the firmware's
//   busy-wait connect loop with connect_and_handshake() using the
//   session manager's own timeouts.
