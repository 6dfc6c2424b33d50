// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/miner/thread.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file runs the nonce search on a dedicated OS thread, separate from
// the tokio runtime driving the session manager and coordinator. It pulls
// the current WorkTemplate from an ArcSwap, runs 10,000-nonce batches
// against it, and publishes found shares through a single-slot channel.
//
// Tree Location:
// - src/miner/thread.rs (search thread wrapper)
// - Depends on: arc-swap, core::types, miner::search

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arc_swap::ArcSwap;
use tracing::info;

use crate::core::types::{FoundShare, WorkTemplate};
use crate::miner::search::{search, SearchOutcome};

const BATCH_SIZE: u32 = 10_000;

/// Handle the control context keeps to talk to the running search thread.
pub struct SearchHandle {
    pub template: Arc<ArcSwap<WorkTemplate>>,
    pub found_share: Arc<Mutex<Option<FoundShare>>>,
    pub hashes_this_batch: Arc<AtomicU64>,
    active: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl SearchHandle {
    pub fn stop(&mut self) {
        self.active.store(false, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            let _ = handle.join();
        }
    }

    /// Total hashes computed since the thread started, for hashrate
    /// calculation by the caller.
    pub fn hashes_total(&self) -> u64 {
        self.hashes_this_batch.load(Ordering::Relaxed)
    }
}

impl Drop for SearchHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Spawns the dedicated search thread and returns a handle to it. The
/// thread starts with an empty template (never matches anything) until
/// the coordinator publishes the first real job.
pub fn spawn() -> SearchHandle {
    let template = Arc::new(ArcSwap::from_pointee(WorkTemplate::empty()));
    let found_share: Arc<Mutex<Option<FoundShare>>> = Arc::new(Mutex::new(None));
    let hashes_this_batch = Arc::new(AtomicU64::new(0));
    let active = Arc::new(AtomicBool::new(true));

    let template_clone = Arc::clone(&template);
    let found_share_clone = Arc::clone(&found_share);
    let hashes_clone = Arc::clone(&hashes_this_batch);
    let active_clone = Arc::clone(&active);

    let join_handle = std::thread::spawn(move || {
        run(template_clone, found_share_clone, hashes_clone, active_clone);
    });

    SearchHandle {
        template,
        found_share,
        hashes_this_batch,
        active,
        join_handle: Some(join_handle),
    }
}

fn run(
    template: Arc<ArcSwap<WorkTemplate>>,
    found_share: Arc<Mutex<Option<FoundShare>>>,
    hashes_this_batch: Arc<AtomicU64>,
    active: Arc<AtomicBool>,
) {
    let mut nonce = 0u32;
    let mut last_job_id = String::new();

    while active.load(Ordering::Relaxed) {
        let current = template.load();
        if current.job_id.is_empty() {
            std::thread::sleep(Duration::from_millis(100));
            continue;
        }
        if current.job_id != last_job_id {
            // fresh job: start the nonce scan over from the beginning
            nonce = 0;
            last_job_id = current.job_id.clone();
        }

        let mut header = current.header_template;
        let outcome = search(&mut header, nonce, BATCH_SIZE, &current.target);

        match outcome {
            SearchOutcome::Found { nonce: found_nonce, hashes_done } => {
                hashes_this_batch.fetch_add(hashes_done as u64, Ordering::Relaxed);
                info!(job_id = %current.job_id, nonce = found_nonce, "share found");
                let mut slot = found_share.lock().unwrap();
                *slot = Some(FoundShare {
                    job_id: current.job_id.clone(),
                    extranonce2: current.extranonce2.clone(),
                    ntime: current.ntime,
                    nonce: found_nonce,
                    generation: current.generation,
                });
                nonce = found_nonce.wrapping_add(1);
            }
            SearchOutcome::Exhausted { hashes_done } => {
                hashes_this_batch.fetch_add(hashes_done as u64, Ordering::Relaxed);
                nonce = nonce.wrapping_add(hashes_done);
            }
        }
    }
}


// Changelog:
// - v1.0.0 (2026-07-27): A single dedicated thread reading an
//   ArcSwap<WorkTemplate> and writing into a single-slot
//   Mutex<Option<FoundShare>>, instead of a broadcast job channel,
//   per-thread random nonce starts, and an unbounded share channel
//   feeding N worker threads. Batch size (10,000) matches the original
//   firmware's NONCES_PER_BATCH.
