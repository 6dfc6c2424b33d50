// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/core/types.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the data model shared by the session manager, work
// assembler, search engine, and coordinator: the pool-provided Job, the
// per-connection SessionState, the published WorkTemplate, the miner's
// lifecycle state, and the command-line surface.
//
// Tree Location:
// - src/core/types.rs (core data structures)
// - Depends on: clap, serde

use std::collections::HashMap;

use clap::Parser;
use serde::{Deserialize, Serialize};

/// Command-line arguments for the solo miner.
#[derive(Parser, Debug)]
#[command(
    name = "btc-solo-miner",
    author = "OIEIEIO",
    version = "1.0.0",
    about = "Solo Bitcoin CPU miner speaking Stratum v1 to a mining pool",
    long_about = "btc-solo-miner connects to a single Stratum v1 pool, assembles block \
                  header templates from the pool's job notifications, and searches the \
                  32-bit nonce space on a dedicated CPU thread.\n\n\
                  Example:\n  btc-solo-miner -u bc1qexampleaddress -o pool.example.com:3333"
)]
pub struct Args {
    /// Bitcoin address or xpub used as the pool login.
    #[arg(short = 'u', long = "wallet", value_name = "ADDRESS")]
    pub wallet: String,

    /// Pool address in host:port form.
    #[arg(short = 'o', long = "pool", value_name = "HOST:PORT")]
    pub pool: String,

    /// Pool password. Most pools ignore this for solo mining and accept "x".
    #[arg(short = 'p', long = "password", default_value = "x", value_name = "PASSWORD")]
    pub password: String,

    /// Appended to the wallet login as "wallet.suffix" to identify this worker.
    #[arg(long = "worker-suffix", value_name = "NAME")]
    pub worker_suffix: Option<String>,

    /// How often the coordinator ticks the session manager and search thread, in milliseconds.
    #[arg(long = "poll-interval-ms", default_value_t = 100, value_name = "MS")]
    pub poll_interval_ms: u64,

    /// tracing_subscriber EnvFilter directive, e.g. "info" or "btc_solo_miner=debug".
    #[arg(long = "log-level", default_value = "info", value_name = "LEVEL")]
    pub log_level: String,
}

impl Args {
    /// Validates fields clap's type system can't express on its own.
    pub fn validate(&self) -> Result<(), String> {
        if self.wallet.is_empty() || self.wallet.len() > 62 {
            return Err(format!(
                "wallet must be 1..62 characters, got {}",
                self.wallet.len()
            ));
        }
        if !self.pool.contains(':') {
            return Err(format!("pool address must be host:port, got '{}'", self.pool));
        }
        Ok(())
    }

    /// The login string sent to the pool: the wallet, with ".suffix" appended
    /// when a worker suffix was given.
    pub fn worker_login(&self) -> String {
        match &self.worker_suffix {
            Some(suffix) if !suffix.is_empty() => format!("{}.{}", self.wallet, suffix),
            _ => self.wallet.clone(),
        }
    }
}

/// A unit of work received from `mining.notify`, before extranonce2 and
/// nonce have been filled in.
#[derive(Debug, Clone)]
pub struct Job {
    pub job_id: String,
    pub prev_hash: [u8; 32],
    pub coinbase_prefix: Vec<u8>,
    pub coinbase_suffix: Vec<u8>,
    pub merkle_branch: Vec<[u8; 32]>,
    pub version: u32,
    pub nbits: u32,
    pub ntime: u32,
    pub clean: bool,
}

/// A request this session sent to the pool, awaiting a correlated response
/// by JSON-RPC `id`.
#[derive(Debug, Clone)]
pub enum PendingRequest {
    Subscribe,
    Authorize,
    Submit { job_id: String, generation: u64 },
}

/// Everything the session manager tracks about the current pool connection.
#[derive(Debug, Clone)]
pub struct SessionState {
    pub extranonce1: Vec<u8>,
    pub extranonce2_width: usize,
    pub extranonce2_counter: u64,
    pub difficulty: f64,
    pub target: [u8; 32],
    pub current_job: Option<Job>,
    pub message_id: u64,
    pub pending_requests: HashMap<u64, PendingRequest>,
    pub shares_accepted: u64,
    pub shares_rejected: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            extranonce1: Vec::new(),
            extranonce2_width: 4,
            extranonce2_counter: 0,
            difficulty: 1.0,
            target: crate::core::difficulty::difficulty_to_target(1.0),
            current_job: None,
            message_id: 1,
            pending_requests: HashMap::new(),
            shares_accepted: 0,
            shares_rejected: 0,
        }
    }

    /// Allocates the next JSON-RPC id and registers what it's waiting on.
    pub fn next_id(&mut self, pending: PendingRequest) -> u64 {
        let id = self.message_id;
        self.message_id += 1;
        self.pending_requests.insert(id, pending);
        id
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// A header template the search engine can mine against, published
/// atomically from the control context to the search thread.
#[derive(Debug, Clone)]
pub struct WorkTemplate {
    pub header_template: [u8; 80],
    pub target: [u8; 32],
    pub job_id: String,
    pub ntime: u32,
    pub extranonce2: Vec<u8>,
    pub generation: u64,
}

impl WorkTemplate {
    /// A template that will never match a real target; used before the
    /// first job has arrived.
    pub fn empty() -> Self {
        Self {
            header_template: [0u8; 80],
            target: [0u8; 32],
            job_id: String::new(),
            ntime: 0,
            extranonce2: Vec::new(),
            generation: 0,
        }
    }
}

/// A share the search engine found, ready for the session manager to submit.
#[derive(Debug, Clone)]
pub struct FoundShare {
    pub job_id: String,
    pub extranonce2: Vec<u8>,
    pub ntime: u32,
    pub nonce: u32,
    pub generation: u64,
}

/// The miner's externally observable lifecycle state.
#[derive(Debug, Clone, PartialEq)]
pub enum MinerState {
    Stopped,
    Connecting,
    Mining,
    Error(String),
}

/// Serializable mirror of `MinerState`, since `MinerState::Error` carries a
/// `String` that's already surfaced via `error_message`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MinerStateTag {
    Stopped,
    Connecting,
    Mining,
    Error,
}

impl From<&MinerState> for MinerStateTag {
    fn from(state: &MinerState) -> Self {
        match state {
            MinerState::Stopped => MinerStateTag::Stopped,
            MinerState::Connecting => MinerStateTag::Connecting,
            MinerState::Mining => MinerStateTag::Mining,
            MinerState::Error(_) => MinerStateTag::Error,
        }
    }
}

/// A point-in-time snapshot of the miner's counters, safe to read without
/// locking the mining loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stats {
    pub hashrate_hps: f64,
    pub hashes_total: u64,
    pub shares_found: u64,
    pub shares_accepted: u64,
    pub shares_rejected: u64,
    pub uptime_seconds: u64,
    pub pool_connected: bool,
    pub state: MinerStateTag,
    pub error_message: Option<String>,
    pub current_difficulty: f64,
}

impl Stats {
    pub fn new() -> Self {
        Self {
            hashrate_hps: 0.0,
            hashes_total: 0,
            shares_found: 0,
            shares_accepted: 0,
            shares_rejected: 0,
            uptime_seconds: 0,
            pool_connected: false,
            state: MinerStateTag::Stopped,
            error_message: None,
            current_difficulty: 1.0,
        }
    }
}

impl Default for Stats {
    fn default() -> Self {
        Self::new()
    }
}


// Changelog:
// - v1.0.0 (2026-07-27): The Stratum v1 / Bitcoin data model: Job,
//   SessionState, WorkTemplate, FoundShare, MinerState, Stats, in place
//   of a prior pool's job/share/target types. Keeps the clap derive Args
//   shape and validate() pattern, retargeted to wallet/pool/password/
//   worker-suffix/poll-interval/log-level instead of wallet/pool/
//   threads/benchmark.
