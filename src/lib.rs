// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/lib.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the library entry point, located at the root of the
// source tree. It exports the public modules and types main.rs and the
// integration tests use.
//
// Tree Location:
// - src/lib.rs (root library file)
// - Exports modules: core, error, miner, pool, utils

pub mod core;
pub mod error;
pub mod miner;
pub mod pool;
pub mod utils;

pub use crate::core::{Args, Job, MinerState, Stats, WorkTemplate};
pub use crate::error::{Error, Result};
pub use crate::miner::Coordinator;
pub use crate::pool::PoolClient;

// Changelog:
// - v1.0.0 (2026-07-27): Drops the benchmark/help/tui modules (out of
//   scope) and the boxed dyn-Error Result alias in favor of the typed
//   error::Result. Re-exports the miner's Coordinator as the crate's
//   primary entry point.
