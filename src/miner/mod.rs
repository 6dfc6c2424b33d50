// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/miner/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for the mining subsystem, located
// in the miner subdirectory. It declares submodules and re-exports key
// types for use throughout the project.
//
// Tree Location:
// - src/miner/mod.rs (miner module entry point)
// - Submodules: coordinator, search, stats, thread

pub mod coordinator;
pub mod search;
pub mod stats;
pub mod thread;

pub use coordinator::Coordinator;
pub use search::{search as search_nonces, SearchOutcome};
pub use stats::MinerStats;
pub use thread::SearchHandle;

// Changelog:
// - v1.0.0 (2026-07-27): search/thread/coordinator for a single
//   dedicated search thread, in place of an N-worker CPU thread pool and
//   GPU offload path. GPU mining is an explicit non-goal.
