// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/pool/mod.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the module declaration for pool communication, located in
// the pool subdirectory. It declares submodules and re-exports key types
// for use throughout the project.
//
// Tree Location:
// - src/pool/mod.rs (pool module entry point)
// - Submodules: client, protocol, session

pub mod client;
pub mod protocol;
pub mod session;

pub use client::PoolClient;
pub use protocol::StratumProtocol;
pub use session::{SessionEvent, SessionManager};

// Changelog:
// - v1.0.0 (2026-07-27): Drops a `messages` submodule that held drifted
//   SHA-256 difficulty code duplicating core::difficulty, not Stratum
//   message types, and adds `session`, the Stratum v1 session manager.
