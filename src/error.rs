// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/error.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file defines the crate-wide error type for the solo miner. Error
// kinds mirror the failure classes the pool client, work assembler, and
// coordinator must distinguish: configuration problems refuse to start
// mining, transport problems trigger reconnect, protocol problems are
// logged and skipped, and rejected shares just increment a counter.
//
// Tree Location:
// - src/error.rs (crate-wide error type)
// - Depends on: thiserror, std::io

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("link not ready: {0}")]
    Link(String),

    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("invalid job: {0}")]
    InvalidJob(String),

    #[error("share rejected: {0}")]
    Rejected(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Protocol(err.to_string())
    }
}

impl From<hex::FromHexError> for Error {
    fn from(err: hex::FromHexError) -> Self {
        Error::InvalidJob(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

// Changelog:
// - v1.0.0 (2026-07-27): Initial typed error enum.
//   - A thiserror-derived enum in place of a boxed `dyn std::error::Error`
//     alias, so the coordinator can match on error kind to decide between
//     reconnecting, dropping a job, and surfacing a user-visible failure,
//     while still propagating with `?` and `#[from]`.
