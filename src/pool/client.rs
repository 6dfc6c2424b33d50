// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/pool/client.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the TCP client for communicating with the mining
// pool, located in the pool subdirectory. It handles establishing the
// connection; the session manager owns everything that happens on it
// afterward.
//
// Tree Location:
// - src/pool/client.rs (pool TCP client logic)
// - Depends on: tokio, std

use tokio::net::TcpStream;
use tokio::time::{timeout, Duration};

use crate::error::{Error, Result};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pool client for opening TCP connections to the mining pool.
#[derive(Clone, Default)]
pub struct PoolClient;

impl PoolClient {
    pub fn new() -> Self {
        Self
    }

    /// Connect to the mining pool at `host:port`, bounded by a 10-second
    /// timeout. Nagle's algorithm is disabled since Stratum exchanges many
    /// small line-delimited messages.
    pub async fn connect(&self, pool_address: &str) -> Result<TcpStream> {
        let stream = timeout(CONNECT_TIMEOUT, TcpStream::connect(pool_address))
            .await
            .map_err(|_| Error::Link(format!("connect to {pool_address} timed out")))??;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

// Changelog:
// - v1.0.0 (2026-07-27):
//   - connect() takes a "host:port" &str directly (tokio's
//     ToSocketAddrs resolves it) instead of a pre-resolved SocketAddr,
//     since the CLI accepts a host:port string and resolution can fail
//     at connect time the same as any other transport error.
//   - Wraps the connect future in a 10s tokio::time::timeout, replacing
//     the original firmware's busy-wait connect loop with an async
//     equivalent.
