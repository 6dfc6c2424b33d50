// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/pool/session.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file owns a single pool connection end to end: opening the socket,
// sending subscribe/authorize/submit requests, and parsing everything the
// pool sends back into typed events the coordinator can act on. Every
// response is matched to its request by JSON-RPC id, never by guessing
// from the shape of the value.
//
// Tree Location:
// - src/pool/session.rs (Stratum session manager)
// - Depends on: tokio, serde_json, core::types, pool::client, pool::protocol

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};
use tracing::{debug, info, warn};

use crate::core::difficulty::difficulty_to_target;
use crate::core::types::{Job, PendingRequest, SessionState};
use crate::error::{Error, Result};
use crate::pool::client::PoolClient;
use crate::pool::protocol::StratumProtocol;

const SUBSCRIBE_TIMEOUT: Duration = Duration::from_secs(5);
const AUTHORIZE_TIMEOUT: Duration = Duration::from_secs(5);

/// Something the pool told us, already correlated and parsed.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    NewJob(Job),
    DifficultyChanged(f64),
    ShareResult {
        accepted: bool,
        job_id: String,
        generation: u64,
    },
}

pub struct SessionManager {
    client: PoolClient,
    writer: Option<OwnedWriteHalf>,
    incoming: Option<mpsc::UnboundedReceiver<String>>,
    reader_task: Option<JoinHandle<()>>,
    pub session: SessionState,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            client: PoolClient::new(),
            writer: None,
            incoming: None,
            reader_task: None,
            session: SessionState::new(),
        }
    }

    /// Opens the TCP connection and starts the background line reader.
    /// Does not subscribe or authorize; call those separately.
    pub async fn connect(&mut self, pool_address: &str) -> Result<()> {
        let stream = self.client.connect(pool_address).await?;
        let (read_half, write_half) = stream.into_split();
        self.writer = Some(write_half);

        let (tx, rx) = mpsc::unbounded_channel();
        self.incoming = Some(rx);
        self.reader_task = Some(tokio::spawn(async move {
            let mut lines = BufReader::new(read_half).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if tx.send(line).is_err() {
                            break;
                        }
                    }
                    Ok(None) | Err(_) => break,
                }
            }
        }));

        self.session = SessionState::new();
        Ok(())
    }

    async fn write_line(&mut self, message: String) -> Result<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| Error::Link("not connected".to_string()))?;
        writer.write_all(message.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }

    async fn next_line(&mut self, budget: Duration) -> Result<String> {
        let rx = self
            .incoming
            .as_mut()
            .ok_or_else(|| Error::Link("not connected".to_string()))?;
        match timeout(budget, rx.recv()).await {
            Ok(Some(line)) => Ok(line),
            Ok(None) => Err(Error::Link("pool closed the connection".to_string())),
            Err(_) => Err(Error::Link("timed out waiting for pool".to_string())),
        }
    }

    /// Sends `mining.subscribe` and blocks (up to 5s) until the pool's
    /// extranonce1/extranonce2_width come back. Any notify/set_difficulty
    /// messages that arrive first are processed, not discarded.
    pub async fn subscribe(&mut self) -> Result<()> {
        let id = self.session.next_id(PendingRequest::Subscribe);
        let request = StratumProtocol::to_message(StratumProtocol::create_subscribe_request(id));
        self.write_line(request).await?;

        let deadline = tokio::time::Instant::now() + SUBSCRIBE_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(Error::Link("mining.subscribe timed out".to_string()));
            }
            let line = self.next_line(remaining).await?;
            if self.handle_subscribe_line(&line, id)? {
                return Ok(());
            }
        }
    }

    fn handle_subscribe_line(&mut self, line: &str, expected_id: u64) -> Result<bool> {
        let value: Value = serde_json::from_str(line)?;
        if value.get("id").and_then(Value::as_u64) != Some(expected_id) {
            // some other notification or stale response; ignore here and
            // let dispatch() pick it up on the next poll
            return Ok(false);
        }
        self.session.pending_requests.remove(&expected_id);

        let result = value
            .get("result")
            .ok_or_else(|| Error::Protocol("mining.subscribe response missing result".to_string()))?;
        let extranonce1_hex = result
            .get(1)
            .and_then(Value::as_str)
            .ok_or_else(|| Error::Protocol("mining.subscribe result missing extranonce1".to_string()))?;
        let extranonce2_width = result
            .get(2)
            .and_then(Value::as_u64)
            .ok_or_else(|| Error::Protocol("mining.subscribe result missing extranonce2 size".to_string()))?
            as usize;

        self.session.extranonce1 = hex::decode(extranonce1_hex)?;
        self.session.extranonce2_width = extranonce2_width;
        info!(
            extranonce1 = %extranonce1_hex,
            extranonce2_width,
            "subscribed"
        );
        Ok(true)
    }

    /// Sends `mining.authorize` and blocks (up to 5s) for the pool's ack.
    pub async fn authorize(&mut self, worker_login: &str, password: &str) -> Result<bool> {
        let id = self.session.next_id(PendingRequest::Authorize);
        let request = StratumProtocol::to_message(StratumProtocol::create_authorize_request(
            id,
            worker_login,
            password,
        ));
        self.write_line(request).await?;

        let deadline = tokio::time::Instant::now() + AUTHORIZE_TIMEOUT;
        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(Error::Link("mining.authorize timed out".to_string()));
            }
            let line = self.next_line(remaining).await?;
            if let Some(ok) = self.handle_authorize_line(&line, id)? {
                return Ok(ok);
            }
        }
    }

    fn handle_authorize_line(&mut self, line: &str, expected_id: u64) -> Result<Option<bool>> {
        let value: Value = serde_json::from_str(line)?;
        if value.get("id").and_then(Value::as_u64) != Some(expected_id) {
            return Ok(None);
        }
        self.session.pending_requests.remove(&expected_id);
        let ok = value.get("result").and_then(Value::as_bool).unwrap_or(false);
        Ok(Some(ok))
    }

    /// Submits a found share. Fire-and-forget: the pool's accept/reject
    /// comes back later and is surfaced through `poll()`.
    pub async fn submit(
        &mut self,
        worker_login: &str,
        job_id: &str,
        extranonce2: &[u8],
        ntime: u32,
        nonce: u32,
        generation: u64,
    ) -> Result<()> {
        let id = self.session.next_id(PendingRequest::Submit {
            job_id: job_id.to_string(),
            generation,
        });
        let request = StratumProtocol::to_message(StratumProtocol::create_submit_request(
            id,
            worker_login,
            job_id,
            &hex::encode(extranonce2),
            &format!("{ntime:08x}"),
            &format!("{nonce:08x}"),
        ));
        self.write_line(request).await
    }

    /// Drains every line currently buffered from the pool, without
    /// blocking, dispatching each into a `SessionEvent`.
    pub fn poll(&mut self) -> Result<Vec<SessionEvent>> {
        let mut events = Vec::new();
        let rx = match self.incoming.as_mut() {
            Some(rx) => rx,
            None => return Ok(events),
        };
        loop {
            match rx.try_recv() {
                Ok(line) => {
                    if let Some(event) = self.dispatch(&line)? {
                        events.push(event);
                    }
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    return Err(Error::Link("pool connection lost".to_string()));
                }
            }
        }
        Ok(events)
    }

    fn dispatch(&mut self, line: &str) -> Result<Option<SessionEvent>> {
        let value: Value = serde_json::from_str(line)?;

        if let Some(method) = value.get("method").and_then(Value::as_str) {
            return match method {
                "mining.notify" => self.handle_notify(&value).map(Some),
                "mining.set_difficulty" => self.handle_set_difficulty(&value).map(Some),
                other => {
                    debug!(method = other, "ignoring unsupported notification");
                    Ok(None)
                }
            };
        }

        let id = match value.get("id").and_then(Value::as_u64) {
            Some(id) => id,
            None => {
                debug!("ignoring message with neither method nor id");
                return Ok(None);
            }
        };

        match self.session.pending_requests.remove(&id) {
            Some(PendingRequest::Submit { job_id, generation }) => {
                let accepted = value.get("error").map(Value::is_null).unwrap_or(true)
                    && value.get("result").and_then(Value::as_bool).unwrap_or(false);
                if accepted {
                    self.session.shares_accepted += 1;
                } else {
                    self.session.shares_rejected += 1;
                }
                Ok(Some(SessionEvent::ShareResult {
                    accepted,
                    job_id,
                    generation,
                }))
            }
            Some(PendingRequest::Subscribe) | Some(PendingRequest::Authorize) => {
                // already consumed synchronously by subscribe()/authorize();
                // seeing it again here means it arrived late.
                Ok(None)
            }
            None => {
                warn!(id, "response with unknown id, ignoring");
                Ok(None)
            }
        }
    }

    fn handle_notify(&mut self, value: &Value) -> Result<SessionEvent> {
        let params = value
            .get("params")
            .and_then(Value::as_array)
            .ok_or_else(|| Error::Protocol("mining.notify missing params".to_string()))?;
        if params.len() < 9 {
            return Err(Error::InvalidJob(format!(
                "mining.notify expected 9 params, got {}",
                params.len()
            )));
        }

        let job_id = params[0]
            .as_str()
            .ok_or_else(|| Error::InvalidJob("job_id not a string".to_string()))?
            .to_string();
        let prev_hash = decode_hash32(&params[1], "prev_hash")?;
        let coinbase_prefix = hex::decode(
            params[2]
                .as_str()
                .ok_or_else(|| Error::InvalidJob("coinbase1 not a string".to_string()))?,
        )?;
        let coinbase_suffix = hex::decode(
            params[3]
                .as_str()
                .ok_or_else(|| Error::InvalidJob("coinbase2 not a string".to_string()))?,
        )?;
        let merkle_branch = params[4]
            .as_array()
            .ok_or_else(|| Error::InvalidJob("merkle_branch not an array".to_string()))?
            .iter()
            .map(|entry| decode_hash32(entry, "merkle branch entry"))
            .collect::<Result<Vec<_>>>()?;
        let version = parse_hex_u32(&params[5], "version")?;
        let nbits = parse_hex_u32(&params[6], "nbits")?;
        let ntime = parse_hex_u32(&params[7], "ntime")?;
        let clean = params[8].as_bool().unwrap_or(false);

        let job = Job {
            job_id,
            prev_hash,
            coinbase_prefix,
            coinbase_suffix,
            merkle_branch,
            version,
            nbits,
            ntime,
            clean,
        };

        info!(job_id = %job.job_id, clean, "new job");
        self.session.current_job = Some(job.clone());
        Ok(SessionEvent::NewJob(job))
    }

    fn handle_set_difficulty(&mut self, value: &Value) -> Result<SessionEvent> {
        let difficulty = value
            .get("params")
            .and_then(Value::as_array)
            .and_then(|params| params.first())
            .and_then(Value::as_f64)
            .ok_or_else(|| Error::Protocol("mining.set_difficulty missing difficulty".to_string()))?;

        self.session.difficulty = difficulty;
        self.session.target = difficulty_to_target(difficulty);
        info!(difficulty, "difficulty set");
        Ok(SessionEvent::DifficultyChanged(difficulty))
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        if let Some(task) = self.reader_task.take() {
            task.abort();
        }
    }
}

fn decode_hash32(value: &Value, field: &str) -> Result<[u8; 32]> {
    let hex_str = value
        .as_str()
        .ok_or_else(|| Error::InvalidJob(format!("{field} not a string")))?;
    let bytes = hex::decode(hex_str)?;
    bytes
        .try_into()
        .map_err(|_| Error::InvalidJob(format!("{field} is not 32 bytes")))
}

fn parse_hex_u32(value: &Value, field: &str) -> Result<u32> {
    let hex_str = value
        .as_str()
        .ok_or_else(|| Error::InvalidJob(format!("{field} not a string")))?;
    u32::from_str_radix(hex_str, 16).map_err(|_| Error::InvalidJob(format!("{field} is not valid hex")))
}


// Changelog:
// - v1.0.0 (2026-07-27): New module. A Stratum v1 session manager that
//   correlates strictly by JSON-RPC id via pending_requests, instead of
//   an id==1/id>=100 convention or the original firmware's
//   stratum_client.cpp shape-guessing (array vs bool) that produced a
//   known correlation bug.
