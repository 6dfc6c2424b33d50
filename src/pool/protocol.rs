// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/pool/protocol.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file constructs Stratum v1 JSON-RPC request messages: subscribe,
// authorize, and submit, located in the pool subdirectory.
//
// Tree Location:
// - src/pool/protocol.rs (Stratum v1 request builders)
// - Depends on: serde_json

use serde_json::{json, Value};

pub struct StratumProtocol;

impl StratumProtocol {
    /// `mining.subscribe` — no params beyond an optional user agent.
    pub fn create_subscribe_request(id: u64) -> Value {
        json!({
            "id": id,
            "method": "mining.subscribe",
            "params": ["btc-solo-miner/1.0"]
        })
    }

    /// `mining.authorize` — worker login and password.
    pub fn create_authorize_request(id: u64, worker_login: &str, password: &str) -> Value {
        json!({
            "id": id,
            "method": "mining.authorize",
            "params": [worker_login, password]
        })
    }

    /// `mining.submit` — worker login, job id, extranonce2, ntime, nonce,
    /// all hex-encoded as Stratum v1 requires.
    pub fn create_submit_request(
        id: u64,
        worker_login: &str,
        job_id: &str,
        extranonce2_hex: &str,
        ntime_hex: &str,
        nonce_hex: &str,
    ) -> Value {
        json!({
            "id": id,
            "method": "mining.submit",
            "params": [worker_login, job_id, extranonce2_hex, ntime_hex, nonce_hex]
        })
    }

    /// Serializes a request and appends the newline Stratum's line
    /// protocol requires as a message delimiter.
    pub fn to_message(json: Value) -> String {
        format!("{json}\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_request_has_no_auth_fields() {
        let msg = StratumProtocol::create_subscribe_request(1);
        assert_eq!(msg["method"], "mining.subscribe");
        assert_eq!(msg["id"], 1);
    }

    #[test]
    fn authorize_request_carries_login_and_password() {
        let msg = StratumProtocol::create_authorize_request(2, "bc1qexample.worker1", "x");
        assert_eq!(msg["method"], "mining.authorize");
        assert_eq!(msg["params"][0], "bc1qexample.worker1");
        assert_eq!(msg["params"][1], "x");
    }

    #[test]
    fn submit_request_param_order_matches_stratum_v1() {
        let msg = StratumProtocol::create_submit_request(
            3,
            "bc1qexample.worker1",
            "job1",
            "00000001",
            "5f5e100",
            "deadbeef",
        );
        let params = msg["params"].as_array().unwrap();
        assert_eq!(params[0], "bc1qexample.worker1");
        assert_eq!(params[1], "job1");
        assert_eq!(params[2], "00000001");
        assert_eq!(params[3], "5f5e100");
        assert_eq!(params[4], "deadbeef");
    }

    #[test]
    fn to_message_appends_newline() {
        let msg = StratumProtocol::create_subscribe_request(1);
        assert!(StratumProtocol::to_message(msg).ends_with('\n'));
    }
}

// Changelog:
// - v1.0.0 (2026-07-27): Stratum v1's mining.subscribe/mining.authorize/
//   mining.submit with positional-array params instead of named-object
//   params, grounded in the original firmware's stratum_client.cpp
//   request bodies.
