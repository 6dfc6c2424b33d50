// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/core/assembler.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file turns a pool Job plus the current SessionState into a
// WorkTemplate the search engine can mine against: it assembles the
// coinbase transaction, folds the merkle branch, fills the 80-byte
// header, and stamps a generation number so stale shares can be told
// apart from current ones.
//
// Tree Location:
// - src/core/assembler.rs (work assembly)
// - Depends on: core::hasher, core::types

use crate::core::hasher::sha256d;
use crate::core::types::{Job, SessionState, WorkTemplate};
use crate::error::{Error, Result};

/// Builds the next WorkTemplate for `job`, advancing `session`'s
/// extranonce2 counter in the process.
///
/// `generation` is the monotonically increasing counter the coordinator
/// owns; the caller passes in the value this template should be stamped
/// with (normally incremented once per call).
pub fn assemble(job: &Job, session: &mut SessionState, generation: u64) -> Result<WorkTemplate> {
    if job.job_id.is_empty() {
        return Err(Error::InvalidJob("empty job_id".to_string()));
    }

    let extranonce2 = encode_extranonce2(session.extranonce2_counter, session.extranonce2_width);
    session.extranonce2_counter += 1;

    let coinbase = build_coinbase(
        &job.coinbase_prefix,
        &session.extranonce1,
        &extranonce2,
        &job.coinbase_suffix,
    );
    let coinbase_hash = sha256d(&coinbase);
    let merkle_root = fold_merkle(coinbase_hash, &job.merkle_branch);

    let header_template = build_header(job, &merkle_root);

    Ok(WorkTemplate {
        header_template,
        target: session.target,
        job_id: job.job_id.clone(),
        ntime: job.ntime,
        extranonce2,
        generation,
    })
}

/// extranonce2 is a fixed-width little-endian counter, per Stratum v1.
fn encode_extranonce2(counter: u64, width: usize) -> Vec<u8> {
    let full = counter.to_le_bytes();
    full[..width.min(8)].to_vec()
}

fn build_coinbase(prefix: &[u8], extranonce1: &[u8], extranonce2: &[u8], suffix: &[u8]) -> Vec<u8> {
    let mut coinbase = Vec::with_capacity(prefix.len() + extranonce1.len() + extranonce2.len() + suffix.len());
    coinbase.extend_from_slice(prefix);
    coinbase.extend_from_slice(extranonce1);
    coinbase.extend_from_slice(extranonce2);
    coinbase.extend_from_slice(suffix);
    coinbase
}

/// Folds the merkle branch onto the coinbase hash: at each step, the
/// running hash is double-SHA-256'd together with the next branch entry.
/// An empty branch means the coinbase is the only transaction; the
/// running hash is the merkle root unchanged.
fn fold_merkle(coinbase_hash: [u8; 32], branch: &[[u8; 32]]) -> [u8; 32] {
    let mut current = coinbase_hash;
    for step in branch {
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(&current);
        buf[32..].copy_from_slice(step);
        current = sha256d(&buf);
    }
    current
}

/// Lays out the 80-byte Bitcoin block header: version, prev_hash, merkle
/// root, ntime, nbits, all little-endian, with the nonce field zeroed for
/// the search engine to fill in.
fn build_header(job: &Job, merkle_root: &[u8; 32]) -> [u8; 80] {
    let mut header = [0u8; 80];
    header[0..4].copy_from_slice(&job.version.to_le_bytes());
    header[4..36].copy_from_slice(&job.prev_hash);
    header[36..68].copy_from_slice(merkle_root);
    header[68..72].copy_from_slice(&job.ntime.to_le_bytes());
    header[72..76].copy_from_slice(&job.nbits.to_le_bytes());
    // header[76..80] (nonce) stays zeroed; the search engine owns it.
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_job() -> Job {
        Job {
            job_id: "job1".to_string(),
            prev_hash: [0x11u8; 32],
            coinbase_prefix: vec![0x01, 0x02],
            coinbase_suffix: vec![0x03, 0x04],
            merkle_branch: Vec::new(),
            version: 0x20000000,
            nbits: 0x1d00ffff,
            ntime: 0x5f5e100,
            clean: false,
        }
    }

    #[test]
    fn empty_branch_makes_coinbase_hash_the_merkle_root() {
        let job = sample_job();
        let mut session = SessionState::new();
        session.extranonce1 = vec![0xAA, 0xBB];

        let template = assemble(&job, &mut session, 1).unwrap();

        let coinbase = build_coinbase(
            &job.coinbase_prefix,
            &session.extranonce1,
            &encode_extranonce2(0, session.extranonce2_width),
            &job.coinbase_suffix,
        );
        let expected_root = sha256d(&coinbase);
        assert_eq!(&template.header_template[36..68], &expected_root);
    }

    #[test]
    fn extranonce2_counter_advances_each_call() {
        let job = sample_job();
        let mut session = SessionState::new();
        session.extranonce1 = vec![0xAA];

        let first = assemble(&job, &mut session, 1).unwrap();
        let second = assemble(&job, &mut session, 2).unwrap();
        assert_ne!(first.extranonce2, second.extranonce2);
        assert_eq!(session.extranonce2_counter, 2);
    }

    #[test]
    fn generation_is_stamped_as_given() {
        let job = sample_job();
        let mut session = SessionState::new();
        let template = assemble(&job, &mut session, 7).unwrap();
        assert_eq!(template.generation, 7);
    }

    #[test]
    fn rejects_empty_job_id() {
        let mut job = sample_job();
        job.job_id = String::new();
        let mut session = SessionState::new();
        assert!(assemble(&job, &mut session, 1).is_err());
    }

    #[test]
    fn header_fields_are_little_endian() {
        let job = sample_job();
        let mut session = SessionState::new();
        let template = assemble(&job, &mut session, 1).unwrap();
        assert_eq!(&template.header_template[0..4], &job.version.to_le_bytes());
        assert_eq!(&template.header_template[4..36], &job.prev_hash);
        assert_eq!(&template.header_template[68..72], &job.ntime.to_le_bytes());
        assert_eq!(&template.header_template[72..76], &job.nbits.to_le_bytes());
        assert_eq!(&template.header_template[76..80], &[0u8; 4]);
    }

    #[test]
    fn merkle_fold_applies_each_branch_step() {
        let coinbase_hash = [0x01u8; 32];
        let branch = vec![[0x02u8; 32], [0x03u8; 32]];

        let mut expected = coinbase_hash;
        for step in &branch {
            let mut buf = [0u8; 64];
            buf[..32].copy_from_slice(&expected);
            buf[32..].copy_from_slice(step);
            expected = sha256d(&buf);
        }

        assert_eq!(fold_merkle(coinbase_hash, &branch), expected);
    }
}

// Changelog:
// - v1.0.0 (2026-07-27): New module. A prior pool protocol this codebase
//   targeted sent a ready-made header blob; Stratum v1 pools don't, so
//   this crate builds the coinbase, folds the merkle branch, and fills
//   the header itself, grounded in the original firmware's
//   compute_merkle_root/build_block_header.
