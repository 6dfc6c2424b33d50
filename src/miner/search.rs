// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/miner/search.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements the pure nonce-search loop: given a header template
// and a starting nonce, hash a batch of candidate headers and report
// whether any met the target. No I/O, no allocation, no shared state --
// everything the caller needs comes in through the arguments and goes
// back out through the return value.
//
// Tree Location:
// - src/miner/search.rs (nonce search loop)
// - Depends on: core::hasher

use crate::core::hasher::{hash_below_target, sha256d};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    Found { nonce: u32, hashes_done: u32 },
    Exhausted { hashes_done: u32 },
}

/// Searches `count` consecutive nonces starting at `start_nonce`, writing
/// each candidate into `header`'s last 4 bytes before hashing it.
/// Nonce arithmetic wraps at `u32::MAX`, matching the network's 32-bit
/// nonce field. Returns as soon as a header hashes below `target`.
pub fn search(header: &mut [u8; 80], start_nonce: u32, count: u32, target: &[u8; 32]) -> SearchOutcome {
    let mut nonce = start_nonce;
    for hashes_done in 0..count {
        header[76..80].copy_from_slice(&nonce.to_le_bytes());
        let hash = sha256d(header);
        if hash_below_target(&hash, target) {
            return SearchOutcome::Found {
                nonce,
                hashes_done: hashes_done + 1,
            };
        }
        nonce = nonce.wrapping_add(1);
    }
    SearchOutcome::Exhausted { hashes_done: count }
}


// Changelog:
// - v1.0.0 (2026-07-27): New module. Sequential nonce stepping from a
//   caller-supplied start, since a single dedicated thread needs no
//   per-thread stride or random start point, in place of a batch
//   threshold comparison against a truncated difficulty value.
