// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/core/hasher.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file implements double SHA-256 (the hash Bitcoin block headers
// use) and little-endian whole-number target comparison, located in the
// core subdirectory.
//
// Tree Location:
// - src/core/hasher.rs (double-SHA-256 and target comparison)
// - Depends on: sha2

use sha2::{Digest, Sha256};

/// SHA-256 applied twice in series: sha256(sha256(input)).
pub fn sha256d(input: &[u8]) -> [u8; 32] {
    let first = Sha256::digest(input);
    let second = Sha256::digest(first);
    second.into()
}

/// Whole-number comparison of `hash` and `target` as little-endian
/// 256-bit integers. Returns true when `hash <= target`, scanning from
/// the most significant byte (index 31) down to the least significant
/// (index 0). A hash equal to the target counts as a valid share, per
/// Bitcoin mining convention.
pub fn hash_below_target(hash: &[u8; 32], target: &[u8; 32]) -> bool {
    for i in (0..32).rev() {
        if hash[i] < target[i] {
            return true;
        }
        if hash[i] > target[i] {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256d_known_answer() {
        let hash = sha256d(b"abc");
        assert_eq!(
            hex::encode(hash),
            "4f8b42c22dd3729b519ba6f68d2da7cc5b2d606d05daed5ad5128cc03e6c6358"
        );
    }

    #[test]
    fn equal_arrays_are_below_target() {
        let a = [0x42u8; 32];
        assert!(hash_below_target(&a, &a));
    }

    #[test]
    fn msb_first_ordering() {
        let mut hash = [0u8; 32];
        let mut target = [0u8; 32];
        hash[31] = 0x01;
        target[31] = 0x02;
        assert!(hash_below_target(&hash, &target));
        assert!(!hash_below_target(&target, &hash));

        // a difference further down the array is irrelevant once a
        // higher-index byte has already decided the comparison
        hash[0] = 0xFF;
        target[0] = 0x00;
        assert!(hash_below_target(&hash, &target));
    }

    #[test]
    fn zero_hash_satisfies_difficulty_one_target() {
        let hash = [0u8; 32];
        let mut target = [0u8; 32];
        target[29] = 0xFF;
        target[30] = 0xFF;
        assert!(hash_below_target(&hash, &target));

        let mut hard_hash = [0u8; 32];
        hard_hash[30] = 0xFF;
        hard_hash[31] = 0x01;
        assert!(!hash_below_target(&hard_hash, &target));
    }
}

// Changelog:
// - v1.0.0 (2026-07-27): Drops the length guard and [0xFF; 32] sentinel
//   return a variable-length &[u8] input used to need, since the header
//   is a fixed-size [u8; 80] at the only call site. Drops the
//   batch-of-4 hashing variant; the search loop owns its own batching
//   instead of pulling fixed-size batches from the hasher. Compares the
//   full 256-bit value MSB-first instead of truncating to the low 8
//   bytes as a u64.
