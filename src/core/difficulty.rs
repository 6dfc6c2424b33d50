// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/core/difficulty.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file converts a pool-assigned Stratum difficulty into a 256-bit
// share target, using wide-integer division against Bitcoin's difficulty-1
// target rather than the single-scaled-byte shortcuts that are only
// accurate near difficulty 1. The result is stored little-endian, matching
// the comparison convention hash_below_target uses.
//
// Tree Location:
// - src/core/difficulty.rs (difficulty -> target conversion)
// - Depends on: uint

use tracing::warn;
use uint::construct_uint;

construct_uint! {
    pub struct U256(4);
}

/// Bitcoin's difficulty-1 target (the target used by "pdiff"), big-endian,
/// as it's conventionally written.
const DIFF1_TARGET_BE: [u8; 32] = [
    0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
];

/// Fixed-point scale applied to `difficulty` before the integer division,
/// so fractional difficulties (e.g. 1.5) don't get truncated to 1 before
/// the division ever runs.
const SCALE: u64 = 1_000_000;

/// Converts a Stratum `mining.set_difficulty` value into a 32-byte,
/// little-endian share target: `target = diff1_target / difficulty`.
///
/// Non-positive or non-finite difficulty is treated as difficulty 1 (the
/// loosest target), logged as a warning rather than propagated as an
/// error, since a malformed difficulty notification shouldn't stop mining.
pub fn difficulty_to_target(difficulty: f64) -> [u8; 32] {
    let diff1 = U256::from_big_endian(&DIFF1_TARGET_BE);

    if !difficulty.is_finite() || difficulty <= 0.0 {
        warn!("non-positive or non-finite difficulty {difficulty}, using difficulty 1");
        return diff1.to_little_endian();
    }

    let scaled = (difficulty * SCALE as f64).round();
    let scaled = if scaled < 1.0 { 1u64 } else { scaled as u64 };

    let target = diff1 * U256::from(SCALE) / U256::from(scaled);
    target.to_little_endian()
}


// Changelog:
// - v1.0.0 (2026-07-27): Supersedes both a u64-truncated
//   difficulty_to_target (which only kept the low 8 bytes of the
//   256-bit target) and the original firmware's single-scaled-uint16
//   shortcut (correct only near difficulty 1). This version keeps the
//   full 256-bit target through the division so high-difficulty pools
//   don't collapse the target to zero or a degenerate u64 truncation.
// - v1.0.1 (2026-07-27): Fixed the output to little-endian byte order —
//   it was returning U256::to_big_endian(), which hash_below_target's
//   little-endian MSB-first scan would have read backwards, scrambling
//   every share accept/reject decision.
