// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/utils/format.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file provides formatting helpers for the periodic stats line
// main.rs prints, located in the utils subdirectory.
//
// Tree Location:
// - src/utils/format.rs (formatting utilities)
// - Depends on: std

use std::time::Duration;

pub struct FormatUtils;

impl FormatUtils {
    /// Format hashrate in appropriate units (H/s, KH/s, MH/s, GH/s)
    pub fn format_hashrate(hashrate: f64) -> String {
        if hashrate >= 1_000_000_000.0 {
            format!("{:.2} GH/s", hashrate / 1_000_000_000.0)
        } else if hashrate >= 1_000_000.0 {
            format!("{:.2} MH/s", hashrate / 1_000_000.0)
        } else if hashrate >= 1_000.0 {
            format!("{:.2} KH/s", hashrate / 1_000.0)
        } else {
            format!("{:.2} H/s", hashrate)
        }
    }

    /// Format a duration since some past event (uptime, time since last share).
    pub fn format_duration(duration: Duration) -> String {
        let secs = duration.as_secs();
        if secs < 60 {
            format!("{secs}s")
        } else if secs < 3600 {
            format!("{}m{}s", secs / 60, secs % 60)
        } else {
            format!("{}h{}m", secs / 3600, (secs % 3600) / 60)
        }
    }
}


// Changelog:
// - v1.0.0 (2026-07-27): Drops format_number (no difficulty-as-suffixed-
//   integer display here) and retargets format_duration from "Xs ago"-
//   style relative phrasing (built for a dashboard) to a plain duration
//   string, used for uptime in main.rs.
