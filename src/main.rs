// Solo Miner - Free and Open Source Software Statement
//
// This project, btc-solo-miner, is Free and Open Source Software (FOSS)
// licensed under the MIT License.
//
// File: src/main.rs
// Version: 1.0.0
// Developer: OIEIEIO <oieieio@protonmail.com>
//
// This file is the binary entry point: parses CLI arguments, sets up
// logging, starts the coordinator, and drives its tick loop at the
// configured poll interval until Ctrl+C.

use clap::Parser;
use tracing::{error, info};

use btc_solo_miner::core::Args;
use btc_solo_miner::miner::Coordinator;
use btc_solo_miner::utils::FormatUtils;
use btc_solo_miner::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Err(err) = args.validate() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(args.log_level.clone()))
        .init();

    let poll_interval = std::time::Duration::from_millis(args.poll_interval_ms);
    let mut coordinator = Coordinator::new(args);

    if let Err(err) = coordinator.start().await {
        error!(error = %err, "failed to start mining");
        std::process::exit(1);
    }

    let mut last_report = std::time::Instant::now();
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutdown requested");
                coordinator.stop();
                break;
            }
            _ = tokio::time::sleep(poll_interval) => {
                if let Err(err) = coordinator.tick().await {
                    error!(error = %err, "coordinator tick failed");
                }
            }
        }

        if last_report.elapsed() > std::time::Duration::from_secs(30) {
            let stats = coordinator.stats();
            info!(
                hashrate = %FormatUtils::format_hashrate(stats.hashrate_hps),
                uptime = %FormatUtils::format_duration(std::time::Duration::from_secs(stats.uptime_seconds)),
                shares_found = stats.shares_found,
                shares_accepted = stats.shares_accepted,
                shares_rejected = stats.shares_rejected,
                pool_connected = stats.pool_connected,
                "status"
            );
            last_report = std::time::Instant::now();
        }
    }

    Ok(())
}

// Changelog:
// - v1.0.0 (2026-07-27): A single async main driving one Coordinator, in
//   place of feature-gated cpu/gpu/hybrid main() variants with a web
//   dashboard module and benchmark/SV2 dispatch, since GPU/hybrid/SV2/
//   web-dashboard are all out of scope. tokio::signal::ctrl_c() adds a
//   graceful shutdown path where the binary previously ran until killed.
