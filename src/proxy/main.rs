use clap::Parser;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use crate::device::huawei::HuaweiModem;
use crate::proxy::http::server;
use crate::proxy::prettylog::log_startup_banner;
use crate::proxy::scheduler::Scheduler;
use crate::proxy::scraper::{Scraper, ScraperConfig};
use crate::proxy::store::SnapshotStore;
use crate::proxy::{config, end_points, Args};
use crate::utils;

pub async fn run_proxy() {
    let args = Args::parse();

    if let Err(e) = utils::init_tracing() {
        eprintln!("Failed to initialize logging: {}", e);
        return;
    }

    let cfg = match config::resolve(&args) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::error!("Invalid configuration: {:#}", e);
            return;
        }
    };
    tracing::debug!("config: {:?}", cfg);

    log_startup_banner(&cfg);

    let endpoints = end_points();
    let store = SnapshotStore::new();

    let modem = HuaweiModem::new(cfg.modem.huawei_config());
    let scraper = Scraper::new(
        modem,
        store.clone(),
        ScraperConfig {
            endpoints: endpoints.clone(),
            cooldown_ticks: cfg.poller.cooldown_ticks,
        },
    );
    let scheduler = Scheduler::new(Duration::from_secs(cfg.poller.interval_secs)).start(scraper);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::info!("Waiting to exit...");
                signal.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for shutdown signal: {}", e),
        }
    });

    if let Err(e) = server::start(&cfg.http.addr(), store, &endpoints, shutdown).await {
        tracing::error!("HTTP server error: {}", e);
    }

    // also reached when the listener never came up
    scheduler.shutdown().await;
    tracing::info!("Done");
}
