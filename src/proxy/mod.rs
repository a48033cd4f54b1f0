use clap::Parser;

pub mod config;
pub mod errors;
pub mod http;
pub mod main;
mod prettylog;
pub mod scheduler;
pub mod scraper;
pub mod store;

/// Diagnostic endpoints polled on every run, in fetch order.
/// All of them answer with `application/xml`.
pub const END_POINTS: &[&str] = &[
    "/api/device/signal",
    "/api/net/net-mode",
    "/api/net/current-plmn",
    "/api/device/information",
    "/api/monitoring/traffic-statistics",
];

pub fn end_points() -> Vec<String> {
    END_POINTS.iter().map(|e| e.to_string()).collect()
}

/// Caching proxy for a Huawei LTE router's diagnostic API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to a TOML config file (defaults are used when omitted)
    #[arg(short, long, env = "PROXY_CONFIG")]
    pub config: Option<String>,

    /// Router address (e.g., 192.168.8.1)
    #[arg(long, env = "MODEM_HOST")]
    pub host: Option<String>,

    /// Router login name
    #[arg(short, long, env = "MODEM_USERNAME")]
    pub username: Option<String>,

    /// Router login password
    #[arg(long, env = "MODEM_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Poll interval in seconds
    #[arg(long, env = "PROXY_INTERVAL")]
    pub interval: Option<u64>,

    /// Ticks to skip after a failed poll
    #[arg(long, env = "PROXY_COOLDOWN")]
    pub cooldown: Option<u32>,

    /// HTTP port cached replies are served on
    #[arg(short, long, env = "PROXY_HTTP_PORT")]
    pub port: Option<u16>,
}
