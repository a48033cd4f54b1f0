use std::fs;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use crate::device::huawei::HuaweiConfig;
use crate::proxy::Args;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub modem: ModemConfig,
    #[serde(default)]
    pub poller: PollerConfig,
    #[serde(default)]
    pub http: HttpConfig,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ModemConfig {
    // router address, eg: 192.168.8.1
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_username")]
    pub username: String,

    #[serde(default = "default_password")]
    pub password: String,

    // per request transport timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_host() -> String {
    "192.168.8.1".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "admin".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ModemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            username: default_username(),
            password: default_password(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// password stays out of logs
impl std::fmt::Debug for ModemConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModemConfig")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("timeout_secs", &self.timeout_secs)
            .finish_non_exhaustive()
    }
}

impl ModemConfig {
    pub fn huawei_config(&self) -> HuaweiConfig {
        HuaweiConfig {
            host: self.host.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    // scrape period
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    // ticks skipped after a failed scrape
    #[serde(default = "default_cooldown_ticks")]
    pub cooldown_ticks: u32,
}

fn default_interval_secs() -> u64 {
    2
}

fn default_cooldown_ticks() -> u32 {
    5
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            cooldown_ticks: default_cooldown_ticks(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_listen_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            port: default_port(),
        }
    }
}

impl HttpConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.listen_addr, self.port)
    }
}

impl Config {
    /// Command line (and environment) values win over the file
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(host) = &args.host {
            self.modem.host = host.clone();
        }
        if let Some(username) = &args.username {
            self.modem.username = username.clone();
        }
        if let Some(password) = &args.password {
            self.modem.password = password.clone();
        }
        if let Some(interval) = args.interval {
            self.poller.interval_secs = interval;
        }
        if let Some(cooldown) = args.cooldown {
            self.poller.cooldown_ticks = cooldown;
        }
        if let Some(port) = args.port {
            self.http.port = port;
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.poller.interval_secs == 0 {
            anyhow::bail!("poller.interval_secs must be greater than zero");
        }
        if self.modem.host.is_empty() {
            anyhow::bail!("modem.host must not be empty");
        }
        Ok(())
    }
}

pub fn load(path: &str) -> anyhow::Result<Config> {
    let content = fs::read_to_string(path)?;
    parse(&content)
}

pub fn parse(content: &str) -> anyhow::Result<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// File config (if any) with command line overrides applied
pub fn resolve(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => load(path)?,
        None => Config::default(),
    };
    config.apply_args(args);
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_parse_full() {
        let config = parse(
            r#"
[modem]
host = "10.0.0.1"
username = "user"
password = "secret"
timeout_secs = 3

[poller]
interval_secs = 10
cooldown_ticks = 2

[http]
listen_addr = "0.0.0.0"
port = 8080
"#,
        )
        .unwrap();
        assert_eq!(config.modem.host, "10.0.0.1");
        assert_eq!(config.modem.huawei_config().timeout, Duration::from_secs(3));
        assert_eq!(config.poller.interval_secs, 10);
        assert_eq!(config.poller.cooldown_ticks, 2);
        assert_eq!(config.http.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_parse_defaults() {
        let config = parse("[modem]\nhost = \"192.168.1.1\"\n").unwrap();
        assert_eq!(config.modem.host, "192.168.1.1");
        assert_eq!(config.modem.username, "admin");
        assert_eq!(config.poller.interval_secs, 2);
        assert_eq!(config.poller.cooldown_ticks, 5);
        assert_eq!(config.http.addr(), "127.0.0.1:5000");
    }

    #[test]
    fn test_parse_rejects_wrong_type() {
        assert!(parse("[poller]\ninterval_secs = \"fast\"\n").is_err());
    }

    #[test]
    fn test_args_override_file() {
        let args = Args::parse_from([
            "modem-proxy",
            "--host",
            "10.1.1.1",
            "--interval",
            "7",
            "--port",
            "9000",
        ]);
        let mut config = parse("[modem]\nhost = \"192.168.1.1\"\n").unwrap();
        config.apply_args(&args);
        assert_eq!(config.modem.host, "10.1.1.1");
        assert_eq!(config.poller.interval_secs, 7);
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.poller.cooldown_ticks, 5);
    }

    #[test]
    fn test_validate_zero_interval() {
        tokio_test::assert_ok!(Config::default().validate());

        let mut config = Config::default();
        config.poller.interval_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let mut config = Config::default();
        config.modem.password = "hunter2".to_string();
        assert!(!format!("{:?}", config).contains("hunter2"));
    }
}
