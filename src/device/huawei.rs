//! Huawei LTE router web API client
//!
//! Login handshake:
//! 1. `GET /api/webserver/SesTokInfo` yields a `SessionID` cookie and a
//!    request verification token
//! 2. `POST /api/user/login` with a salted, hashed password (`password_type` 4)
//! 3. The reply carries the authenticated cookie and the next token
//!
//! `ureq` is blocking, so every call runs on tokio's blocking pool.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::time::Duration;
use crate::device::{FetchResponse, Modem, Session};
use crate::xml;

const TOKEN_HEADER: &str = "__RequestVerificationToken";
const NEXT_TOKEN_HEADER: &str = "__RequestVerificationTokenone";

#[derive(Clone, Debug)]
pub struct HuaweiConfig {
    /// host or host:port, without scheme
    pub host: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl HuaweiConfig {
    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.host, path)
    }
}

pub struct HuaweiModem {
    cfg: HuaweiConfig,
    agent: ureq::Agent,
}

impl HuaweiModem {
    pub fn new(cfg: HuaweiConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(cfg.timeout).build();
        Self { cfg, agent }
    }
}

#[async_trait]
impl Modem for HuaweiModem {
    async fn login(&self) -> crate::Result<Session> {
        let agent = self.agent.clone();
        let cfg = self.cfg.clone();
        tokio::task::spawn_blocking(move || login_blocking(&agent, &cfg)).await?
    }

    async fn fetch(&self, endpoint: &str, session: &Session) -> crate::Result<FetchResponse> {
        let agent = self.agent.clone();
        let url = self.cfg.url(endpoint);
        let session = session.clone();
        tokio::task::spawn_blocking(move || fetch_blocking(&agent, &url, &session)).await?
    }
}

fn login_blocking(agent: &ureq::Agent, cfg: &HuaweiConfig) -> crate::Result<Session> {
    let body = agent
        .get(&cfg.url("/api/webserver/SesTokInfo"))
        .call()?
        .into_string()?;
    let doc = xml::parse(&body)?;
    if let Some(err) = xml::check_error(doc.root()) {
        return Err(err.into());
    }
    let ses_info = doc
        .root()
        .child_text("SesInfo")
        .ok_or("SesTokInfo reply has no SesInfo")?
        .to_string();
    let tok_info = doc
        .root()
        .child_text("TokInfo")
        .ok_or("SesTokInfo reply has no TokInfo")?
        .to_string();

    let request = login_request(&cfg.username, &cfg.password, &tok_info);
    let response = agent
        .post(&cfg.url("/api/user/login"))
        .set("Cookie", &ses_info)
        .set(TOKEN_HEADER, &tok_info)
        .set("Content-Type", "application/x-www-form-urlencoded; charset=UTF-8")
        .send_string(&request)?;

    let cookie = session_cookie(&response).unwrap_or(ses_info);
    let token = response
        .header(NEXT_TOKEN_HEADER)
        .or_else(|| response.header(TOKEN_HEADER))
        .map(str::to_string)
        .unwrap_or(tok_info);

    let body = response.into_string()?;
    let doc = xml::parse(&body)?;
    if let Some(err) = xml::check_error(doc.root()) {
        return Err(err.into());
    }

    Ok(Session::new(cookie, token))
}

fn fetch_blocking(agent: &ureq::Agent, url: &str, session: &Session) -> crate::Result<FetchResponse> {
    let result = agent
        .get(url)
        .set("Cookie", session.cookie())
        .set(TOKEN_HEADER, session.token())
        .call();

    // ureq reports 4xx/5xx as errors; the scraper wants them as plain statuses
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(_, response)) => response,
        Err(e) => return Err(e.into()),
    };

    let status = response.status();
    let body = response.into_string()?;
    Ok(FetchResponse { status, body })
}

/// `SessionID=...` from the login reply's Set-Cookie headers
fn session_cookie(response: &ureq::Response) -> Option<String> {
    response
        .all("Set-Cookie")
        .into_iter()
        .find(|c| c.trim_start().starts_with("SessionID="))
        .map(|c| c.split(';').next().unwrap_or(c).trim().to_string())
}

fn login_request(username: &str, password: &str, token: &str) -> String {
    format!(
        concat!(
            r#"<?xml version="1.0" encoding="UTF-8"?>"#,
            "<request><Username>{}</Username><Password>{}</Password>",
            "<password_type>4</password_type></request>"
        ),
        quick_xml::escape::escape(username),
        encode_password(username, password, token),
    )
}

/// base64(sha256_hex(username + base64(sha256_hex(password)) + token))
fn encode_password(username: &str, password: &str, token: &str) -> String {
    let hashed = STANDARD.encode(sha256_hex(password));
    STANDARD.encode(sha256_hex(&format!("{}{}{}", username, hashed, token)))
}

fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex("admin"),
            "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918"
        );
    }

    #[test]
    fn test_encode_password_is_deterministic() {
        let a = encode_password("admin", "admin", "tok");
        let b = encode_password("admin", "admin", "tok");
        let c = encode_password("admin", "admin", "other");
        assert_eq!(a, b);
        assert_ne!(a, c);
        // base64 of a 64 char hex digest
        assert_eq!(a.len(), 88);
    }

    #[test]
    fn test_login_request_escapes_username() {
        let body = login_request("a<b", "pw", "tok");
        assert!(body.contains("<Username>a&lt;b</Username>"));
        assert!(body.contains("<password_type>4</password_type>"));
        let doc = xml::parse(&body).unwrap();
        assert_eq!(doc.root().name, "request");
    }

    #[test]
    fn test_url() {
        let cfg = HuaweiConfig {
            host: "192.168.8.1".to_string(),
            username: "admin".to_string(),
            password: "admin".to_string(),
            timeout: Duration::from_secs(1),
        };
        assert_eq!(cfg.url("/api/device/signal"), "http://192.168.8.1/api/device/signal");
    }
}
