//! Device access abstraction
//!
//! The scraper only talks to the router through [`Modem`], which hides the
//! login handshake and the HTTP transport. [`huawei::HuaweiModem`] is the
//! production implementation; tests substitute scripted modems.

pub mod huawei;

use async_trait::async_trait;
use std::fmt;

/// HTTP status the scraper treats as a usable reply
pub const STATUS_OK: u16 = 200;

/// Authenticated context returned by [`Modem::login`]
///
/// Opaque to callers. Validity is never checked up front; a stale session
/// shows up as a device error on the next fetch.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    cookie: String,
    token: String,
}

impl Session {
    pub fn new(cookie: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            cookie: cookie.into(),
            token: token.into(),
        }
    }

    pub fn cookie(&self) -> &str {
        &self.cookie
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// Raw reply to a fetch: transport status plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Router access used by the scraper
#[async_trait]
pub trait Modem: Send + Sync {
    /// Establish a new authenticated session
    ///
    /// # Returns
    /// - `Ok(Session)` - Device accepted the credentials
    /// - `Err` - Host unreachable, bad credentials or unexpected reply
    async fn login(&self) -> crate::Result<Session>;

    /// Fetch one endpoint path (e.g. `/api/device/signal`)
    ///
    /// Non-success HTTP statuses are returned in [`FetchResponse::status`];
    /// only transport failures (connect, timeout, read) are errors.
    async fn fetch(&self, endpoint: &str, session: &Session) -> crate::Result<FetchResponse>;
}
