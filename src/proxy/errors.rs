//! Scrape run failures
//!
//! Every variant takes the same recovery path in the scraper: drop the
//! session and enter cooldown. The variants only differ in what gets logged.

use std::fmt;
use std::fmt::Display;
use crate::xml::{ApiError, XmlError};

#[derive(Debug)]
pub enum ScrapeError {
    /// Session could not be established
    Login(crate::Error),

    /// Request for an endpoint failed below HTTP (connect, timeout, read)
    Transport {
        endpoint: String,
        source: crate::Error,
    },

    /// Endpoint answered 200 with a body that is not XML
    Parse {
        endpoint: String,
        source: XmlError,
    },

    /// Endpoint answered 200 with an embedded device error
    Device {
        endpoint: String,
        error: ApiError,
    },
}

impl ScrapeError {
    /// Endpoint the failure happened on, if it got that far
    pub fn endpoint(&self) -> Option<&str> {
        match self {
            ScrapeError::Login(_) => None,
            ScrapeError::Transport { endpoint, .. }
            | ScrapeError::Parse { endpoint, .. }
            | ScrapeError::Device { endpoint, .. } => Some(endpoint),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScrapeError::Login(e) => Some(e.as_ref()),
            ScrapeError::Transport { source, .. } => Some(source.as_ref()),
            ScrapeError::Parse { source, .. } => Some(source),
            ScrapeError::Device { error, .. } => Some(error),
        }
    }
}

impl Display for ScrapeError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScrapeError::Login(e) => write!(fmt, "login failed: {}", e),
            ScrapeError::Transport { endpoint, source } => {
                write!(fmt, "request to {} failed: {}", endpoint, source)
            }
            ScrapeError::Parse { endpoint, source } => {
                write!(fmt, "invalid reply from {}: {}", endpoint, source)
            }
            ScrapeError::Device { endpoint, error } => {
                write!(fmt, "request error on {}: {}", endpoint, error)
            }
        }
    }
}
