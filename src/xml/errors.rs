//! XML decoding errors and device error markers
//!
//! `XmlError` covers documents that cannot be decoded at all. `ApiError` is
//! the application-level error a device embeds in an otherwise successful
//! HTTP 200 reply (`<error><code>..</code><message>..</message></error>`).

use std::fmt;
use std::fmt::Display;

/// Failure to turn raw text into a [`Document`](super::Document)
#[derive(Debug)]
pub enum XmlError {
    /// Tokenizer or well-formedness error reported by quick-xml
    Syntax(quick_xml::Error),

    /// Input contained no element at all (empty body, only a declaration, ...)
    NoRoot,

    /// Input ended while the named element was still open
    Unclosed(String),

    /// A second top-level element followed the root
    TrailingElement(String),

    /// Non-whitespace text before or after the root
    StrayText(String),
}

impl std::error::Error for XmlError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            XmlError::Syntax(e) => Some(e),
            _ => None,
        }
    }
}

impl Display for XmlError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match self {
            XmlError::Syntax(e) => write!(fmt, "malformed xml: {}", e),
            XmlError::NoRoot => "xml document has no root element".fmt(fmt),
            XmlError::Unclosed(name) => write!(fmt, "element <{}> is never closed", name),
            XmlError::TrailingElement(name) => {
                write!(fmt, "unexpected element <{}> after document root", name)
            }
            XmlError::StrayText(text) => {
                write!(fmt, "unexpected text {:?} outside document root", text)
            }
        }
    }
}

impl From<quick_xml::Error> for XmlError {
    fn from(e: quick_xml::Error) -> Self {
        XmlError::Syntax(e)
    }
}

/// Application-level error reported by the device inside a response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Human readable meaning of well-known device error codes
    pub fn description(&self) -> &'static str {
        match self.code.as_str() {
            "100002" => "not supported by firmware",
            "100003" => "no rights (login required)",
            "100004" => "system busy",
            "100005" => "request format error",
            "108001" => "wrong username",
            "108002" => "wrong password",
            "108003" => "already logged in",
            "108005" => "too many sessions",
            "108006" => "wrong username or password",
            "108007" => "too many login attempts",
            "125001" => "wrong token",
            "125002" => "wrong session",
            "125003" => "wrong session token",
            _ => "unknown error",
        }
    }
}

impl std::error::Error for ApiError {}

impl Display for ApiError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        if self.message.is_empty() {
            write!(fmt, "device error {} ({})", self.code, self.description())
        } else {
            write!(
                fmt,
                "device error {} ({}): {}",
                self.code,
                self.description(),
                self.message
            )
        }
    }
}
