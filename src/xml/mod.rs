//! XML decoding for device replies
//!
//! - [`parse`]: raw text to an owned element tree
//! - [`check_error`]: detects the error marker a device embeds in a 200 reply

mod document;
pub mod errors;

pub use document::{parse, Document, Element};
pub use errors::{ApiError, XmlError};

/// Inspect a parsed reply for an embedded device error
///
/// Devices answer a failed request with HTTP 200 and a body such as
/// `<error><code>125002</code><message></message></error>`. Any root named
/// `error` is treated as a failure; a missing code is reported as `unknown`.
pub fn check_error(root: &Element) -> Option<ApiError> {
    if root.name != "error" {
        return None;
    }

    let code = match root.child_text("code") {
        Some(code) if !code.is_empty() => code,
        _ => "unknown",
    };
    let message = root.child_text("message").unwrap_or_default();
    Some(ApiError::new(code, message))
}
