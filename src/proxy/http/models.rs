//! HTTP API response models

use serde::Serialize;

/// Cache overview served at `/status`
#[derive(Serialize, Debug, Clone)]
pub struct StatusResponse {
    pub cached: usize,
    pub endpoints: Vec<EndpointStatus>,
}

#[derive(Serialize, Debug, Clone)]
pub struct EndpointStatus {
    pub endpoint: String,
    pub cached: bool,
    pub bytes: usize,
    /// RFC 3339, absent until the first successful fetch
    pub updated_at: Option<String>,
}
