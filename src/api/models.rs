use serde::Serialize;

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub service: String,
    pub uptime: u64,
}

/// Body of every successful chat reply, degraded or not.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatStatusResponse {
    pub available: bool,
    pub provider: Option<String>,
    pub model: Option<String>,
}
