use std::sync::Arc;

use perkflow_events::{ChangeFeed, EngagementRecorder};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: perkflow_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Fire-and-forget engagement event recorder.
    pub recorder: EngagementRecorder,
    /// In-process change feed feeding the WebSocket subscriptions.
    pub feed: Arc<ChangeFeed>,
    /// HTTP client for the external wallet pass endpoints.
    pub http: reqwest::Client,
}
