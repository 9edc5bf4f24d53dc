//! Wallet pass entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use perkflow_core::types::Timestamp;

/// A row from the `wallet_passes` table, recorded after the external
/// wallet endpoint issued a pass.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WalletPass {
    pub id: Uuid,
    pub claim_id: Uuid,
    pub platform: String,
    pub pass_url: Option<String>,
    pub created_at: Timestamp,
}
