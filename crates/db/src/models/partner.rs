//! Partner (business / hotspot) entity model.

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use perkflow_core::types::Timestamp;

/// A row from the `partners` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Partner {
    pub id: Uuid,
    pub name: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
