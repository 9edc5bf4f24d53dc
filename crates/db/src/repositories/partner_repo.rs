//! Repository for the `partners` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::partner::Partner;

/// Column list for `partners` queries.
const PARTNER_COLUMNS: &str = "id, name, is_active, created_at, updated_at";

/// Provides read/write operations for partners.
pub struct PartnerRepo;

impl PartnerRepo {
    /// Fetch a partner by id.
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Partner>, sqlx::Error> {
        let query = format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE id = $1");
        sqlx::query_as::<_, Partner>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active partners by name.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Partner>, sqlx::Error> {
        let query =
            format!("SELECT {PARTNER_COLUMNS} FROM partners WHERE is_active ORDER BY name");
        sqlx::query_as::<_, Partner>(&query).fetch_all(pool).await
    }

    /// Insert a new partner, returning the created row.
    pub async fn insert(pool: &PgPool, name: &str) -> Result<Partner, sqlx::Error> {
        let query = format!(
            "INSERT INTO partners (name) VALUES ($1) RETURNING {PARTNER_COLUMNS}"
        );
        sqlx::query_as::<_, Partner>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }
}
