//! Repository for the `wallet_passes` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::wallet_pass::WalletPass;

/// Column list for `wallet_passes` queries.
const WALLET_PASS_COLUMNS: &str = "id, claim_id, platform, pass_url, created_at";

/// Provides wallet pass recording.
pub struct WalletPassRepo;

impl WalletPassRepo {
    /// Record a pass issued by an external wallet endpoint.
    pub async fn insert(
        pool: &PgPool,
        claim_id: Uuid,
        platform: &str,
        pass_url: Option<&str>,
    ) -> Result<WalletPass, sqlx::Error> {
        let query = format!(
            "INSERT INTO wallet_passes (claim_id, platform, pass_url) \
             VALUES ($1, $2, $3) RETURNING {WALLET_PASS_COLUMNS}"
        );
        sqlx::query_as::<_, WalletPass>(&query)
            .bind(claim_id)
            .bind(platform)
            .bind(pass_url)
            .fetch_one(pool)
            .await
    }
}
