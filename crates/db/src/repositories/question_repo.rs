//! Repository for the `questions` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::question::{CreateQuestion, Question, UpdateQuestion};

/// Column list for `questions` queries.
const QUESTION_COLUMNS: &str =
    "id, prompt, kind, options, sort_order, is_active, partner_id, created_at, updated_at";

/// Provides read/write operations for survey questions.
pub struct QuestionRepo;

impl QuestionRepo {
    /// Fetch a question by id.
    pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Question>, sqlx::Error> {
        let query = format!("SELECT {QUESTION_COLUMNS} FROM questions WHERE id = $1");
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List active questions in presentation order, optionally scoped to a
    /// partner (partner-scoped plus global questions).
    ///
    /// Ordering: `sort_order` ascending, ties broken by creation order.
    /// Returns an empty list rather than erroring when nothing matches.
    pub async fn list_active(
        pool: &PgPool,
        partner_id: Option<Uuid>,
    ) -> Result<Vec<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions \
             WHERE is_active \
               AND ($1::uuid IS NULL OR partner_id IS NULL OR partner_id = $1) \
             ORDER BY sort_order, created_at, id"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(partner_id)
            .fetch_all(pool)
            .await
    }

    /// Pick one active question uniformly at random (legacy single-sentiment
    /// flow).
    pub async fn random_active(
        pool: &PgPool,
        partner_id: Option<Uuid>,
    ) -> Result<Option<Question>, sqlx::Error> {
        let query = format!(
            "SELECT {QUESTION_COLUMNS} FROM questions \
             WHERE is_active \
               AND ($1::uuid IS NULL OR partner_id IS NULL OR partner_id = $1) \
             ORDER BY random() LIMIT 1"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(partner_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a new question, returning the created row.
    pub async fn insert(pool: &PgPool, input: &CreateQuestion) -> Result<Question, sqlx::Error> {
        let options = input
            .options
            .as_ref()
            .map(|opts| serde_json::json!(opts));
        let query = format!(
            "INSERT INTO questions (prompt, kind, options, sort_order, partner_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {QUESTION_COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(&input.prompt)
            .bind(&input.kind)
            .bind(options)
            .bind(input.sort_order.unwrap_or(0))
            .bind(input.partner_id)
            .fetch_one(pool)
            .await
    }

    /// Patch a question. Absent fields keep their current values; returns
    /// `None` when the id is unknown.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        input: &UpdateQuestion,
    ) -> Result<Option<Question>, sqlx::Error> {
        let options = input
            .options
            .as_ref()
            .map(|opts| serde_json::json!(opts));
        let query = format!(
            "UPDATE questions SET \
                prompt = COALESCE($2, prompt), \
                kind = COALESCE($3, kind), \
                options = COALESCE($4, options), \
                sort_order = COALESCE($5, sort_order), \
                is_active = COALESCE($6, is_active), \
                updated_at = now() \
             WHERE id = $1 \
             RETURNING {QUESTION_COLUMNS}"
        );
        sqlx::query_as::<_, Question>(&query)
            .bind(id)
            .bind(&input.prompt)
            .bind(&input.kind)
            .bind(options)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}
