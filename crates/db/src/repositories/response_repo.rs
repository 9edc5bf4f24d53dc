//! Repository for the `survey_responses` table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::response::{CreateResponse, SurveyResponse};

/// Column list for `survey_responses` queries.
const RESPONSE_COLUMNS: &str =
    "id, question_id, answer, comment, session_id, location_id, partner_id, created_at";

/// Provides survey response writes.
pub struct ResponseRepo;

impl ResponseRepo {
    /// Insert one answer for a `(question, session)` pair, idempotently.
    ///
    /// A retried submit after a false-negative network error hits the
    /// unique index and is absorbed: the existing row's id is returned and
    /// `inserted` is `false`. The answer is never silently replaced.
    pub async fn insert(
        pool: &PgPool,
        input: &CreateResponse,
    ) -> Result<(Uuid, bool), sqlx::Error> {
        let inserted: Option<Uuid> = sqlx::query_scalar(
            "INSERT INTO survey_responses \
                (question_id, answer, comment, session_id, location_id, partner_id) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT ON CONSTRAINT uq_survey_responses_question_session DO NOTHING \
             RETURNING id",
        )
        .bind(input.question_id)
        .bind(&input.answer)
        .bind(&input.comment)
        .bind(&input.session_id)
        .bind(input.location_id)
        .bind(input.partner_id)
        .fetch_optional(pool)
        .await?;

        if let Some(id) = inserted {
            return Ok((id, true));
        }

        let existing: Uuid = sqlx::query_scalar(
            "SELECT id FROM survey_responses WHERE question_id = $1 AND session_id = $2",
        )
        .bind(input.question_id)
        .bind(&input.session_id)
        .fetch_one(pool)
        .await?;
        Ok((existing, false))
    }

    /// Attach a follow-up comment to an existing response.
    ///
    /// Returns `false` when the response id is unknown.
    pub async fn add_comment(
        pool: &PgPool,
        response_id: Uuid,
        comment: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE survey_responses SET comment = $2 WHERE id = $1")
            .bind(response_id)
            .bind(comment)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// List the responses recorded for a session, oldest first.
    pub async fn list_for_session(
        pool: &PgPool,
        session_id: &str,
    ) -> Result<Vec<SurveyResponse>, sqlx::Error> {
        let query = format!(
            "SELECT {RESPONSE_COLUMNS} FROM survey_responses \
             WHERE session_id = $1 ORDER BY created_at"
        );
        sqlx::query_as::<_, SurveyResponse>(&query)
            .bind(session_id)
            .fetch_all(pool)
            .await
    }
}
