//! Survey question entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use perkflow_core::error::CoreError;
use perkflow_core::survey::QuestionKind;
use perkflow_core::types::Timestamp;

/// A row from the `questions` table.
///
/// `options` is a JSON array of strings for multiple-choice and
/// ranked-choice questions, NULL otherwise.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Question {
    pub id: Uuid,
    pub prompt: String,
    pub kind: String,
    pub options: Option<serde_json::Value>,
    pub sort_order: i32,
    pub is_active: bool,
    pub partner_id: Option<Uuid>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Question {
    /// The parsed question kind.
    pub fn parsed_kind(&self) -> Result<QuestionKind, CoreError> {
        QuestionKind::parse(&self.kind)
    }

    /// The declared options as a string list, if any.
    pub fn option_list(&self) -> Option<Vec<String>> {
        let values = self.options.as_ref()?.as_array()?;
        Some(
            values
                .iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect(),
        )
    }
}

/// DTO for creating a question.
#[derive(Debug, Deserialize)]
pub struct CreateQuestion {
    pub prompt: String,
    pub kind: String,
    pub options: Option<Vec<String>>,
    pub sort_order: Option<i32>,
    pub partner_id: Option<Uuid>,
}

/// DTO for updating a question (all fields optional).
#[derive(Debug, Deserialize)]
pub struct UpdateQuestion {
    pub prompt: Option<String>,
    pub kind: Option<String>,
    pub options: Option<Vec<String>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
