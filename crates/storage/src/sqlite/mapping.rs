use quiz_core::model::{Category, Question, QuestionId};
use sqlx::Row;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn question_id_to_i64(id: QuestionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("question_id overflow".into()))
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<QuestionId, StorageError> {
    u64::try_from(v)
        .map(QuestionId::new)
        .map_err(|_| StorageError::Serialization("question_id sign overflow".into()))
}

/// Map a row from a category table back into a domain `Question`.
///
/// The category is not stored per row; it is implied by the table the row came from.
pub(crate) fn map_question_row(
    category: Category,
    row: &sqlx::sqlite::SqliteRow,
) -> Result<Question, StorageError> {
    let options = [
        row.try_get::<String, _>("option1").map_err(ser)?,
        row.try_get::<String, _>("option2").map_err(ser)?,
        row.try_get::<String, _>("option3").map_err(ser)?,
        row.try_get::<String, _>("option4").map_err(ser)?,
    ];

    Question::from_persisted(
        question_id_from_i64(row.try_get::<i64, _>("id").map_err(ser)?)?,
        category,
        row.try_get::<String, _>("question_text").map_err(ser)?,
        options,
        row.try_get::<String, _>("correct_answer").map_err(ser)?,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
    )
    .map_err(ser)
}
