use quiz_core::model::{Category, Question, QuestionId};

use super::SqliteRepository;
use super::mapping::{map_question_row, question_id_from_i64, question_id_to_i64};
use crate::repository::{NewQuestionRecord, QuestionRepository, StorageError};

fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

#[async_trait::async_trait]
impl QuestionRepository for SqliteRepository {
    async fn insert_new_question(
        &self,
        record: NewQuestionRecord,
    ) -> Result<QuestionId, StorageError> {
        let sql = format!(
            r"
            INSERT INTO {} (
                question_text, option1, option2, option3, option4,
                correct_answer, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)
            ",
            record.category.table_name()
        );
        let [o1, o2, o3, o4] = record.options;

        let res = sqlx::query(&sql)
            .bind(record.text)
            .bind(o1)
            .bind(o2)
            .bind(o3)
            .bind(o4)
            .bind(record.correct_answer)
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        question_id_from_i64(res.last_insert_rowid())
    }

    async fn list_questions(&self, category: Category) -> Result<Vec<Question>, StorageError> {
        let sql = format!(
            r"
            SELECT
                id, question_text, option1, option2, option3, option4,
                correct_answer, created_at, updated_at
            FROM {}
            ORDER BY id ASC
            ",
            category.table_name()
        );

        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(conn)?;

        let mut questions = Vec::with_capacity(rows.len());
        for row in rows {
            questions.push(map_question_row(category, &row)?);
        }
        Ok(questions)
    }

    async fn get_question(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<Option<Question>, StorageError> {
        let sql = format!(
            r"
            SELECT
                id, question_text, option1, option2, option3, option4,
                correct_answer, created_at, updated_at
            FROM {}
            WHERE id = ?1
            ",
            category.table_name()
        );

        let row = sqlx::query(&sql)
            .bind(question_id_to_i64(id)?)
            .fetch_optional(&self.pool)
            .await
            .map_err(conn)?;

        match row {
            Some(row) => map_question_row(category, &row).map(Some),
            None => Ok(None),
        }
    }

    async fn update_question(&self, question: &Question) -> Result<(), StorageError> {
        let sql = format!(
            r"
            UPDATE {}
            SET question_text = ?1,
                option1 = ?2,
                option2 = ?3,
                option3 = ?4,
                option4 = ?5,
                correct_answer = ?6,
                updated_at = ?7
            WHERE id = ?8
            ",
            question.category().table_name()
        );
        let [o1, o2, o3, o4] = question.options();

        let res = sqlx::query(&sql)
            .bind(question.text())
            .bind(o1.as_str())
            .bind(o2.as_str())
            .bind(o3.as_str())
            .bind(o4.as_str())
            .bind(question.correct_answer())
            .bind(question.updated_at())
            .bind(question_id_to_i64(question.id())?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        if res.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }
        Ok(())
    }

    async fn delete_question(
        &self,
        category: Category,
        id: QuestionId,
    ) -> Result<bool, StorageError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", category.table_name());

        let res = sqlx::query(&sql)
            .bind(question_id_to_i64(id)?)
            .execute(&self.pool)
            .await
            .map_err(conn)?;

        Ok(res.rows_affected() > 0)
    }

    async fn count_questions(&self, category: Category) -> Result<u32, StorageError> {
        let sql = format!("SELECT COUNT(*) FROM {}", category.table_name());

        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(conn)?;

        u32::try_from(count).map_err(|_| StorageError::Serialization("count overflow".into()))
    }
}
