// src/store/history.rs

//! Completed-session history backed by the `quiz_history` table.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, types::Json};

use crate::{
    error::AppError,
    live::{CompletedSession, ResultSink},
    models::history::{HistoryFilter, HistoryRecord},
    quiz::HistoryStats,
};

const HISTORY_COLUMNS: &str = "id, user_id, quiz_set_id, quiz_set_title, category, sub_category, \
     genre, score, correct_count, total_questions, total_time_spent_seconds, answers, completed_at";

#[derive(Clone)]
pub struct HistoryStore {
    pool: SqlitePool,
}

impl HistoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Writes one completed session. Saving the same session twice is a no-op.
    pub async fn save(&self, completed: &CompletedSession) -> Result<(), AppError> {
        let meta = &completed.meta;
        let result = &completed.result;

        sqlx::query(
            r#"
            INSERT INTO quiz_history
                (id, user_id, quiz_set_id, quiz_set_title, category, sub_category, genre,
                 score, correct_count, total_questions, total_time_spent_seconds, answers, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(completed.session_id.to_string())
        .bind(meta.user_id)
        .bind(&meta.quiz_set_id)
        .bind(&meta.title)
        .bind(&meta.category)
        .bind(&meta.sub_category)
        .bind(&meta.genre)
        .bind(result.score_percentage)
        .bind(result.correct_count as i64)
        .bind(result.total_questions as i64)
        .bind(result.total_time_spent_seconds as i64)
        .bind(Json(&result.answers))
        .bind(completed.completed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to save history {}: {:?}", completed.session_id, e);
            AppError::from(e)
        })?;

        Ok(())
    }

    /// The user's history matching the filter, newest first.
    pub async fn list(
        &self,
        user_id: i64,
        filter: &HistoryFilter,
    ) -> Result<Vec<HistoryRecord>, AppError> {
        let mut query_builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM quiz_history WHERE user_id = ",
            HISTORY_COLUMNS
        ));
        query_builder.push_bind(user_id);

        if let Some(category) = &filter.category {
            query_builder.push(" AND category = ").push_bind(category.clone());
        }
        if let Some(sub_category) = &filter.sub_category {
            query_builder
                .push(" AND sub_category = ")
                .push_bind(sub_category.clone());
        }
        if let Some(genre) = &filter.genre {
            query_builder.push(" AND genre = ").push_bind(genre.clone());
        }
        query_builder.push(" ORDER BY completed_at DESC");

        let records = query_builder
            .build_query_as::<HistoryRecord>()
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    pub async fn get(&self, user_id: i64, id: &str) -> Result<Option<HistoryRecord>, AppError> {
        let sql = format!(
            "SELECT {} FROM quiz_history WHERE id = ? AND user_id = ?",
            HISTORY_COLUMNS
        );
        let record = sqlx::query_as::<_, HistoryRecord>(&sql)
            .bind(id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(record)
    }

    /// Returns false when nothing was deleted.
    pub async fn delete(&self, user_id: i64, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quiz_history WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Removes all of the user's history. Returns the number of rows removed.
    pub async fn clear(&self, user_id: i64) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM quiz_history WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    pub async fn stats(
        &self,
        user_id: i64,
        filter: &HistoryFilter,
    ) -> Result<HistoryStats, AppError> {
        let records = self.list(user_id, filter).await?;
        Ok(HistoryStats::from_samples(records.iter().map(HistoryRecord::sample)))
    }
}

#[async_trait]
impl ResultSink for HistoryStore {
    async fn record(&self, completed: &CompletedSession) -> Result<(), AppError> {
        self.save(completed).await
    }
}
