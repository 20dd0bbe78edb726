// src/store/catalog.rs

//! Question catalog backed by the `quiz_sets` and `questions` tables.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool, types::Json};

use crate::{
    error::AppError,
    models::{
        question::{CreateQuestionRequest, QuestionRow},
        quiz_set::{QuizSet, QuizSetFilter, QuizSetSummary, SeedQuizSet},
    },
};

/// Bundled demo content, loaded into an empty catalog at startup.
const SEED_CATALOG: &str = include_str!("../../data/quiz_sets.json");

const QUESTION_COLUMNS: &str = "q.id, q.quiz_set_id, q.position, q.prompt, q.options, \
     q.correct_option_index, q.explanation";

/// Lists quiz sets matching the filter, newest first.
pub async fn list_quiz_sets(
    pool: &SqlitePool,
    filter: &QuizSetFilter,
) -> Result<Vec<QuizSetSummary>, AppError> {
    let mut query_builder = QueryBuilder::<Sqlite>::new(
        "SELECT s.id, s.title, s.description, s.category, s.sub_category, s.genre, s.difficulty,
            (SELECT COUNT(*) FROM questions q WHERE q.quiz_set_id = s.id) AS question_count
        FROM quiz_sets s
        WHERE 1 = 1",
    );

    if let Some(category) = &filter.category {
        query_builder.push(" AND s.category = ").push_bind(category.clone());
    }
    if let Some(sub_category) = &filter.sub_category {
        query_builder
            .push(" AND s.sub_category = ")
            .push_bind(sub_category.clone());
    }
    if let Some(genre) = &filter.genre {
        query_builder.push(" AND s.genre = ").push_bind(genre.clone());
    }
    query_builder.push(" ORDER BY s.created_at DESC, s.id");

    let sets = query_builder
        .build_query_as::<QuizSetSummary>()
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list quiz sets: {:?}", e);
            AppError::from(e)
        })?;

    Ok(sets)
}

pub async fn get_quiz_set(pool: &SqlitePool, id: &str) -> Result<Option<QuizSet>, AppError> {
    let set = sqlx::query_as::<_, QuizSet>(
        r#"
        SELECT id, title, description, category, sub_category, genre, difficulty,
            created_by, created_at
        FROM quiz_sets
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(set)
}

/// Questions of one set in their authored order.
pub async fn questions_for_set(
    pool: &SqlitePool,
    quiz_set_id: &str,
) -> Result<Vec<QuestionRow>, AppError> {
    let sql = format!(
        "SELECT {} FROM questions q WHERE q.quiz_set_id = ? ORDER BY q.position, q.id",
        QUESTION_COLUMNS
    );
    let rows = sqlx::query_as::<_, QuestionRow>(&sql)
        .bind(quiz_set_id)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Up to `limit` random questions drawn from every set of a genre.
pub async fn random_questions_for_genre(
    pool: &SqlitePool,
    genre: &str,
    limit: u32,
) -> Result<Vec<QuestionRow>, AppError> {
    let sql = format!(
        "SELECT {} FROM questions q
        JOIN quiz_sets s ON s.id = q.quiz_set_id
        WHERE s.genre = ?
        ORDER BY RANDOM()
        LIMIT ?",
        QUESTION_COLUMNS
    );
    let rows = sqlx::query_as::<_, QuestionRow>(&sql)
        .bind(genre)
        .bind(i64::from(limit))
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to draw questions for genre {}: {:?}", genre, e);
            AppError::from(e)
        })?;

    Ok(rows)
}

/// Looks up the category labels of a genre from any set that carries it.
pub async fn genre_labels(
    pool: &SqlitePool,
    genre: &str,
) -> Result<Option<(String, String)>, AppError> {
    let labels = sqlx::query_as::<_, (String, String)>(
        "SELECT category, sub_category FROM quiz_sets WHERE genre = ? LIMIT 1",
    )
    .bind(genre)
    .fetch_optional(pool)
    .await?;

    Ok(labels)
}

/// Appends a question to the end of a set. Returns the new id.
pub async fn insert_question(
    pool: &SqlitePool,
    req: &CreateQuestionRequest,
) -> Result<i64, AppError> {
    if get_quiz_set(pool, &req.quiz_set_id).await?.is_none() {
        return Err(AppError::NotFound(format!(
            "Quiz set '{}' not found",
            req.quiz_set_id
        )));
    }

    let (id,) = sqlx::query_as::<_, (i64,)>(
        r#"
        INSERT INTO questions (quiz_set_id, position, prompt, options, correct_option_index, explanation)
        VALUES (
            ?,
            (SELECT COALESCE(MAX(position) + 1, 0) FROM questions WHERE quiz_set_id = ?),
            ?, ?, ?, ?
        )
        RETURNING id
        "#,
    )
    .bind(&req.quiz_set_id)
    .bind(&req.quiz_set_id)
    .bind(&req.prompt)
    .bind(Json(&req.options))
    .bind(req.correct_option_index as i64)
    .bind(&req.explanation)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        tracing::error!("Failed to insert question: {:?}", e);
        AppError::from(e)
    })?;

    Ok(id)
}

/// Returns false when no question had that id.
pub async fn delete_question(pool: &SqlitePool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Loads the bundled catalog when no quiz set exists yet.
/// Returns the number of sets inserted.
pub async fn seed_if_empty(pool: &SqlitePool) -> Result<usize, AppError> {
    let (existing,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM quiz_sets")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        return Ok(0);
    }

    let sets: Vec<SeedQuizSet> = serde_json::from_str(SEED_CATALOG)
        .map_err(|e| AppError::InternalServerError(format!("Invalid seed catalog: {}", e)))?;

    let now = Utc::now();
    let mut tx = pool.begin().await?;

    for set in &sets {
        sqlx::query(
            r#"
            INSERT INTO quiz_sets
                (id, title, description, category, sub_category, genre, difficulty, created_by, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&set.id)
        .bind(&set.title)
        .bind(&set.description)
        .bind(&set.category)
        .bind(&set.sub_category)
        .bind(&set.genre)
        .bind(&set.difficulty)
        .bind(&set.created_by)
        .bind(now)
        .execute(&mut *tx)
        .await?;

        for (position, question) in set.questions.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO questions
                    (quiz_set_id, position, prompt, options, correct_option_index, explanation)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&set.id)
            .bind(position as i64)
            .bind(&question.prompt)
            .bind(Json(&question.options))
            .bind(question.correct_option_index as i64)
            .bind(&question.explanation)
            .execute(&mut *tx)
            .await?;
        }
    }

    tx.commit().await?;
    tracing::info!("Seeded {} quiz sets", sets.len());

    Ok(sets.len())
}
