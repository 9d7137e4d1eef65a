use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::domain::{
    validate_parent, validate_vote, Comment, CreateCommentRequest, UpdateCommentRequest,
    VoteRequest,
};
use crate::error::{AppError, Result};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    skip: Option<i64>,
    business_id: Option<i64>,
    deal_id: Option<i64>,
}

fn default_limit() -> i64 {
    100
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Comment>>> {
    let comments: Vec<Comment> = sqlx::query_as(
        r#"
        SELECT * FROM comments
        WHERE ($1::BIGINT IS NULL OR business_id = $1)
          AND ($2::BIGINT IS NULL OR deal_id = $2)
        ORDER BY id LIMIT $3 OFFSET $4
        "#,
    )
    .bind(query.business_id)
    .bind(query.deal_id)
    .bind(query.limit)
    .bind(query.skip.unwrap_or(0))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(comments))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateCommentRequest>,
) -> Result<impl IntoResponse> {
    // First guard; the table CHECK constraint backs this up independently.
    validate_parent(req.business_id, req.deal_id)?;

    let comment: Comment = sqlx::query_as(
        r#"
        INSERT INTO comments (business_id, deal_id, text, created_by)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(req.business_id)
    .bind(req.deal_id)
    .bind(&req.text)
    .bind(&req.created_by)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn get(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Json<Comment>> {
    let comment: Comment = sqlx::query_as("SELECT * FROM comments WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::CommentNotFound(id))?;

    Ok(Json(comment))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateCommentRequest>,
) -> Result<Json<Comment>> {
    let comment: Comment = sqlx::query_as(
        "UPDATE comments SET text = COALESCE($2, text) WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(&req.text)
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::CommentNotFound(id))?;

    Ok(Json(comment))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let result = sqlx::query("DELETE FROM comments WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::CommentNotFound(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn vote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<Comment>> {
    validate_vote(req.vote)?;

    let comment: Comment =
        sqlx::query_as("UPDATE comments SET vote_score = vote_score + $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(req.vote)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::CommentNotFound(id))?;

    Ok(Json(comment))
}
