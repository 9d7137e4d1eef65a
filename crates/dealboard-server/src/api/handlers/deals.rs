use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::domain::{validate_vote, CreateDealRequest, Deal, UpdateDealRequest, VoteRequest};
use crate::error::{AppError, Result};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    skip: Option<i64>,
    business_id: Option<i64>,
}

fn default_limit() -> i64 {
    100
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Deal>>> {
    let deals: Vec<Deal> = sqlx::query_as(
        r#"
        SELECT * FROM deals
        WHERE ($1::BIGINT IS NULL OR business_id = $1)
        ORDER BY id LIMIT $2 OFFSET $3
        "#,
    )
    .bind(query.business_id)
    .bind(query.limit)
    .bind(query.skip.unwrap_or(0))
    .fetch_all(&state.db)
    .await?;

    Ok(Json(deals))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateDealRequest>,
) -> Result<impl IntoResponse> {
    let deal: Deal = sqlx::query_as(
        r#"
        INSERT INTO deals (business_id, deal_type, days_active, time_start, time_end,
                           description, food_items, drink_items, pricing, tags, image_url, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
        RETURNING *
        "#,
    )
    .bind(req.business_id)
    .bind(&req.deal_type)
    .bind(&req.days_active)
    .bind(req.time_start)
    .bind(req.time_end)
    .bind(&req.description)
    .bind(&req.food_items)
    .bind(&req.drink_items)
    .bind(&req.pricing)
    .bind(&req.tags)
    .bind(&req.image_url)
    .bind(&req.created_by)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(deal)))
}

pub async fn get(State(state): State<Arc<AppState>>, Path(id): Path<i64>) -> Result<Json<Deal>> {
    let deal: Deal = sqlx::query_as("SELECT * FROM deals WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::DealNotFound(id))?;

    Ok(Json(deal))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateDealRequest>,
) -> Result<Json<Deal>> {
    // Absent fields retain stored values; a present null clears a nullable
    // column, so each one carries a presence flag alongside its value.
    let deal: Deal = sqlx::query_as(
        r#"
        UPDATE deals
        SET deal_type = COALESCE($2, deal_type),
            days_active = CASE WHEN $3 THEN $4 ELSE days_active END,
            time_start = CASE WHEN $5 THEN $6 ELSE time_start END,
            time_end = CASE WHEN $7 THEN $8 ELSE time_end END,
            description = CASE WHEN $9 THEN $10 ELSE description END,
            food_items = CASE WHEN $11 THEN $12 ELSE food_items END,
            drink_items = CASE WHEN $13 THEN $14 ELSE drink_items END,
            pricing = CASE WHEN $15 THEN $16 ELSE pricing END,
            tags = CASE WHEN $17 THEN $18 ELSE tags END,
            image_url = CASE WHEN $19 THEN $20 ELSE image_url END
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.deal_type)
    .bind(req.days_active.is_some())
    .bind(req.days_active.clone().flatten())
    .bind(req.time_start.is_some())
    .bind(req.time_start.flatten())
    .bind(req.time_end.is_some())
    .bind(req.time_end.flatten())
    .bind(req.description.is_some())
    .bind(req.description.clone().flatten())
    .bind(req.food_items.is_some())
    .bind(req.food_items.clone().flatten())
    .bind(req.drink_items.is_some())
    .bind(req.drink_items.clone().flatten())
    .bind(req.pricing.is_some())
    .bind(req.pricing.clone().flatten())
    .bind(req.tags.is_some())
    .bind(req.tags.clone().flatten())
    .bind(req.image_url.is_some())
    .bind(req.image_url.clone().flatten())
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::DealNotFound(id))?;

    Ok(Json(deal))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let result = sqlx::query("DELETE FROM deals WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::DealNotFound(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn vote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<Deal>> {
    validate_vote(req.vote)?;

    let deal: Deal =
        sqlx::query_as("UPDATE deals SET vote_score = vote_score + $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(req.vote)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::DealNotFound(id))?;

    Ok(Json(deal))
}
