use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::domain::{
    validate_vote, Business, CreateBusinessRequest, UpdateBusinessRequest, VoteRequest,
};
use crate::error::{AppError, Result};
use crate::AppState;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    limit: i64,
    skip: Option<i64>,
}

fn default_limit() -> i64 {
    100
}

pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Business>>> {
    let businesses: Vec<Business> =
        sqlx::query_as("SELECT * FROM businesses ORDER BY id LIMIT $1 OFFSET $2")
            .bind(query.limit)
            .bind(query.skip.unwrap_or(0))
            .fetch_all(&state.db)
            .await?;

    Ok(Json(businesses))
}

pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateBusinessRequest>,
) -> Result<impl IntoResponse> {
    let business: Business = sqlx::query_as(
        r#"
        INSERT INTO businesses (name, address, phone, google_place_id, website, latitude, longitude, created_by)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        RETURNING *
        "#,
    )
    .bind(&req.name)
    .bind(&req.address)
    .bind(&req.phone)
    .bind(&req.google_place_id)
    .bind(&req.website)
    .bind(req.latitude)
    .bind(req.longitude)
    .bind(&req.created_by)
    .fetch_one(&state.db)
    .await?;

    Ok((StatusCode::CREATED, Json(business)))
}

pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Business>> {
    let business: Business = sqlx::query_as("SELECT * FROM businesses WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.db)
        .await?
        .ok_or(AppError::BusinessNotFound(id))?;

    Ok(Json(business))
}

pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateBusinessRequest>,
) -> Result<Json<Business>> {
    // Absent fields retain stored values; a present null clears a nullable
    // column, so each one carries a presence flag alongside its value.
    let business: Business = sqlx::query_as(
        r#"
        UPDATE businesses
        SET name = COALESCE($2, name),
            address = CASE WHEN $3 THEN $4 ELSE address END,
            phone = CASE WHEN $5 THEN $6 ELSE phone END,
            google_place_id = CASE WHEN $7 THEN $8 ELSE google_place_id END,
            website = CASE WHEN $9 THEN $10 ELSE website END,
            latitude = CASE WHEN $11 THEN $12 ELSE latitude END,
            longitude = CASE WHEN $13 THEN $14 ELSE longitude END
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&req.name)
    .bind(req.address.is_some())
    .bind(req.address.clone().flatten())
    .bind(req.phone.is_some())
    .bind(req.phone.clone().flatten())
    .bind(req.google_place_id.is_some())
    .bind(req.google_place_id.clone().flatten())
    .bind(req.website.is_some())
    .bind(req.website.clone().flatten())
    .bind(req.latitude.is_some())
    .bind(req.latitude.flatten())
    .bind(req.longitude.is_some())
    .bind(req.longitude.flatten())
    .fetch_optional(&state.db)
    .await?
    .ok_or(AppError::BusinessNotFound(id))?;

    Ok(Json(business))
}

pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let result = sqlx::query("DELETE FROM businesses WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::BusinessNotFound(id));
    }

    Ok(StatusCode::NO_CONTENT)
}

pub async fn vote(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<VoteRequest>,
) -> Result<Json<Business>> {
    validate_vote(req.vote)?;

    // Incremented in the store, so concurrent votes never lose updates.
    let business: Business =
        sqlx::query_as("UPDATE businesses SET vote_score = vote_score + $2 WHERE id = $1 RETURNING *")
            .bind(id)
            .bind(req.vote)
            .fetch_optional(&state.db)
            .await?
            .ok_or(AppError::BusinessNotFound(id))?;

    Ok(Json(business))
}
