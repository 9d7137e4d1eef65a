use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::domain::{Business, Deal, EnrichedDeal};
use crate::error::Result;
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

/// Deals joined with their business for the frontend. Deals whose business
/// is gone are skipped rather than surfaced as an error.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<EnrichedDeal>>> {
    let deals: Vec<Deal> = sqlx::query_as("SELECT * FROM deals ORDER BY id LIMIT $1 OFFSET $2")
        .bind(query.limit)
        .bind(query.skip.unwrap_or(0))
        .fetch_all(&state.db)
        .await?;

    let business_ids: Vec<i64> = deals.iter().map(|d| d.business_id).collect();
    let businesses: Vec<Business> =
        sqlx::query_as("SELECT * FROM businesses WHERE id = ANY($1)")
            .bind(&business_ids)
            .fetch_all(&state.db)
            .await?;
    let by_id: HashMap<i64, Business> = businesses.into_iter().map(|b| (b.id, b)).collect();

    let enriched = deals
        .into_iter()
        .filter_map(|deal| {
            by_id
                .get(&deal.business_id)
                .map(|business| EnrichedDeal::project(deal, business))
        })
        .collect();

    Ok(Json(enriched))
}
