use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Deal {
    pub id: i64,
    pub business_id: i64,
    pub deal_type: String,
    pub days_active: Option<Vec<String>>,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
    pub description: Option<String>,
    pub food_items: Option<String>,
    pub drink_items: Option<String>,
    pub pricing: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub vote_score: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateDealRequest {
    pub business_id: i64,
    pub deal_type: String,
    pub days_active: Option<Vec<String>>,
    pub time_start: Option<NaiveTime>,
    pub time_end: Option<NaiveTime>,
    pub description: Option<String>,
    pub food_items: Option<String>,
    pub drink_items: Option<String>,
    pub pricing: Option<String>,
    pub tags: Option<Vec<String>>,
    pub image_url: Option<String>,
    #[serde(default = "super::anonymous")]
    pub created_by: String,
}

/// Nullable columns use the double-`Option` shape: absent retains the
/// stored value, an explicit null clears it. `deal_type` is NOT NULL.
#[derive(Debug, Deserialize)]
pub struct UpdateDealRequest {
    pub deal_type: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub days_active: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub time_start: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub time_end: Option<Option<NaiveTime>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub food_items: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub drink_items: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub pricing: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub tags: Option<Option<Vec<String>>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub image_url: Option<Option<String>>,
}
