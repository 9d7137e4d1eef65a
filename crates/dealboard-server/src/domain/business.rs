use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub google_place_id: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub vote_score: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateBusinessRequest {
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub google_place_id: Option<String>,
    pub website: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(default = "super::anonymous")]
    pub created_by: String,
}

/// Nullable columns use the double-`Option` shape: absent retains the
/// stored value, an explicit null clears it. `name` is NOT NULL, so null is
/// never applicable there.
#[derive(Debug, Deserialize)]
pub struct UpdateBusinessRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub google_place_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub website: Option<Option<String>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub latitude: Option<Option<f64>>,
    #[serde(default, deserialize_with = "super::double_option")]
    pub longitude: Option<Option<f64>>,
}
