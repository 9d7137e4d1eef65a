use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Comment {
    pub id: i64,
    pub business_id: Option<i64>,
    pub deal_id: Option<i64>,
    pub text: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub vote_score: i32,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub text: String,
    pub business_id: Option<i64>,
    pub deal_id: Option<i64>,
    #[serde(default = "super::anonymous")]
    pub created_by: String,
}

/// Text is the only mutable field; a comment can never be relinked to a
/// different parent after creation.
#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub text: Option<String>,
}

/// A comment attaches to exactly one parent: a business XOR a deal.
///
/// This runs at the API boundary before anything touches the store; the
/// `comment_belongs_to_business_or_deal` CHECK constraint enforces the same
/// rule independently at the database layer.
pub fn validate_parent(business_id: Option<i64>, deal_id: Option<i64>) -> Result<(), AppError> {
    if business_id.is_some() == deal_id.is_some() {
        return Err(AppError::Validation(
            "comment must belong to either a business or a deal, not both".into(),
        ));
    }
    Ok(())
}
