use serde::Deserialize;

use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    pub vote: i32,
}

/// A vote is exactly +1 or -1. Checked at the API boundary so an
/// out-of-range delta never reaches the store.
pub fn validate_vote(vote: i32) -> Result<(), AppError> {
    if vote != 1 && vote != -1 {
        return Err(AppError::Validation("vote must be 1 or -1".into()));
    }
    Ok(())
}
