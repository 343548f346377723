use serde::Deserialize;

use crate::errors::AppError;

/// `?userId=` query string shared by the per-user GET endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<String>,
}

impl UserIdQuery {
    pub fn require(&self) -> Result<&str, AppError> {
        require_user_id(self.user_id.as_deref())
    }
}

/// Missing or blank user ids are a 400, not a deserialization rejection.
pub fn require_user_id(user_id: Option<&str>) -> Result<&str, AppError> {
    user_id
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| AppError::Validation("userId is required".to_string()))
}
