//! DTOs for the profile endpoints.

use serde::{Deserialize, Serialize};

use crate::application::services::Profile;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    pub urls_created: i64,
    pub total_clicks: i64,
    /// Account creation date, `YYYY-MM-DD`.
    pub member_since: String,
}

impl From<Profile> for ProfileResponse {
    fn from(p: Profile) -> Self {
        Self {
            username: p.username,
            email: p.email,
            urls_created: p.urls_created,
            total_clicks: p.total_clicks,
            member_since: p.member_since.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Request body for `PUT /user/profile`.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: String,
}
