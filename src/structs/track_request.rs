use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TrackRequest {
    #[validate(length(min = 1, max = 2048, message = "page must be 1 to 2048 characters"))]
    pub page: String,
    // Falls back to the request's own User-Agent header when absent
    #[validate(length(max = 2048, message = "userAgent must be at most 2048 characters"))]
    pub user_agent: Option<String>,
    pub is_new_visit: bool,
}

#[derive(Serialize)]
pub struct TrackResponse {
    pub success: bool,
}
