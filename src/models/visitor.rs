use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One tracked page visit. Records are never mutated once created.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Visitor {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub ip: String,
    pub browser: String, // "<name> <version>"
    pub device: String,
    pub page: String,
    pub user_agent: String, // Raw, stored verbatim
    pub is_new_visit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    pub timestamp: DateTime<Utc>, // Always server-assigned
}

impl Visitor {
    pub fn new(
        ip: String,
        browser: String,
        device: String,
        page: String,
        user_agent: String,
        is_new_visit: bool,
    ) -> Self {
        Self {
            id: None,
            ip,
            browser,
            device,
            page,
            user_agent,
            is_new_visit,
            latitude: None,
            longitude: None,
            timestamp: Utc::now(),
        }
    }

    /// Both coordinates, if the record carries a location.
    pub fn location(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// A located visit as reported by the summary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
}
