use serde::Serialize;

use crate::db::store::GroupCount;
use crate::models::visitor::Coordinate;

#[derive(Serialize, Debug)]
pub struct DeviceCount {
    pub device: String,
    pub count: u64,
}

impl From<GroupCount> for DeviceCount {
    fn from(group: GroupCount) -> Self {
        Self {
            device: group.key,
            count: group.count,
        }
    }
}

#[derive(Serialize, Debug)]
pub struct BrowserCount {
    pub browser: String,
    pub count: u64,
}

impl From<GroupCount> for BrowserCount {
    fn from(group: GroupCount) -> Self {
        Self {
            browser: group.key,
            count: group.count,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VisitSummaryResponse {
    pub total_unique: u64,
    pub total_visits: u64,
    pub by_device: Vec<DeviceCount>,
    pub by_browser: Vec<BrowserCount>,
    pub coordinates: Vec<Coordinate>,
}
