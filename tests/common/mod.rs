#![allow(dead_code)]

use std::net::IpAddr;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};

use visit_tracker::db::store::{GroupCount, GroupField, VisitFilter, VisitorStore};
use visit_tracker::models::visitor::{Coordinate, Visitor};
use visit_tracker::state::app_state::AppState;

pub const CHROME_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
pub const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";

pub fn placeholder_ip() -> IpAddr {
    "8.8.8.8".parse().unwrap()
}

pub fn state_with(store: Arc<dyn VisitorStore>) -> actix_web::web::Data<AppState> {
    actix_web::web::Data::new(AppState::new(store, placeholder_ip()))
}

/// A stored visit from `minutes_ago` minutes back.
pub fn visitor(
    page: &str,
    device: &str,
    browser: &str,
    is_new_visit: bool,
    minutes_ago: i64,
) -> Visitor {
    let mut visitor = Visitor::new(
        "203.0.113.1".to_string(),
        browser.to_string(),
        device.to_string(),
        page.to_string(),
        "fixture".to_string(),
        is_new_visit,
    );
    visitor.timestamp = Utc::now() - Duration::minutes(minutes_ago);
    visitor
}

/// Store whose every operation fails, as if the database were unreachable.
pub struct FailingStore;

fn unavailable<T>() -> anyhow::Result<T> {
    Err(anyhow::anyhow!("connection refused"))
}

#[async_trait]
impl VisitorStore for FailingStore {
    async fn insert(&self, _visitor: &Visitor) -> anyhow::Result<()> {
        unavailable()
    }

    async fn find(&self, _filter: VisitFilter) -> anyhow::Result<Vec<Visitor>> {
        unavailable()
    }

    async fn count(&self, _filter: VisitFilter) -> anyhow::Result<u64> {
        unavailable()
    }

    async fn group_counts(&self, _field: GroupField) -> anyhow::Result<Vec<GroupCount>> {
        unavailable()
    }

    async fn coordinates(&self) -> anyhow::Result<Vec<Coordinate>> {
        unavailable()
    }

    async fn ping(&self) -> anyhow::Result<()> {
        unavailable()
    }
}
