use std::net::IpAddr;
use std::sync::Arc;

use crate::db::store::VisitorStore;

/// Shared by every handler through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn VisitorStore>,
    pub placeholder_ip: IpAddr,
}

impl AppState {
    pub fn new(store: Arc<dyn VisitorStore>, placeholder_ip: IpAddr) -> Self {
        Self {
            store,
            placeholder_ip,
        }
    }
}
