use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::store::{GroupCount, GroupField, VisitFilter, VisitorStore, rank_groups};
use crate::models::visitor::{Coordinate, Visitor};

/// Process-local store. Contents are lost on shutdown.
#[derive(Default)]
pub struct MemoryVisitorStore {
    visitors: RwLock<Vec<Visitor>>,
}

impl MemoryVisitorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed records as-is, e.g. located visits written by another producer.
    pub async fn with_visitors(visitors: Vec<Visitor>) -> Self {
        let store = Self::new();
        for visitor in visitors {
            store.push(visitor).await;
        }
        store
    }

    async fn push(&self, mut visitor: Visitor) {
        if visitor.id.is_none() {
            visitor.id = Some(ObjectId::new().to_hex());
        }
        self.visitors.write().await.push(visitor);
    }

    /// Newest first; equal timestamps keep reverse insertion order.
    fn newest_first(visitors: &[Visitor], filter: VisitFilter) -> Vec<Visitor> {
        let mut matching: Vec<Visitor> = visitors
            .iter()
            .rev()
            .filter(|v| filter.matches(v))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching
    }
}

#[async_trait]
impl VisitorStore for MemoryVisitorStore {
    async fn insert(&self, visitor: &Visitor) -> anyhow::Result<()> {
        self.push(visitor.clone()).await;
        Ok(())
    }

    async fn find(&self, filter: VisitFilter) -> anyhow::Result<Vec<Visitor>> {
        let visitors = self.visitors.read().await;
        Ok(Self::newest_first(&visitors, filter))
    }

    async fn count(&self, filter: VisitFilter) -> anyhow::Result<u64> {
        let visitors = self.visitors.read().await;
        Ok(visitors.iter().filter(|v| filter.matches(v)).count() as u64)
    }

    async fn group_counts(&self, field: GroupField) -> anyhow::Result<Vec<GroupCount>> {
        let visitors = self.visitors.read().await;
        Ok(rank_groups(visitors.iter().map(|v| field.value_of(v))))
    }

    async fn coordinates(&self) -> anyhow::Result<Vec<Coordinate>> {
        let visitors = self.visitors.read().await;
        Ok(Self::newest_first(&visitors, VisitFilter::All)
            .into_iter()
            .filter_map(|v| {
                v.location().map(|(latitude, longitude)| Coordinate {
                    latitude,
                    longitude,
                    timestamp: v.timestamp,
                })
            })
            .collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
