use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::models::visitor::{Coordinate, Visitor};

/// Which records a list or count query covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitFilter {
    All,
    NewVisitsOnly,
}

impl VisitFilter {
    pub fn matches(&self, visitor: &Visitor) -> bool {
        match self {
            VisitFilter::All => true,
            VisitFilter::NewVisitsOnly => visitor.is_new_visit,
        }
    }
}

/// Field the summary groups visits by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupField {
    Device,
    Browser,
}

impl GroupField {
    /// Stored field name.
    pub fn field_name(&self) -> &'static str {
        match self {
            GroupField::Device => "device",
            GroupField::Browser => "browser",
        }
    }

    pub fn value_of<'a>(&self, visitor: &'a Visitor) -> &'a str {
        match self {
            GroupField::Device => &visitor.device,
            GroupField::Browser => &visitor.browser,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupCount {
    pub key: String,
    pub count: u64,
}

/// Persistence for visitor records.
///
/// Every method is a single independent read or insert; implementations are
/// shared across request handlers behind an `Arc`.
#[async_trait]
pub trait VisitorStore: Send + Sync + 'static {
    async fn insert(&self, visitor: &Visitor) -> anyhow::Result<()>;

    /// Matching records, newest first.
    async fn find(&self, filter: VisitFilter) -> anyhow::Result<Vec<Visitor>>;

    async fn count(&self, filter: VisitFilter) -> anyhow::Result<u64>;

    /// Record counts per distinct value of `field`, ordered by [`rank_groups`].
    async fn group_counts(&self, field: GroupField) -> anyhow::Result<Vec<GroupCount>>;

    /// Records carrying both latitude and longitude, newest first.
    async fn coordinates(&self) -> anyhow::Result<Vec<Coordinate>>;

    async fn ping(&self) -> anyhow::Result<()>;
}

/// Count occurrences of each key, sorted by count descending then key ascending.
pub fn rank_groups<'a>(keys: impl IntoIterator<Item = &'a str>) -> Vec<GroupCount> {
    let mut tally: BTreeMap<&str, u64> = BTreeMap::new();
    for key in keys {
        *tally.entry(key).or_default() += 1;
    }

    let mut groups: Vec<GroupCount> = tally
        .into_iter()
        .map(|(key, count)| GroupCount {
            key: key.to_string(),
            count,
        })
        .collect();
    // Stable sort keeps the BTreeMap's key order among equal counts
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}
