use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc, oid::ObjectId};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::db::store::{GroupCount, GroupField, VisitFilter, VisitorStore};
use crate::models::visitor::{Coordinate, Visitor};

const VISITORS_COLLECTION: &str = "visitors";

/// Connect to MongoDB and select the named database
pub async fn get_database(
    mongo_url: &str,
    db_name: &str,
) -> mongodb::error::Result<(Client, Database)> {
    let client = Client::with_uri_str(mongo_url).await?;
    let db = client.database(db_name);
    Ok((client, db))
}

/// Visitor as laid out in the `visitors` collection.
///
/// String fields default to empty so documents written by older producers
/// still load.
#[derive(Serialize, Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct VisitorDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    #[serde(default)]
    ip: String,
    #[serde(default)]
    browser: String,
    #[serde(default)]
    device: String,
    #[serde(default)]
    page: String,
    #[serde(default)]
    user_agent: String,
    #[serde(default)]
    is_new_visit: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    longitude: Option<f64>,
    #[serde(default = "unix_epoch")]
    timestamp: bson::DateTime,
}

#[derive(Deserialize, Debug)]
struct CoordinateDocument {
    latitude: f64,
    longitude: f64,
    #[serde(default = "unix_epoch")]
    timestamp: bson::DateTime,
}

fn unix_epoch() -> bson::DateTime {
    bson::DateTime::from_millis(0)
}

/// Decode each row, dropping (and logging) documents that do not fit `T`
/// so one malformed record cannot fail a whole listing.
fn decode_rows<T: DeserializeOwned>(rows: Vec<Document>) -> Vec<T> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.get("_id").cloned();
            match bson::from_document::<T>(row) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    log::warn!("Skipping undecodable visitor document {:?}: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

fn to_chrono(date: bson::DateTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(date.timestamp_millis()).unwrap_or_default()
}

impl From<&Visitor> for VisitorDocument {
    fn from(visitor: &Visitor) -> Self {
        Self {
            id: None,
            ip: visitor.ip.clone(),
            browser: visitor.browser.clone(),
            device: visitor.device.clone(),
            page: visitor.page.clone(),
            user_agent: visitor.user_agent.clone(),
            is_new_visit: visitor.is_new_visit,
            latitude: visitor.latitude,
            longitude: visitor.longitude,
            timestamp: bson::DateTime::from_millis(visitor.timestamp.timestamp_millis()),
        }
    }
}

impl From<VisitorDocument> for Visitor {
    fn from(doc: VisitorDocument) -> Self {
        Self {
            id: doc.id.map(|oid| oid.to_hex()),
            ip: doc.ip,
            browser: doc.browser,
            device: doc.device,
            page: doc.page,
            user_agent: doc.user_agent,
            is_new_visit: doc.is_new_visit,
            latitude: doc.latitude,
            longitude: doc.longitude,
            timestamp: to_chrono(doc.timestamp),
        }
    }
}

fn filter_document(filter: VisitFilter) -> Document {
    match filter {
        VisitFilter::All => doc! {},
        VisitFilter::NewVisitsOnly => doc! { "isNewVisit": true },
    }
}

/// Read a `{ _id, count }` row produced by the grouping pipeline.
fn group_from_document(row: &Document) -> GroupCount {
    let key = match row.get("_id") {
        Some(Bson::String(value)) => value.clone(),
        Some(Bson::Null) | None => String::new(),
        Some(other) => other.to_string(),
    };
    let count = match row.get("count") {
        Some(Bson::Int32(n)) => *n as u64,
        Some(Bson::Int64(n)) => *n as u64,
        _ => 0,
    };
    GroupCount { key, count }
}

pub struct MongoVisitorStore {
    db: Database,
    visitors: Collection<VisitorDocument>,
    // Untyped view for reads, decoded row by row
    raw: Collection<Document>,
}

impl MongoVisitorStore {
    pub fn new(db: Database) -> Self {
        let visitors = db.collection::<VisitorDocument>(VISITORS_COLLECTION);
        let raw = visitors.clone_with_type::<Document>();
        Self { db, visitors, raw }
    }

    /// Create the indexes backing the newest-first list queries.
    pub async fn ensure_indexes(&self) -> anyhow::Result<()> {
        let indexes = vec![
            IndexModel::builder().keys(doc! { "timestamp": -1 }).build(),
            IndexModel::builder()
                .keys(doc! { "isNewVisit": 1, "timestamp": -1 })
                .build(),
        ];
        self.visitors
            .create_indexes(indexes)
            .await
            .context("failed to create visitor indexes")?;
        Ok(())
    }
}

#[async_trait]
impl VisitorStore for MongoVisitorStore {
    async fn insert(&self, visitor: &Visitor) -> anyhow::Result<()> {
        self.visitors
            .insert_one(VisitorDocument::from(visitor))
            .await
            .context("failed to insert visitor")?;
        Ok(())
    }

    async fn find(&self, filter: VisitFilter) -> anyhow::Result<Vec<Visitor>> {
        let rows = self
            .raw
            .find(filter_document(filter))
            .sort(doc! { "timestamp": -1 })
            .await
            .context("failed to query visitors")?
            .try_collect::<Vec<Document>>()
            .await
            .context("failed to read visitors")?;

        Ok(decode_rows::<VisitorDocument>(rows)
            .into_iter()
            .map(Visitor::from)
            .collect())
    }

    async fn count(&self, filter: VisitFilter) -> anyhow::Result<u64> {
        self.visitors
            .count_documents(filter_document(filter))
            .await
            .context("failed to count visitors")
    }

    async fn group_counts(&self, field: GroupField) -> anyhow::Result<Vec<GroupCount>> {
        let pipeline = vec![
            doc! { "$group": { "_id": format!("${}", field.field_name()), "count": { "$sum": 1 } } },
            doc! { "$sort": { "count": -1, "_id": 1 } },
        ];

        let rows = self
            .visitors
            .aggregate(pipeline)
            .await
            .with_context(|| format!("failed to group visitors by {}", field.field_name()))?
            .try_collect::<Vec<Document>>()
            .await
            .context("failed to read visitor groups")?;

        Ok(rows.iter().map(group_from_document).collect())
    }

    async fn coordinates(&self) -> anyhow::Result<Vec<Coordinate>> {
        let rows = self
            .raw
            .find(doc! { "latitude": { "$ne": null }, "longitude": { "$ne": null } })
            .projection(doc! { "_id": 0, "latitude": 1, "longitude": 1, "timestamp": 1 })
            .sort(doc! { "timestamp": -1 })
            .await
            .context("failed to query visitor coordinates")?
            .try_collect::<Vec<Document>>()
            .await
            .context("failed to read visitor coordinates")?;

        Ok(decode_rows::<CoordinateDocument>(rows)
            .into_iter()
            .map(|c| Coordinate {
                latitude: c.latitude,
                longitude: c.longitude,
                timestamp: to_chrono(c.timestamp),
            })
            .collect())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .context("database ping failed")?;
        Ok(())
    }
}
