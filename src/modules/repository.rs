//! MongoDB access shared by every stored record type.

use bson::{doc, oid::ObjectId};
use futures::TryStreamExt;
use mongodb::{Collection, Database};
use serde::{de::DeserializeOwned, Serialize};

/// A document type with its own MongoDB collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + Unpin {
    const COLLECTION_NAME: &'static str;
}

pub struct Repository<T: Record> {
    collection: Collection<T>,
}

impl<T: Record> Repository<T> {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(T::COLLECTION_NAME),
        }
    }

    pub async fn create(&self, record: &T) -> Result<(), mongodb::error::Error> {
        self.collection.insert_one(record).await?;
        Ok(())
    }

    pub async fn find_by_id(&self, id: &ObjectId) -> Result<Option<T>, mongodb::error::Error> {
        self.collection.find_one(doc! { "_id": id }).await
    }

    /// Newest first.
    pub async fn find_recent(&self, limit: i64) -> Result<Vec<T>, mongodb::error::Error> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await?;

        cursor.try_collect().await
    }

    pub async fn count(&self) -> Result<u64, mongodb::error::Error> {
        self.collection.count_documents(doc! {}).await
    }

    pub async fn delete(&self, id: &ObjectId) -> Result<bool, mongodb::error::Error> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }
}
