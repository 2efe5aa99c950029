//! 内存文档集合
//!
//! 按插入顺序保存文档，用于测试以及 `backend = "memory"` 的本地运行。

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};
use tokio::sync::RwLock;

use crate::core::{error::CoreError, serializer::PRIMARY_KEY, store::DocumentCollection};

#[derive(Debug, Default)]
pub struct MemoryCollection {
    documents: RwLock<Vec<Document>>,
}

impl MemoryCollection {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    matches!(document.get_object_id(PRIMARY_KEY), Ok(found) if found == *id)
}

#[async_trait]
impl DocumentCollection for MemoryCollection {
    async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.documents.read().await.len() as u64)
    }

    async fn find(&self, limit: u64) -> Result<Vec<Document>, CoreError> {
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, CoreError> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .find(|document| has_id(document, id))
            .cloned())
    }

    async fn insert(&self, document: Document) -> Result<ObjectId, CoreError> {
        let id = ObjectId::new();
        let mut stored = Document::new();
        stored.insert(PRIMARY_KEY, id);
        for (key, value) in document {
            if key != PRIMARY_KEY {
                stored.insert(key, value);
            }
        }
        self.documents.write().await.push(stored);
        Ok(id)
    }

    async fn set_fields(&self, id: &ObjectId, fields: Document) -> Result<(), CoreError> {
        let mut documents = self.documents.write().await;
        if let Some(document) = documents.iter_mut().find(|document| has_id(document, id)) {
            for (key, value) in fields {
                document.insert(key, value);
            }
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<(), CoreError> {
        self.documents
            .write()
            .await
            .retain(|document| !has_id(document, id));
        Ok(())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[tokio::test]
    async fn test_insert_assigns_primary_key() {
        let collection = MemoryCollection::new();
        let id = collection.insert(doc! { "name": "joseph" }).await.unwrap();

        let stored = collection.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.get_object_id(PRIMARY_KEY).unwrap(), id);
        assert_eq!(stored.get_str("name").unwrap(), "joseph");
        assert_eq!(collection.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_find_respects_limit_and_order() {
        let collection = MemoryCollection::new();
        for i in 0..5 {
            collection.insert(doc! { "n": i }).await.unwrap();
        }

        let documents = collection.find(2).await.unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].get_i32("n").unwrap(), 0);
        assert_eq!(documents[1].get_i32("n").unwrap(), 1);
        assert!(collection.find(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_fields_and_delete() {
        let collection = MemoryCollection::new();
        let id = collection
            .insert(doc! { "name": "a", "admin": true })
            .await
            .unwrap();

        collection
            .set_fields(&id, doc! { "name": "b" })
            .await
            .unwrap();
        let stored = collection.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.get_str("name").unwrap(), "b");
        assert!(stored.get_bool("admin").unwrap());

        collection.delete_by_id(&id).await.unwrap();
        assert!(collection.find_by_id(&id).await.unwrap().is_none());
        assert_eq!(collection.count().await.unwrap(), 0);
    }
}
