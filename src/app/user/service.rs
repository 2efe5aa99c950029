//! 用户业务服务

use std::sync::Arc;

use bson::Document;
use tracing::{debug, info};

use super::model::{CreateUser, UpdateUser};
use crate::core::{
    error::CoreError,
    object_id::MongoId,
    response::DetailResponse,
    serializer::{serialize_document, serialize_documents, JsonObject, PRIMARY_KEY},
    store::DocumentCollection,
};

pub const NO_USERS_MESSAGE: &str = "There is not user";

fn missing_user_message(id: &str) -> String {
    format!("There is not user with this id: {}", id)
}

#[derive(Clone)]
pub struct UserService {
    collection: Arc<dyn DocumentCollection>,
    empty_list_not_found: bool,
}

impl UserService {
    pub fn new(collection: Arc<dyn DocumentCollection>, empty_list_not_found: bool) -> Self {
        Self {
            collection,
            empty_list_not_found,
        }
    }

    pub async fn create_user(&self, payload: CreateUser) -> Result<JsonObject, CoreError> {
        let mut document = to_document(&payload)?;
        let id = self.collection.insert(document.clone()).await?;
        document.insert(PRIMARY_KEY, id);

        info!(user_id = %id, "用户已创建");
        serialize_document(Some(document), NO_USERS_MESSAGE)
    }

    /// `limit` 缺失或为 0 时读取全部文档
    pub async fn list_users(&self, limit: Option<u64>) -> Result<Vec<JsonObject>, CoreError> {
        let limit = match limit {
            Some(limit) if limit > 0 => limit,
            _ => self.collection.count().await?,
        };

        // 集合为空时不查询，MongoDB 会把 limit 0 当作不限制
        let documents = if limit == 0 {
            Vec::new()
        } else {
            self.collection.find(limit).await?
        };
        debug!(limit, returned = documents.len(), "读取用户列表");

        if documents.is_empty() && !self.empty_list_not_found {
            return Ok(Vec::new());
        }
        serialize_documents(documents, NO_USERS_MESSAGE)
    }

    pub async fn get_user(&self, raw_id: &str) -> Result<JsonObject, CoreError> {
        let (_, document) = self.fetch(raw_id).await?;
        serialize_document(Some(document), &missing_user_message(raw_id))
    }

    pub async fn update_user(
        &self,
        raw_id: &str,
        payload: UpdateUser,
    ) -> Result<JsonObject, CoreError> {
        let (id, mut document) = self.fetch(raw_id).await?;

        for (key, value) in to_document(&payload)? {
            document.insert(key, value);
        }

        let mut fields = document.clone();
        fields.remove(PRIMARY_KEY);
        if !fields.is_empty() {
            self.collection.set_fields(&id.object_id(), fields).await?;
        }

        info!(user_id = %id, "用户已更新");
        serialize_document(Some(document), &missing_user_message(raw_id))
    }

    pub async fn delete_user(&self, raw_id: &str) -> Result<DetailResponse, CoreError> {
        let (id, _) = self.fetch(raw_id).await?;
        self.collection.delete_by_id(&id.object_id()).await?;

        info!(user_id = %id, "用户已删除");
        Ok(DetailResponse::new(format!("User {} deleted", raw_id)))
    }

    pub async fn ping(&self) -> Result<(), CoreError> {
        self.collection.ping().await
    }

    async fn fetch(&self, raw_id: &str) -> Result<(MongoId, Document), CoreError> {
        let id: MongoId = raw_id.parse()?;
        match self.collection.find_by_id(&id.object_id()).await? {
            Some(document) if !document.is_empty() => Ok((id, document)),
            _ => Err(CoreError::NotFound(missing_user_message(raw_id))),
        }
    }
}

fn to_document<T: serde::Serialize>(value: &T) -> Result<Document, CoreError> {
    bson::to_document(value).map_err(|e| CoreError::PreconditionViolation(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::MemoryCollection;
    use serde_json::json;

    fn service(empty_list_not_found: bool) -> UserService {
        UserService::new(Arc::new(MemoryCollection::new()), empty_list_not_found)
    }

    fn create(name: &str, admin: bool) -> CreateUser {
        CreateUser {
            name: name.to_string(),
            admin,
        }
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = service(true);
        let created = service.create_user(create("joseph", false)).await.unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let fetched = service.get_user(&id).await.unwrap();
        assert_eq!(created, fetched);
        assert_eq!(fetched["name"], json!("joseph"));
        assert_eq!(fetched["admin"], json!(false));
    }

    #[tokio::test]
    async fn test_update_only_touches_given_fields() {
        let service = service(true);
        let created = service.create_user(create("a", true)).await.unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let updated = service
            .update_user(
                &id,
                UpdateUser {
                    name: Some("b".to_string()),
                    admin: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated["name"], json!("b"));
        assert_eq!(updated["admin"], json!(true));

        let stored = service.get_user(&id).await.unwrap();
        assert_eq!(stored, updated);
        assert!(!stored.contains_key(PRIMARY_KEY));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let service = service(true);
        let created = service.create_user(create("gone", false)).await.unwrap();
        let id = created["id"].as_str().unwrap().to_string();

        let detail = service.delete_user(&id).await.unwrap();
        assert_eq!(detail.detail, format!("User {} deleted", id));

        match service.get_user(&id).await {
            Err(CoreError::NotFound(msg)) => assert_eq!(msg, missing_user_message(&id)),
            other => panic!("期望 NotFound，实际为 {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_id_is_rejected_before_lookup() {
        let service = service(true);
        assert!(matches!(
            service.get_user("not-an-id").await,
            Err(CoreError::InvalidIdentifier(_))
        ));
        assert!(matches!(
            service.delete_user("123").await,
            Err(CoreError::InvalidIdentifier(_))
        ));
    }

    #[tokio::test]
    async fn test_list_limit_and_empty_policy() {
        let strict = service(true);
        assert!(matches!(
            strict.list_users(None).await,
            Err(CoreError::NotFound(msg)) if msg == NO_USERS_MESSAGE
        ));

        let lenient = service(false);
        assert!(lenient.list_users(None).await.unwrap().is_empty());

        for i in 0..5 {
            lenient
                .create_user(create(&format!("user{}", i), false))
                .await
                .unwrap();
        }
        assert_eq!(lenient.list_users(Some(2)).await.unwrap().len(), 2);
        assert_eq!(lenient.list_users(Some(0)).await.unwrap().len(), 5);
        assert_eq!(lenient.list_users(None).await.unwrap().len(), 5);
        assert_eq!(lenient.list_users(Some(50)).await.unwrap().len(), 5);
    }

    /// 空集合：任何 `find` 调用都视为错误
    struct EmptyCollection;

    #[async_trait::async_trait]
    impl DocumentCollection for EmptyCollection {
        async fn count(&self) -> Result<u64, CoreError> {
            Ok(0)
        }

        async fn find(&self, limit: u64) -> Result<Vec<Document>, CoreError> {
            Err(CoreError::PreconditionViolation(format!(
                "不应以 limit {} 查询空集合",
                limit
            )))
        }

        async fn find_by_id(
            &self,
            _id: &bson::oid::ObjectId,
        ) -> Result<Option<Document>, CoreError> {
            Ok(None)
        }

        async fn insert(&self, _document: Document) -> Result<bson::oid::ObjectId, CoreError> {
            Err(CoreError::PreconditionViolation("只读".to_string()))
        }

        async fn set_fields(
            &self,
            _id: &bson::oid::ObjectId,
            _fields: Document,
        ) -> Result<(), CoreError> {
            Ok(())
        }

        async fn delete_by_id(&self, _id: &bson::oid::ObjectId) -> Result<(), CoreError> {
            Ok(())
        }

        async fn ping(&self) -> Result<(), CoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_empty_collection_skips_find() {
        let lenient = UserService::new(Arc::new(EmptyCollection), false);
        assert!(lenient.list_users(None).await.unwrap().is_empty());
        assert!(lenient.list_users(Some(0)).await.unwrap().is_empty());

        let strict = UserService::new(Arc::new(EmptyCollection), true);
        assert!(matches!(
            strict.list_users(None).await,
            Err(CoreError::NotFound(_))
        ));
    }
}
