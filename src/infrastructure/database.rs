//! 数据库基础设施

use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use futures_util::TryStreamExt;
use mongodb::{
    options::{ClientOptions, FindOptions},
    Client, Collection, Database,
};
use tracing::{info, warn};

use crate::{
    config::DatabaseConfig,
    core::{error::CoreError, serializer::PRIMARY_KEY, store::DocumentCollection},
};

/// 持有 MongoDB 客户端，生命周期与进程一致
pub struct DatabaseManager {
    client: Client,
    database: Database,
}

impl DatabaseManager {
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, CoreError> {
        let mut options = ClientOptions::parse(&config.url).await?;
        options.app_name = Some(env!("CARGO_PKG_NAME").to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&config.name);

        // 驱动是惰性连接的，这里只做一次探测
        match database.run_command(doc! { "ping": 1 }, None).await {
            Ok(_) => info!(database = %config.name, "MongoDB 连接成功"),
            Err(e) => warn!(database = %config.name, error = %e, "MongoDB 暂不可达"),
        }

        Ok(Self { client, database })
    }

    pub fn collection(&self, name: &str) -> MongoCollection {
        MongoCollection {
            database: self.database.clone(),
            collection: self.database.collection::<Document>(name),
        }
    }

    /// 关闭客户端并等待后台连接池退出
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        info!("MongoDB 客户端已关闭");
    }
}

#[derive(Clone)]
pub struct MongoCollection {
    database: Database,
    collection: Collection<Document>,
}

fn by_id(id: &ObjectId) -> Document {
    let mut filter = Document::new();
    filter.insert(PRIMARY_KEY, *id);
    filter
}

#[async_trait]
impl DocumentCollection for MongoCollection {
    async fn count(&self) -> Result<u64, CoreError> {
        Ok(self.collection.count_documents(doc! {}, None).await?)
    }

    async fn find(&self, limit: u64) -> Result<Vec<Document>, CoreError> {
        // MongoDB 中 limit 为 0 表示不限制，UserService::list_users 已先行拦截
        if limit == 0 {
            return Ok(Vec::new());
        }

        let options = FindOptions::builder()
            .limit(i64::try_from(limit).unwrap_or(i64::MAX))
            .build();
        let cursor = self.collection.find(doc! {}, options).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, CoreError> {
        Ok(self.collection.find_one(by_id(id), None).await?)
    }

    async fn insert(&self, document: Document) -> Result<ObjectId, CoreError> {
        let result = self.collection.insert_one(document, None).await?;
        result.inserted_id.as_object_id().ok_or_else(|| {
            CoreError::PreconditionViolation(format!(
                "插入结果的主键不是 ObjectId: {}",
                result.inserted_id
            ))
        })
    }

    async fn set_fields(&self, id: &ObjectId, fields: Document) -> Result<(), CoreError> {
        self.collection
            .update_one(by_id(id), doc! { "$set": fields }, None)
            .await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<(), CoreError> {
        self.collection.delete_one(by_id(id), None).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), CoreError> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
