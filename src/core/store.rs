//! 文档集合端口
//!
//! 处理器只依赖这个 trait，具体实现位于 `infrastructure`：MongoDB 集合或内存集合。

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};

use super::error::CoreError;

#[async_trait]
pub trait DocumentCollection: Send + Sync {
    /// 集合中的文档总数
    async fn count(&self) -> Result<u64, CoreError>;

    /// 按自然顺序读取最多 `limit` 个文档
    async fn find(&self, limit: u64) -> Result<Vec<Document>, CoreError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, CoreError>;

    /// 插入文档，主键由存储分配并返回
    async fn insert(&self, document: Document) -> Result<ObjectId, CoreError>;

    /// 覆盖指定字段，其余字段保持不变
    async fn set_fields(&self, id: &ObjectId, fields: Document) -> Result<(), CoreError>;

    async fn delete_by_id(&self, id: &ObjectId) -> Result<(), CoreError>;

    /// 健康检查
    async fn ping(&self) -> Result<(), CoreError>;
}
