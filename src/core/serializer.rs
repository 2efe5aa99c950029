//! 文档序列化
//!
//! 把文档库中的文档转换为可直接返回的 JSON 对象：`_id` 重命名为字符串形式的 `id`，
//! 空输入转换为 [`CoreError::NotFound`]。

use bson::{Bson, Document};
use serde_json::{Map, Value};

use super::error::CoreError;

/// 文档库主键字段名
pub const PRIMARY_KEY: &str = "_id";

/// 返回给客户端的主键字段名
pub const ID_FIELD: &str = "id";

pub type JsonObject = Map<String, Value>;

/// 序列化单个文档，文档不存在或为空时返回 `NotFound(empty_message)`
pub fn serialize_document(
    document: Option<Document>,
    empty_message: &str,
) -> Result<JsonObject, CoreError> {
    match document {
        Some(document) if !document.is_empty() => rename_primary_key(document),
        _ => Err(CoreError::NotFound(empty_message.to_string())),
    }
}

/// 序列化文档列表，列表为空时返回 `NotFound(empty_message)`
pub fn serialize_documents(
    documents: Vec<Document>,
    empty_message: &str,
) -> Result<Vec<JsonObject>, CoreError> {
    if documents.is_empty() {
        return Err(CoreError::NotFound(empty_message.to_string()));
    }

    documents.into_iter().map(rename_primary_key).collect()
}

fn rename_primary_key(mut document: Document) -> Result<JsonObject, CoreError> {
    let id = match document.remove(PRIMARY_KEY) {
        Some(Bson::ObjectId(id)) => id.to_hex(),
        Some(Bson::String(id)) => id,
        Some(other) => other.to_string(),
        None => {
            return Err(CoreError::PreconditionViolation(format!(
                "文档缺少 `{PRIMARY_KEY}` 字段"
            )))
        }
    };

    let mut object = JsonObject::new();
    object.insert(ID_FIELD.to_string(), Value::String(id));
    for (key, value) in document {
        object.insert(key, value.into_relaxed_extjson());
    }
    Ok(object)
}
