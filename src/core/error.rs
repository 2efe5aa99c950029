//! 核心错误处理模块

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use super::response::DetailResponse;

/// 非法标识符时返回给客户端的提示
pub const INVALID_ID_MESSAGE: &str = "it must be a 12-byte input or a 24-character hex string";

/// 核心错误类型
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// 路径中的标识符不是合法的 ObjectId
    #[error("invalid identifier `{0}`: it must be a 12-byte input or a 24-character hex string")]
    InvalidIdentifier(String),
    #[error("{0}")]
    NotFound(String),
    /// 请求体或查询参数的形状不符合预期
    #[error("{0}")]
    Validation(String),
    /// 内部误用，不应出现在正常请求中
    #[error("precondition violated: {0}")]
    PreconditionViolation(String),
    #[error("database error: {0}")]
    Database(String),
}

impl CoreError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CoreError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            CoreError::NotFound(_) => StatusCode::NOT_FOUND,
            CoreError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CoreError::PreconditionViolation(_) | CoreError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = match self {
            CoreError::InvalidIdentifier(_) => INVALID_ID_MESSAGE.to_string(),
            CoreError::NotFound(msg) | CoreError::Validation(msg) => msg,
            CoreError::PreconditionViolation(ref msg) => {
                error!(detail = %msg, "内部调用违反前置条件");
                "Internal server error".to_string()
            }
            CoreError::Database(ref msg) => {
                error!(detail = %msg, "数据库操作失败");
                "Internal server error".to_string()
            }
        };

        (status, Json(DetailResponse::new(detail))).into_response()
    }
}

#[cfg(feature = "database")]
impl From<mongodb::error::Error> for CoreError {
    fn from(err: mongodb::error::Error) -> Self {
        CoreError::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            CoreError::InvalidIdentifier("abc".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CoreError::NotFound("gone".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CoreError::Validation("bad body".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            CoreError::PreconditionViolation("no _id".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_internal_errors_hide_details() {
        let response = CoreError::Database("connection refused".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["detail"], "Internal server error");
    }

    #[tokio::test]
    async fn test_invalid_identifier_body() {
        let response = CoreError::InvalidIdentifier("xyz".into()).into_response();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(body["detail"], INVALID_ID_MESSAGE);
    }
}
