//! 核心响应处理模块

use serde::{Deserialize, Serialize};

/// 只携带一条说明信息的响应体，错误和删除确认共用
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailResponse {
    pub detail: String,
}

impl DetailResponse {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}
