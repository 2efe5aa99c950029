//! # 用户 CRUD 服务
//!
//! 基于 Axum 和 MongoDB 的单资源 CRUD 服务：
//! - `core`：错误、标识符编解码、文档序列化、文档集合端口
//! - `app`：路由与用户资源处理器
//! - `infrastructure`：MongoDB / 内存集合实现与日志初始化
//! - `config`：显式构造并注入的配置

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{create_app, AppState};
pub use config::{ConfigError, Settings};
pub use crate::core::{CoreError, DocumentCollection, MongoId};
