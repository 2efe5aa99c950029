//! 服务配置
//!
//! 配置在启动时构造一次，随后显式传入 [`crate::app::create_app`]，不使用全局实例。
//! 加载顺序：配置文件（或默认值） -> 环境变量覆盖 -> 校验。

use axum::http::{HeaderName, HeaderValue, Method};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use validator::{Validate, ValidationError};

/// 未指定路径时依次查找的配置文件
pub const DEFAULT_CONFIG_PATHS: [&str; 2] = ["config.toml", "./config/config.toml"];

/// 服务配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// API 元数据
    #[validate(nested)]
    pub api: ApiConfig,
    /// HTTP 服务配置
    #[validate(nested)]
    pub server: ServerConfig,
    /// 跨域配置
    pub cors: CorsConfig,
    /// 文档库配置
    #[validate(nested)]
    pub database: DatabaseConfig,
    /// 日志配置
    #[validate(nested)]
    pub logging: LoggingConfig,
    /// 用户资源行为配置
    pub user: UserConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ApiConfig {
    #[validate(length(min = 1))]
    pub title: String,
    pub description: String,
    pub version: String,
    /// API 信息所在路径
    #[validate(custom(function = "validate_route_path"))]
    pub docs_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    #[validate(length(min = 1))]
    pub host: String,
    #[validate(range(min = 1))]
    pub port: u16,
    /// 请求超时时间（秒），不设置则不限制
    #[validate(range(min = 1))]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorsConfig {
    /// 允许的来源，为空表示任意来源
    pub allowed_hosts: Vec<String>,
    pub allow_credentials: bool,
    /// `*` 或逗号分隔的方法列表
    pub allow_methods: String,
    /// `*` 或逗号分隔的请求头列表
    pub allow_headers: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseBackend {
    Mongodb,
    Memory,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: DatabaseBackend,
    #[validate(length(min = 1))]
    pub url: String,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub collection: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别或 `EnvFilter` 指令，例如 `info,user_crud=debug`
    #[validate(length(min = 1))]
    pub level: String,
    pub with_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// 列表为空时返回 404 还是 200 `[]`
    pub empty_list_not_found: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: "ASYNC-MONGODB-USERS".to_string(),
            description: "Mongodb simple CRUD project".to_string(),
            version: "1.0.0".to_string(),
            docs_url: "/".to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: None,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_hosts: Vec::new(),
            allow_credentials: true,
            allow_methods: "*".to_string(),
            allow_headers: "*".to_string(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: DatabaseBackend::Mongodb,
            url: "mongodb://localhost:27017".to_string(),
            name: "users".to_string(),
            collection: "user".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            with_target: false,
        }
    }
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            empty_list_not_found: true,
        }
    }
}

/// 与固定路由冲突的路径
const RESERVED_PATHS: [&str; 2] = ["/health", "/user"];

fn validate_route_path(path: &str) -> Result<(), ValidationError> {
    if !path.starts_with('/') {
        return Err(ValidationError::new("route_path"));
    }

    let path = path.trim_end_matches('/');
    let reserved = RESERVED_PATHS.iter().any(|reserved| {
        path == *reserved
            || path
                .strip_prefix(reserved)
                .is_some_and(|rest| rest.starts_with('/'))
    });
    if reserved {
        return Err(ValidationError::new("reserved_route_path"));
    }
    Ok(())
}

impl Settings {
    /// 加载配置：显式路径 > 默认路径 > 默认值，然后应用环境变量并校验
    ///
    /// 返回实际读取的文件路径（如果有），便于日志系统初始化后记录。
    pub fn load(path: Option<&Path>) -> Result<(Self, Option<PathBuf>), ConfigError> {
        let source = match path {
            Some(path) => Some(path.to_path_buf()),
            None => DEFAULT_CONFIG_PATHS
                .iter()
                .map(PathBuf::from)
                .find(|candidate| candidate.exists()),
        };

        let mut settings = match &source {
            Some(path) => Self::load_from_file(path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.check()?;

        Ok((settings, source))
    }

    /// 从配置文件加载配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::FileRead(e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// 应用环境变量覆盖：`DB_URL`、`DB_NAME`、`HOST`、`PORT`、`LOG_LEVEL`
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DB_URL") {
            self.database.url = url;
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .parse()
                .map_err(|_| ConfigError::Parse(format!("PORT 不是合法端口: {}", port)))?;
        }
        if let Some(level) = lookup("LOG_LEVEL") {
            self.logging.level = level;
        }
        Ok(())
    }

    /// 验证配置的有效性
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        let _layer = self.cors.layer()?;
        Ok(())
    }
}

impl CorsConfig {
    /// 构造 CORS 层
    ///
    /// 浏览器不接受通配符与凭证同时出现，此时改为回显请求中的值。
    pub fn layer(&self) -> Result<CorsLayer, ConfigError> {
        let mirror = self.allow_credentials;

        let origins = if self.allowed_hosts.is_empty() || self.allowed_hosts.iter().any(|h| h == "*")
        {
            if mirror {
                AllowOrigin::mirror_request()
            } else {
                AllowOrigin::any()
            }
        } else {
            let origins = self
                .allowed_hosts
                .iter()
                .map(|host| {
                    HeaderValue::from_str(host)
                        .map_err(|_| ConfigError::Cors(format!("非法来源: {}", host)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowOrigin::list(origins)
        };

        let methods = if is_wildcard(&self.allow_methods) {
            if mirror {
                AllowMethods::mirror_request()
            } else {
                AllowMethods::any()
            }
        } else {
            let methods = split_list(&self.allow_methods)
                .map(|method| {
                    Method::from_bytes(method.to_ascii_uppercase().as_bytes())
                        .map_err(|_| ConfigError::Cors(format!("非法方法: {}", method)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowMethods::list(methods)
        };

        let headers = if is_wildcard(&self.allow_headers) {
            if mirror {
                AllowHeaders::mirror_request()
            } else {
                AllowHeaders::any()
            }
        } else {
            let headers = split_list(&self.allow_headers)
                .map(|header| {
                    HeaderName::from_bytes(header.as_bytes())
                        .map_err(|_| ConfigError::Cors(format!("非法请求头: {}", header)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            AllowHeaders::list(headers)
        };

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(headers)
            .allow_credentials(self.allow_credentials))
    }
}

fn is_wildcard(value: &str) -> bool {
    value.trim() == "*"
}

fn split_list(value: &str) -> impl Iterator<Item = &str> {
    value.split(',').map(str::trim).filter(|item| !item.is_empty())
}

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("文件读取错误: {0}")]
    FileRead(String),
    #[error("配置解析错误: {0}")]
    Parse(String),
    #[error("配置验证错误: {0}")]
    Validation(String),
    #[error("CORS 配置错误: {0}")]
    Cors(String),
}
