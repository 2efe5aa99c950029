//! 应用层：路由组装与共享状态

pub mod user;

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{FromRef, State},
    middleware,
    response::Json,
    routing::get,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::{
    config::{ApiConfig, ConfigError, Settings},
    core::{error::CoreError, middleware::request_logging_middleware, store::DocumentCollection},
};
use user::UserService;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub user_service: UserService,
    pub api: Arc<ApiConfig>,
}

impl AppState {
    pub fn new(settings: &Settings, collection: Arc<dyn DocumentCollection>) -> Self {
        Self {
            user_service: UserService::new(collection, settings.user.empty_list_not_found),
            api: Arc::new(settings.api.clone()),
        }
    }
}

/// 根据配置和文档集合组装完整的路由
pub fn create_app(
    settings: &Settings,
    collection: Arc<dyn DocumentCollection>,
) -> Result<Router, ConfigError> {
    let state = AppState::new(settings, collection);

    let mut router = Router::new()
        .route(&settings.api.docs_url, get(api_info))
        .route("/health", get(health_check))
        .nest("/user", user::routes())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(settings.cors.layer()?)
                .layer(middleware::from_fn(request_logging_middleware)),
        );

    if let Some(secs) = settings.server.request_timeout_secs {
        router = router.layer(TimeoutLayer::new(Duration::from_secs(secs)));
    }

    Ok(router.with_state(state))
}

/// API 信息
async fn api_info(State(api): State<Arc<ApiConfig>>) -> Json<Value> {
    Json(json!({
        "title": api.title,
        "description": api.description,
        "version": api.version,
        "endpoints": {
            "POST /user/add": "Add new user",
            "GET /user/list": "List all users, supports ?limit=",
            "GET /user/retrieve/:id": "Retrieve user",
            "PATCH /user/update/:id": "Update user",
            "DELETE /user/delete/:id": "Delete user",
            "GET /health": "Health check"
        }
    }))
}

/// 健康检查
async fn health_check(State(service): State<UserService>) -> Result<Json<Value>, CoreError> {
    service.ping().await?;
    Ok(Json(json!({
        "status": "healthy",
        "database": "connected"
    })))
}
