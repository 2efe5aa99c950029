//! 用户资源：`/user` 下的五个 CRUD 端点

pub mod handler;
pub mod model;
pub mod service;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};

use super::AppState;

pub use model::{CreateUser, ListUsersQuery, UpdateUser, User};
pub use service::UserService;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/add", post(handler::create_user))
        .route("/list", get(handler::list_users))
        .route("/retrieve/:id", get(handler::retrieve_user))
        .route("/update/:id", patch(handler::update_user))
        .route("/delete/:id", delete(handler::delete_user))
}
