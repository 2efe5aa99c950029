//! 用户处理器

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};

use super::{
    model::{CreateUser, ListUsersQuery, UpdateUser},
    service::UserService,
};
use crate::core::{
    error::CoreError,
    extract::{ValidJson, ValidQuery},
    response::DetailResponse,
    serializer::JsonObject,
};

pub async fn create_user(
    State(service): State<UserService>,
    ValidJson(payload): ValidJson<CreateUser>,
) -> Result<(StatusCode, Json<JsonObject>), CoreError> {
    let user = service.create_user(payload).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn list_users(
    State(service): State<UserService>,
    ValidQuery(query): ValidQuery<ListUsersQuery>,
) -> Result<Json<Vec<JsonObject>>, CoreError> {
    let users = service.list_users(query.limit).await?;
    Ok(Json(users))
}

pub async fn retrieve_user(
    State(service): State<UserService>,
    Path(id): Path<String>,
) -> Result<Json<JsonObject>, CoreError> {
    let user = service.get_user(&id).await?;
    Ok(Json(user))
}

pub async fn update_user(
    State(service): State<UserService>,
    Path(id): Path<String>,
    ValidJson(payload): ValidJson<UpdateUser>,
) -> Result<(StatusCode, Json<JsonObject>), CoreError> {
    let user = service.update_user(&id, payload).await?;
    Ok((StatusCode::ACCEPTED, Json(user)))
}

pub async fn delete_user(
    State(service): State<UserService>,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<DetailResponse>), CoreError> {
    let detail = service.delete_user(&id).await?;
    Ok((StatusCode::ACCEPTED, Json(detail)))
}
