// src/handlers/users.rs

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use axum_extra::extract::WithRejection;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        fields::{require, require_text},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{ManageUsers, RequireRole},
    },
    models::{
        auth::{CreateUserPayload, User},
        orders::MessageResponse,
    },
};

// GET /usuarios
#[utoipa::path(
    get,
    path = "/usuarios",
    tag = "Users",
    responses(
        (status = 200, description = "Todos os usuários, sem a senha", body = [User]),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<User>>, AppError> {
    let users = app_state.auth_service.list_users().await?;
    Ok(Json(users))
}

// POST /usuarios
#[utoipa::path(
    post,
    path = "/usuarios",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = MessageResponse),
        (status = 400, description = "Dados incompletos"),
        (status = 401, description = "Token ausente ou inválido"),
        (status = 409, description = "E-mail já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _role: RequireRole<ManageUsers>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateUserPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let nome = require_text("nome", payload.nome)?;
    let email = require_text("email", payload.email)?;
    let senha = require_text("senha", payload.senha)?;
    let tipo = require("tipo", payload.tipo)?;

    app_state
        .auth_service
        .create_user(nome, email, senha, tipo)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Usuário criado com sucesso")),
    ))
}
