use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use crate::{
    common::{error::AppError, fields::require_text},
    config::AppState,
    models::auth::{AuthResponse, LoginUserPayload},
};

// Handler de login
#[utoipa::path(
    post,
    path = "/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Token emitido", body = AuthResponse),
        (status = 400, description = "E-mail ou senha ausentes"),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<LoginUserPayload>, AppError>,
) -> Result<Json<AuthResponse>, AppError> {
    let email = require_text("email", payload.email)?;
    let senha = require_text("senha", payload.senha)?;

    let token = app_state.auth_service.authenticate(&email, &senha).await?;

    Ok(Json(AuthResponse { token }))
}
