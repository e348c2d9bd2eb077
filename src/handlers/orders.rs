// src/handlers/orders.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use axum_extra::extract::WithRejection;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::{
    common::{
        error::AppError,
        fields::{require, require_text},
    },
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{Purchasing, Receiving, RequireRole},
    },
    models::orders::{MessageResponse, Order},
};

// =============================================================================
//  1. ENTRADAS (COMPRA & RECEBIMENTO)
// =============================================================================

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOrderPayload {
    #[validate(length(max = 100, message = "O item deve ter no máximo 100 caracteres."))]
    #[schema(example = "Parafuso")]
    pub item: Option<String>,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 100)]
    pub quantidade: Option<i32>,
}

// POST /pedidos
#[utoipa::path(
    post,
    path = "/pedidos",
    tag = "Orders",
    request_body = CreateOrderPayload,
    responses(
        (status = 201, description = "Pedido de compra criado como pendente", body = MessageResponse),
        (status = 400, description = "Dados incompletos ou inválidos"),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_order(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<Purchasing>,
    WithRejection(Json(payload), _): WithRejection<Json<CreateOrderPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let item = require_text("item", payload.item)?;
    let quantidade = require("quantidade", payload.quantidade)?;

    app_state
        .order_service
        .create_purchase_order(item, quantidade, &user)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Pedido criado com sucesso")),
    ))
}

// GET /pedidos
#[utoipa::path(
    get,
    path = "/pedidos",
    tag = "Orders",
    responses(
        (status = 200, description = "Todos os pedidos", body = [Order]),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_orders(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = app_state.order_service.list_orders().await?;
    Ok(Json(orders))
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterReceiptPayload {
    #[validate(length(max = 100, message = "O item deve ter no máximo 100 caracteres."))]
    #[schema(example = "Chapa")]
    pub item: Option<String>,

    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 10)]
    pub quantidade: Option<i32>,

    #[validate(length(max = 50, message = "A origem deve ter no máximo 50 caracteres."))]
    #[schema(example = "estamparia")]
    pub origem: Option<String>,
}

// POST /recebimentos
#[utoipa::path(
    post,
    path = "/recebimentos",
    tag = "Orders",
    request_body = RegisterReceiptPayload,
    responses(
        (status = 201, description = "Recebimento registrado", body = MessageResponse),
        (status = 400, description = "Dados incompletos ou inválidos"),
        (status = 401, description = "Token ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn register_receipt(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<Receiving>,
    WithRejection(Json(payload), _): WithRejection<Json<RegisterReceiptPayload>, AppError>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let item = require_text("item", payload.item)?;
    let quantidade = require("quantidade", payload.quantidade)?;
    let origem = require_text("origem", payload.origem)?;

    app_state
        .order_service
        .register_receipt(item, quantidade, origem, &user)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Recebimento registrado com sucesso")),
    ))
}

// =============================================================================
//  2. TRANSIÇÕES (TRATAMENTO & ENVIO)
// =============================================================================

// O limite de tamanho é conferido no serviço, depois da busca do pedido.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TreatmentPayload {
    #[schema(max_length = 50, example = "zinco")]
    pub tratamento: Option<String>,
}

// PUT /tratamentos/{id}
#[utoipa::path(
    put,
    path = "/tratamentos/{id}",
    tag = "Orders",
    request_body = TreatmentPayload,
    responses(
        (status = 200, description = "Pedido enviado para tratamento", body = MessageResponse),
        (status = 400, description = "Tratamento não especificado"),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Etapa atual não permite a transição")
    ),
    params(("id" = i32, Path, description = "ID do pedido")),
    security(("api_jwt" = []))
)]
pub async fn send_to_treatment(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<Receiving>,
    WithRejection(Path(order_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<TreatmentPayload>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    let order = app_state
        .order_service
        .send_to_treatment(order_id, payload.tratamento, &user)
        .await?;

    let tratamento = order.tratamento.unwrap_or_default();
    Ok(Json(MessageResponse::new(format!(
        "Pedido enviado para {tratamento}"
    ))))
}

// Inteiros passam direto; números com parte fracionária zero também.
fn integral_quantity(value: &serde_json::Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    value
        .as_f64()
        .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
        .map(|f| f as i64)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyReturnPayload {
    /// Qualquer valor que não seja numericamente igual à quantidade do pedido é divergência.
    /// `50.0` conta como `50`.
    #[schema(value_type = Option<i64>, example = 10)]
    pub quantidade: Option<serde_json::Value>,
}

// PUT /tratamentos/{id}/verificar
#[utoipa::path(
    put,
    path = "/tratamentos/{id}/verificar",
    tag = "Orders",
    request_body = VerifyReturnPayload,
    responses(
        (status = 200, description = "Retorno verificado", body = MessageResponse),
        (status = 400, description = "Quantidade incorreta ou ausente"),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Etapa atual não permite a transição")
    ),
    params(("id" = i32, Path, description = "ID do pedido")),
    security(("api_jwt" = []))
)]
pub async fn verify_treatment_return(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<Receiving>,
    WithRejection(Path(order_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<VerifyReturnPayload>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    let quantidade = payload.quantidade.as_ref().and_then(integral_quantity);

    app_state
        .order_service
        .verify_treatment_return(order_id, quantidade, &user)
        .await?;

    Ok(Json(MessageResponse::new(
        "Retorno do tratamento verificado com sucesso",
    )))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WarehousePayload {
    #[schema(max_length = 50, example = "Samy")]
    pub galpao_destino: Option<String>,
}

// PUT /envio/{id}
#[utoipa::path(
    put,
    path = "/envio/{id}",
    tag = "Orders",
    request_body = WarehousePayload,
    responses(
        (status = 200, description = "Pedido enviado ao galpão", body = MessageResponse),
        (status = 400, description = "Galpão de destino não especificado"),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Etapa atual não permite a transição")
    ),
    params(("id" = i32, Path, description = "ID do pedido")),
    security(("api_jwt" = []))
)]
pub async fn send_to_warehouse(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _role: RequireRole<Receiving>,
    WithRejection(Path(order_id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(payload), _): WithRejection<Json<WarehousePayload>, AppError>,
) -> Result<Json<MessageResponse>, AppError> {
    let order = app_state
        .order_service
        .send_to_warehouse(order_id, payload.galpao_destino, &user)
        .await?;

    let galpao = order.galpao_destino.unwrap_or_default();
    Ok(Json(MessageResponse::new(format!(
        "Pedido enviado para o galpão {galpao}"
    ))))
}
