// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::OpenApi;

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::login,

        // --- Users ---
        handlers::users::list_users,
        handlers::users::create_user,

        // --- Orders ---
        handlers::orders::create_order,
        handlers::orders::list_orders,
        handlers::orders::register_receipt,
        handlers::orders::send_to_treatment,
        handlers::orders::verify_treatment_return,
        handlers::orders::send_to_warehouse,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::LoginUserPayload,
            models::auth::CreateUserPayload,
            models::auth::AuthResponse,

            // --- Orders ---
            models::orders::OrderStatus,
            models::orders::Order,
            models::orders::MessageResponse,

            // --- Payloads ---
            handlers::orders::CreateOrderPayload,
            handlers::orders::RegisterReceiptPayload,
            handlers::orders::TreatmentPayload,
            handlers::orders::VerifyReturnPayload,
            handlers::orders::WarehousePayload,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação"),
        (name = "Users", description = "Gestão de usuários (administrador)"),
        (name = "Orders", description = "Pedidos: compra, recebimento, tratamento e envio ao galpão")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
