// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas
    let public_routes = Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/login", post(handlers::auth::login));

    // Todas as demais exigem um Bearer token válido
    let protected_routes = Router::new()
        .route("/usuarios"
               ,get(handlers::users::list_users)
               .post(handlers::users::create_user)
        )
        .route("/pedidos"
               ,get(handlers::orders::list_orders)
               .post(handlers::orders::create_order)
        )
        .route("/recebimentos", post(handlers::orders::register_receipt))
        .route("/tratamentos/{id}", put(handlers::orders::send_to_treatment))
        .route("/tratamentos/{id}/verificar", put(handlers::orders::verify_treatment_return))
        .route("/envio/{id}", put(handlers::orders::send_to_warehouse))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
