//! Testes em processo das rotas HTTP.
//!
//! O Router é montado sobre os stores em memória e executado via
//! `tower::ServiceExt::oneshot`, sem abrir socket.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sofibor_backend::{
    build_router,
    db::{MemoryOrderStore, MemoryUserStore},
    models::auth::Role,
    AppState, Config,
};
use tower::ServiceExt; // oneshot

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ADMIN_EMAIL: &str = "admin@sofibor.com";
const ADMIN_PASSWORD: &str = "admin123";

fn test_config(enforce_roles: bool) -> Config {
    Config {
        database_url: "memory".into(),
        jwt_secret: "segredo-de-teste".into(),
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        db_max_connections: 1,
        token_ttl_minutes: 15,
        bcrypt_cost: 4,
        enforce_roles,
        admin: None,
    }
}

/// Router novo com um administrador já cadastrado.
async fn make_app(enforce_roles: bool) -> (Router, AppState) {
    let state = AppState::with_stores(
        &test_config(enforce_roles),
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryOrderStore::new()),
        None,
    );
    state
        .auth_service
        .bootstrap_admin("Administrador", ADMIN_EMAIL, ADMIN_PASSWORD)
        .await
        .unwrap();
    (build_router(state.clone()), state)
}

async fn call(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let req = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = router.clone().oneshot(req).await.expect("oneshot failed");
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

async fn login(router: &Router, email: &str, senha: &str) -> String {
    let (status, body) = call(
        router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": email, "senha": senha })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn admin_token(router: &Router) -> String {
    login(router, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

async fn create_user(router: &Router, token: &str, nome: &str, email: &str, tipo: &str) {
    let (status, body) = call(
        router,
        "POST",
        "/usuarios",
        Some(token),
        Some(json!({ "nome": nome, "email": email, "senha": "senha123", "tipo": tipo })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

async fn orders(router: &Router, token: &str) -> Vec<Value> {
    let (status, body) = call(router, "GET", "/pedidos", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    body.as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Sistema
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_is_public() {
    let (router, _) = make_app(false).await;
    let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (router, _) = make_app(false).await;
    let (status, body) = call(&router, "GET", "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/tratamentos/{id}/verificar"].is_object());
}

// ---------------------------------------------------------------------------
// POST /login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_token_carries_identity() {
    let (router, state) = make_app(false).await;
    let token = admin_token(&router).await;

    let session = state.auth_service.verify_token(&token).unwrap();
    assert_eq!(session.id, 1);
    assert_eq!(session.nome, "Administrador");
    assert_eq!(session.tipo, Role::Administrador);
}

#[tokio::test]
async fn login_missing_field_is_400() {
    let (router, _) = make_app(false).await;
    let (status, body) = call(
        &router,
        "POST",
        "/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn login_with_bad_credentials_is_401() {
    let (router, _) = make_app(false).await;

    for (email, senha) in [(ADMIN_EMAIL, "errada"), ("ninguem@sofibor.com", ADMIN_PASSWORD)] {
        let (status, body) = call(
            &router,
            "POST",
            "/login",
            None,
            Some(json!({ "email": email, "senha": senha })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{email}");
        assert!(body.get("token").is_none());
    }
}

#[tokio::test]
async fn malformed_json_is_400() {
    let (router, _) = make_app(false).await;
    let req = Request::builder()
        .method("POST")
        .uri("/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ email: "))
        .unwrap();
    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// /usuarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn protected_routes_require_token() {
    let (router, _) = make_app(false).await;

    let (status, _) = call(&router, "GET", "/usuarios", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&router, "GET", "/pedidos", Some("nao.e.um.jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_users_hides_password() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;

    let (status, body) = call(&router, "GET", "/usuarios", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], ADMIN_EMAIL);
    assert_eq!(users[0]["tipo"], "administrador");
    assert!(users[0].get("senha").is_none());
    assert!(users[0].get("senha_hash").is_none());
}

#[tokio::test]
async fn created_user_can_log_in() {
    let (router, state) = make_app(false).await;
    let token = admin_token(&router).await;
    create_user(&router, &token, "Maurício", "mauricio@sofibor.com", "mauricio").await;

    let token = login(&router, "mauricio@sofibor.com", "senha123").await;
    let session = state.auth_service.verify_token(&token).unwrap();
    assert_eq!(session.tipo, Role::Mauricio);
    assert_eq!(session.nome, "Maurício");
}

#[tokio::test]
async fn create_user_validates_input() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;

    let (status, _) = call(
        &router,
        "POST",
        "/usuarios",
        Some(&token),
        Some(json!({ "nome": "Sem Tipo", "email": "x@sofibor.com", "senha": "senha123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &router,
        "POST",
        "/usuarios",
        Some(&token),
        Some(json!({ "nome": "Outro", "email": ADMIN_EMAIL, "senha": "senha123", "tipo": "cabral" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// /pedidos e transições
// ---------------------------------------------------------------------------

#[tokio::test]
async fn purchase_order_is_pending_purchase_by_cabral() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;

    let (status, body) = call(
        &router,
        "POST",
        "/pedidos",
        Some(&token),
        Some(json!({ "item": "Parafuso", "quantidade": 100 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Pedido criado com sucesso");

    let orders = orders(&router, &token).await;
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0]["item"], "Parafuso");
    assert_eq!(orders[0]["quantidade"], 100);
    assert_eq!(orders[0]["status"], "pendente");
    assert_eq!(orders[0]["origem"], "compra");
    assert_eq!(orders[0]["responsavel"], "Cabral");
    assert!(orders[0]["tratamento"].is_null());
    assert!(orders[0]["galpao_destino"].is_null());
}

#[tokio::test]
async fn order_input_is_validated() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;

    let cases = [
        ("/pedidos", json!({ "item": "Parafuso" })),
        ("/pedidos", json!({ "item": "Parafuso", "quantidade": 0 })),
        ("/recebimentos", json!({ "item": "Chapa", "quantidade": 10 })),
    ];
    for (uri, body) in cases {
        let (status, _) = call(&router, "POST", uri, Some(&token), Some(body.clone())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {body}");
    }
    assert!(orders(&router, &token).await.is_empty());
}

#[tokio::test]
async fn verify_return_needs_exact_quantity() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;

    call(
        &router,
        "POST",
        "/recebimentos",
        Some(&token),
        Some(json!({ "item": "Chapa", "quantidade": 50, "origem": "estamparia" })),
    )
    .await;
    let (status, _) = call(
        &router,
        "PUT",
        "/tratamentos/1",
        Some(&token),
        Some(json!({ "tratamento": "fosfato" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for wrong in [json!({ "quantidade": 49 }), json!({}), json!({ "quantidade": "50" })] {
        let (status, _) = call(
            &router,
            "PUT",
            "/tratamentos/1/verificar",
            Some(&token),
            Some(wrong.clone()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{wrong}");
    }
    assert_eq!(orders(&router, &token).await[0]["status"], "em tratamento");

    let (status, _) = call(
        &router,
        "PUT",
        "/tratamentos/1/verificar",
        Some(&token),
        Some(json!({ "quantidade": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders(&router, &token).await[0]["status"], "tratamento concluído");
}

#[tokio::test]
async fn unknown_order_is_404_and_leaves_store_unchanged() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;
    call(
        &router,
        "POST",
        "/pedidos",
        Some(&token),
        Some(json!({ "item": "Parafuso", "quantidade": 100 })),
    )
    .await;
    let before = orders(&router, &token).await;

    for (uri, body) in [
        ("/tratamentos/42", json!({ "tratamento": "zinco" })),
        ("/tratamentos/42/verificar", json!({ "quantidade": 100 })),
        ("/envio/42", json!({ "galpao_destino": "Samy" })),
    ] {
        let (status, _) = call(&router, "PUT", uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }

    assert_eq!(orders(&router, &token).await, before);
}

#[tokio::test]
async fn non_numeric_order_id_is_400() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;
    let (status, _) = call(
        &router,
        "PUT",
        "/envio/abc",
        Some(&token),
        Some(json!({ "galpao_destino": "Samy" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn receipt_flows_to_warehouse_through_every_status() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;

    let (status, _) = call(
        &router,
        "POST",
        "/recebimentos",
        Some(&token),
        Some(json!({ "item": "Chapa", "quantidade": 10, "origem": "estamparia" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let mut seen = vec![orders(&router, &token).await[0]["status"].clone()];

    let steps = [
        ("/tratamentos/1", json!({ "tratamento": "zinco" }), "Pedido enviado para zinco"),
        (
            "/tratamentos/1/verificar",
            json!({ "quantidade": 10 }),
            "Retorno do tratamento verificado com sucesso",
        ),
        (
            "/envio/1",
            json!({ "galpao_destino": "Samy" }),
            "Pedido enviado para o galpão Samy",
        ),
    ];
    for (uri, body, message) in steps {
        let (status, resp) = call(&router, "PUT", uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(resp["message"], message);
        seen.push(orders(&router, &token).await[0]["status"].clone());
    }

    assert_eq!(
        seen,
        vec![
            json!("recebido"),
            json!("em tratamento"),
            json!("tratamento concluído"),
            json!("enviado ao galpão"),
        ]
    );

    let order = &orders(&router, &token).await[0];
    assert_eq!(order["responsavel"], "Maurício");
    assert_eq!(order["origem"], "estamparia");
    assert_eq!(order["tratamento"], "zinco");
    assert_eq!(order["galpao_destino"], "Samy");
}

#[tokio::test]
async fn finished_order_cannot_go_back() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;
    call(
        &router,
        "POST",
        "/recebimentos",
        Some(&token),
        Some(json!({ "item": "Chapa", "quantidade": 10, "origem": "estamparia" })),
    )
    .await;
    call(&router, "PUT", "/tratamentos/1", Some(&token), Some(json!({ "tratamento": "solda" }))).await;
    call(&router, "PUT", "/tratamentos/1/verificar", Some(&token), Some(json!({ "quantidade": 10 }))).await;

    let (status, _) = call(
        &router,
        "PUT",
        "/tratamentos/1",
        Some(&token),
        Some(json!({ "tratamento": "zinco" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(orders(&router, &token).await[0]["tratamento"], "solda");
}

#[tokio::test]
async fn missing_destination_is_400() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;
    call(
        &router,
        "POST",
        "/recebimentos",
        Some(&token),
        Some(json!({ "item": "Chapa", "quantidade": 10, "origem": "estamparia" })),
    )
    .await;

    let (status, _) = call(&router, "PUT", "/envio/1", Some(&token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(orders(&router, &token).await[0]["status"], "recebido");
}

// ---------------------------------------------------------------------------
// Perfis
// ---------------------------------------------------------------------------

#[tokio::test]
async fn any_authenticated_user_may_act_by_default() {
    let (router, _) = make_app(false).await;
    let admin = admin_token(&router).await;
    create_user(&router, &admin, "Cabral", "cabral@sofibor.com", "cabral").await;
    let cabral = login(&router, "cabral@sofibor.com", "senha123").await;

    let (status, _) = call(
        &router,
        "POST",
        "/recebimentos",
        Some(&cabral),
        Some(json!({ "item": "Chapa", "quantidade": 10, "origem": "estamparia" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    create_user(&router, &cabral, "Outro", "outro@sofibor.com", "mauricio").await;
}

#[tokio::test]
async fn enforced_roles_restrict_each_stage() {
    let (router, _) = make_app(true).await;
    let admin = admin_token(&router).await;
    create_user(&router, &admin, "Cabral", "cabral@sofibor.com", "cabral").await;
    create_user(&router, &admin, "Maurício", "mauricio@sofibor.com", "mauricio").await;
    let cabral = login(&router, "cabral@sofibor.com", "senha123").await;
    let mauricio = login(&router, "mauricio@sofibor.com", "senha123").await;

    let receipt = json!({ "item": "Chapa", "quantidade": 10, "origem": "estamparia" });
    let (status, _) = call(&router, "POST", "/recebimentos", Some(&cabral), Some(receipt.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&router, "POST", "/recebimentos", Some(&mauricio), Some(receipt)).await;
    assert_eq!(status, StatusCode::CREATED);

    let purchase = json!({ "item": "Parafuso", "quantidade": 100 });
    let (status, _) = call(&router, "POST", "/pedidos", Some(&mauricio), Some(purchase.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(&router, "POST", "/pedidos", Some(&cabral), Some(purchase)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = call(
        &router,
        "POST",
        "/usuarios",
        Some(&cabral),
        Some(json!({ "nome": "X", "email": "x@sofibor.com", "senha": "senha123", "tipo": "cabral" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Listagem continua aberta a qualquer perfil
    assert_eq!(orders(&router, &cabral).await.len(), 2);
}

// ---------------------------------------------------------------------------
// Ordem das validações e limites de tamanho
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_order_wins_over_over_long_fields() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;

    for (uri, body) in [
        ("/tratamentos/42", json!({ "tratamento": "z".repeat(60) })),
        ("/envio/42", json!({ "galpao_destino": "g".repeat(60) })),
    ] {
        let (status, _) = call(&router, "PUT", uri, Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn over_long_treatment_on_existing_order_is_400() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;
    call(
        &router,
        "POST",
        "/recebimentos",
        Some(&token),
        Some(json!({ "item": "Chapa", "quantidade": 10, "origem": "estamparia" })),
    )
    .await;

    let (status, body) = call(
        &router,
        "PUT",
        "/tratamentos/1",
        Some(&token),
        Some(json!({ "tratamento": "z".repeat(60) })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"]["tratamento"].is_array());
    assert_eq!(orders(&router, &token).await[0]["status"], "recebido");
}

#[tokio::test]
async fn create_user_rejects_oversized_or_invalid_fields() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;

    let cases = [
        json!({ "nome": "n".repeat(150), "email": "longo@sofibor.com", "senha": "senha123", "tipo": "cabral" }),
        json!({ "nome": "Cabral", "email": format!("{}@sofibor.com", "e".repeat(100)), "senha": "senha123", "tipo": "cabral" }),
        json!({ "nome": "Cabral", "email": "nao-e-email", "senha": "senha123", "tipo": "cabral" }),
    ];
    for body in cases {
        let (status, resp) = call(&router, "POST", "/usuarios", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{resp}");
        assert!(resp["details"].is_object());
    }

    let (_, users) = call(&router, "GET", "/usuarios", Some(&token), None).await;
    assert_eq!(users.as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Correções na mesma etapa e quantidade numérica
// ---------------------------------------------------------------------------

#[tokio::test]
async fn treatment_and_destination_can_be_corrected() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;
    call(
        &router,
        "POST",
        "/recebimentos",
        Some(&token),
        Some(json!({ "item": "Chapa", "quantidade": 10, "origem": "estamparia" })),
    )
    .await;

    call(&router, "PUT", "/tratamentos/1", Some(&token), Some(json!({ "tratamento": "zinco" }))).await;
    let (status, body) = call(
        &router,
        "PUT",
        "/tratamentos/1",
        Some(&token),
        Some(json!({ "tratamento": "fosfato" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Pedido enviado para fosfato");

    call(&router, "PUT", "/tratamentos/1/verificar", Some(&token), Some(json!({ "quantidade": 10 }))).await;
    call(&router, "PUT", "/envio/1", Some(&token), Some(json!({ "galpao_destino": "Samy" }))).await;
    let (status, _) = call(
        &router,
        "PUT",
        "/envio/1",
        Some(&token),
        Some(json!({ "galpao_destino": "Cachoeira" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let order = &orders(&router, &token).await[0];
    assert_eq!(order["status"], "enviado ao galpão");
    assert_eq!(order["tratamento"], "fosfato");
    assert_eq!(order["galpao_destino"], "Cachoeira");
}

#[tokio::test]
async fn integral_float_quantity_is_accepted() {
    let (router, _) = make_app(false).await;
    let token = admin_token(&router).await;
    call(
        &router,
        "POST",
        "/recebimentos",
        Some(&token),
        Some(json!({ "item": "Chapa", "quantidade": 50, "origem": "estamparia" })),
    )
    .await;
    call(&router, "PUT", "/tratamentos/1", Some(&token), Some(json!({ "tratamento": "zinco" }))).await;

    let (status, _) = call(
        &router,
        "PUT",
        "/tratamentos/1/verificar",
        Some(&token),
        Some(json!({ "quantidade": 50.5 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call(
        &router,
        "PUT",
        "/tratamentos/1/verificar",
        Some(&token),
        Some(json!({ "quantidade": 50.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders(&router, &token).await[0]["status"], "tratamento concluído");
}
