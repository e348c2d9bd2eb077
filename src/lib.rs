//! Backend de acompanhamento de pedidos da fábrica: compra, recebimento,
//! tratamento e envio ao galpão.

pub mod common;
pub mod config;
pub mod db;
pub mod docs;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

pub use config::{AppState, Config};
pub use routes::build_router;
