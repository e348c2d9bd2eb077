pub mod auth;
pub mod order_service;
