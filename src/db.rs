// src/db.rs

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::{
        auth::{NewUser, User},
        orders::{NewOrder, Order, OrderUpdate},
    },
};

pub mod memory;
pub mod order_repo;
pub mod user_repo;

pub use memory::{MemoryOrderStore, MemoryUserStore};
pub use order_repo::PgOrderRepository;
pub use user_repo::PgUserRepository;

/// Acesso à tabela de usuários.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn list(&self) -> Result<Vec<User>, AppError>;

    /// Falha com `EmailAlreadyExists` se o e-mail já estiver cadastrado.
    async fn create(&self, user: NewUser) -> Result<User, AppError>;
}

/// Acesso à tabela de pedidos.
#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn create(&self, order: NewOrder) -> Result<Order, AppError>;

    async fn list(&self) -> Result<Vec<Order>, AppError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, AppError>;

    /// Aplica `update` apenas se a versão armazenada ainda for `expected_version`.
    /// Retorna `None` quando outra escrita chegou antes.
    async fn update_stage(
        &self,
        id: i32,
        expected_version: i32,
        update: OrderUpdate,
    ) -> Result<Option<Order>, AppError>;
}
