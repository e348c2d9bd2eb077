//! Stores em memória, com a mesma semântica dos repositórios Postgres.
//!
//! Usados com `DATABASE_URL=memory` e nos testes.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    db::{OrderStore, UserStore},
    models::{
        auth::{NewUser, User},
        orders::{NewOrder, Order, OrderUpdate},
    },
};

#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<Vec<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        Ok(self.users.read().await.clone())
    }

    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let created = User {
            id: users.len() as i32 + 1,
            nome: user.nome,
            email: user.email,
            senha_hash: user.senha_hash,
            tipo: user.tipo,
            created_at: Utc::now(),
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: RwLock<Vec<Order>>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn create(&self, order: NewOrder) -> Result<Order, AppError> {
        let mut orders = self.orders.write().await;
        let now = Utc::now();
        let created = Order {
            id: orders.len() as i32 + 1,
            item: order.item,
            quantidade: order.quantidade,
            status: order.status,
            responsavel: order.responsavel,
            origem: order.origem,
            tratamento: None,
            galpao_destino: None,
            version: 0,
            created_at: now,
            updated_at: now,
        };
        orders.push(created.clone());
        Ok(created)
    }

    async fn list(&self) -> Result<Vec<Order>, AppError> {
        Ok(self.orders.read().await.clone())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, AppError> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn update_stage(
        &self,
        id: i32,
        expected_version: i32,
        update: OrderUpdate,
    ) -> Result<Option<Order>, AppError> {
        let mut orders = self.orders.write().await;
        let Some(order) = orders
            .iter_mut()
            .find(|o| o.id == id && o.version == expected_version)
        else {
            return Ok(None);
        };

        order.status = update.status;
        if let Some(tratamento) = update.tratamento {
            order.tratamento = Some(tratamento);
        }
        if let Some(galpao) = update.galpao_destino {
            order.galpao_destino = Some(galpao);
        }
        order.version += 1;
        order.updated_at = Utc::now();

        Ok(Some(order.clone()))
    }
}
