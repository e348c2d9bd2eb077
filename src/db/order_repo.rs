// src/db/order_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::OrderStore,
    models::orders::{NewOrder, Order, OrderUpdate},
};

const ORDER_COLUMNS: &str = "id, item, quantidade, status, responsavel, origem, tratamento, \
                             galpao_destino, version, created_at, updated_at";

#[derive(Clone)]
pub struct PgOrderRepository {
    pool: PgPool,
}

impl PgOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OrderStore for PgOrderRepository {
    async fn create(&self, order: NewOrder) -> Result<Order, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO pedidos (item, quantidade, status, responsavel, origem)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(&order.item)
        .bind(order.quantidade)
        .bind(order.status)
        .bind(&order.responsavel)
        .bind(&order.origem)
        .fetch_one(&self.pool)
        .await?;

        Ok(order)
    }

    async fn list(&self) -> Result<Vec<Order>, AppError> {
        let orders =
            sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM pedidos ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;

        Ok(orders)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Order>, AppError> {
        let order =
            sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM pedidos WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(order)
    }

    // Compare-and-swap na coluna version: zero linhas afetadas significa que perdemos a corrida.
    async fn update_stage(
        &self,
        id: i32,
        expected_version: i32,
        update: OrderUpdate,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE pedidos
            SET status = $1,
                tratamento = COALESCE($2, tratamento),
                galpao_destino = COALESCE($3, galpao_destino),
                version = version + 1,
                updated_at = NOW()
            WHERE id = $4 AND version = $5
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(update.status)
        .bind(&update.tratamento)
        .bind(&update.galpao_destino)
        .bind(id)
        .bind(expected_version)
        .fetch_optional(&self.pool)
        .await?;

        Ok(order)
    }
}
