// src/services/order_service.rs

use std::sync::Arc;

use crate::{
    common::{
        error::AppError,
        fields::{check_max_len, require_text},
    },
    db::OrderStore,
    models::{
        auth::SessionUser,
        orders::{
            NewOrder, Order, OrderStatus, OrderUpdate, ORIGIN_PURCHASE, RESPONSIBLE_PURCHASING,
            RESPONSIBLE_RECEIVING,
        },
    },
};

const MAX_TREATMENT_LEN: u64 = 50;
const MAX_WAREHOUSE_LEN: u64 = 50;

#[derive(Clone)]
pub struct OrderService {
    repo: Arc<dyn OrderStore>,
}

impl OrderService {
    pub fn new(repo: Arc<dyn OrderStore>) -> Self {
        Self { repo }
    }

    // --- ENTRADAS ---

    /// Pedido de compra da fábrica: nasce `pendente`, com origem `compra`.
    pub async fn create_purchase_order(
        &self,
        item: String,
        quantidade: i32,
        by: &SessionUser,
    ) -> Result<Order, AppError> {
        let order = self
            .repo
            .create(NewOrder {
                item,
                quantidade,
                status: OrderStatus::Pending,
                responsavel: Some(RESPONSIBLE_PURCHASING.to_string()),
                origem: ORIGIN_PURCHASE.to_string(),
            })
            .await?;

        tracing::info!(order_id = order.id, user_id = by.id, "pedido de compra criado");
        Ok(order)
    }

    /// Recebimento físico de material: nasce `recebido`.
    pub async fn register_receipt(
        &self,
        item: String,
        quantidade: i32,
        origem: String,
        by: &SessionUser,
    ) -> Result<Order, AppError> {
        let order = self
            .repo
            .create(NewOrder {
                item,
                quantidade,
                status: OrderStatus::Received,
                responsavel: Some(RESPONSIBLE_RECEIVING.to_string()),
                origem,
            })
            .await?;

        tracing::info!(order_id = order.id, user_id = by.id, "recebimento registrado");
        Ok(order)
    }

    pub async fn list_orders(&self) -> Result<Vec<Order>, AppError> {
        self.repo.list().await
    }

    // --- TRANSIÇÕES ---

    pub async fn send_to_treatment(
        &self,
        order_id: i32,
        tratamento: Option<String>,
        by: &SessionUser,
    ) -> Result<Order, AppError> {
        let order = self.find(order_id).await?;
        let tratamento = require_text("tratamento", tratamento)?;
        check_max_len("tratamento", &tratamento, MAX_TREATMENT_LEN)?;

        self.advance(
            order,
            OrderUpdate {
                status: OrderStatus::InTreatment,
                tratamento: Some(tratamento),
                galpao_destino: None,
            },
            by,
        )
        .await
    }

    /// A quantidade devolvida precisa bater exatamente com a do pedido.
    /// Ausente e diferente são o mesmo erro.
    pub async fn verify_treatment_return(
        &self,
        order_id: i32,
        quantidade: Option<i64>,
        by: &SessionUser,
    ) -> Result<Order, AppError> {
        let order = self.find(order_id).await?;

        if quantidade != Some(i64::from(order.quantidade)) {
            return Err(AppError::QuantityMismatch);
        }

        self.advance(
            order,
            OrderUpdate {
                status: OrderStatus::TreatmentComplete,
                tratamento: None,
                galpao_destino: None,
            },
            by,
        )
        .await
    }

    pub async fn send_to_warehouse(
        &self,
        order_id: i32,
        galpao_destino: Option<String>,
        by: &SessionUser,
    ) -> Result<Order, AppError> {
        let order = self.find(order_id).await?;
        let galpao_destino = require_text("galpao_destino", galpao_destino)?;
        check_max_len("galpao_destino", &galpao_destino, MAX_WAREHOUSE_LEN)?;

        self.advance(
            order,
            OrderUpdate {
                status: OrderStatus::SentToWarehouse,
                tratamento: None,
                galpao_destino: Some(galpao_destino),
            },
            by,
        )
        .await
    }

    async fn find(&self, order_id: i32) -> Result<Order, AppError> {
        self.repo
            .find_by_id(order_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn advance(
        &self,
        order: Order,
        update: OrderUpdate,
        by: &SessionUser,
    ) -> Result<Order, AppError> {
        let from = order.status;
        let to = update.status;

        if !from.can_advance_to(to) {
            return Err(AppError::InvalidTransition {
                from: from.label(),
                to: to.label(),
            });
        }

        let updated = self
            .repo
            .update_stage(order.id, order.version, update)
            .await?
            .ok_or(AppError::Conflict)?;

        tracing::info!(
            order_id = updated.id,
            from = from.label(),
            to = to.label(),
            user_id = by.id,
            "pedido avançou de etapa"
        );
        Ok(updated)
    }
}
