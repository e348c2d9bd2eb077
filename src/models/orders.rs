// src/models/orders.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

pub const ORIGIN_PURCHASE: &str = "compra";
pub const RESPONSIBLE_PURCHASING: &str = "Cabral";
pub const RESPONSIBLE_RECEIVING: &str = "Maurício";

// --- Enums ---

/// Etapas do pedido, na ordem do fluxo. A ordem das variantes define `Ord`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[sqlx(type_name = "order_status")]
pub enum OrderStatus {
    #[sqlx(rename = "pendente")]
    #[serde(rename = "pendente")]
    Pending,
    #[sqlx(rename = "recebido")]
    #[serde(rename = "recebido")]
    Received,
    #[sqlx(rename = "em tratamento")]
    #[serde(rename = "em tratamento")]
    InTreatment,
    #[sqlx(rename = "tratamento concluído")]
    #[serde(rename = "tratamento concluído")]
    TreatmentComplete,
    #[sqlx(rename = "enviado ao galpão")]
    #[serde(rename = "enviado ao galpão")]
    SentToWarehouse,
}

impl OrderStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pendente",
            OrderStatus::Received => "recebido",
            OrderStatus::InTreatment => "em tratamento",
            OrderStatus::TreatmentComplete => "tratamento concluído",
            OrderStatus::SentToWarehouse => "enviado ao galpão",
        }
    }

    /// Nunca volta de etapa. Repetir a etapa atual é aceito para corrigir o
    /// tratamento ou o galpão, e pular etapas também (um pedido de compra
    /// sai de `pendente` direto para o tratamento).
    pub fn can_advance_to(&self, next: OrderStatus) -> bool {
        next >= *self
    }
}

// --- Structs ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Order {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Parafuso")]
    pub item: String,
    #[schema(example = 100)]
    pub quantidade: i32,
    pub status: OrderStatus,
    #[schema(example = "Cabral")]
    pub responsavel: Option<String>,
    #[schema(example = "compra")]
    pub origem: String,
    #[schema(example = "zinco")]
    pub tratamento: Option<String>,
    #[schema(example = "Samy")]
    pub galpao_destino: Option<String>,
    /// Contador de concorrência otimista, incrementado a cada transição.
    pub version: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
    pub item: String,
    pub quantidade: i32,
    pub status: OrderStatus,
    pub responsavel: Option<String>,
    pub origem: String,
}

/// Campos alterados por uma transição. `None` mantém o valor atual.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub status: OrderStatus,
    pub tratamento: Option<String>,
    pub galpao_destino: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "Pedido criado com sucesso")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}
