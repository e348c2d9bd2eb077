use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Campo obrigatório ausente: {0}")]
    MissingField(&'static str),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(String),

    #[error("Quantidade recebida está incorreta ou não foi informada")]
    QuantityMismatch,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    Unauthorized,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Pedido não encontrado")]
    NotFound,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Transição inválida: {from} -> {to}")]
    InvalidTransition { from: &'static str, to: &'static str },

    #[error("Pedido alterado por outra requisição")]
    Conflict,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::InvalidBody(rejection.body_text())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::MissingField(_)
            | AppError::ValidationError(_)
            | AppError::InvalidBody(_)
            | AppError::QuantityMismatch => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::EmailAlreadyExists
            | AppError::InvalidTransition { .. }
            | AppError::Conflict => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                })
            }
            AppError::InvalidCredentials => json!({ "error": "Credenciais inválidas" }),
            AppError::Unauthorized => {
                json!({ "error": "Token de autenticação inválido ou ausente." })
            }
            AppError::Forbidden => {
                json!({ "error": "Seu perfil não tem acesso a esta operação." })
            }
            AppError::EmailAlreadyExists => json!({ "error": "Este e-mail já está em uso." }),
            e if status.is_server_error() => {
                // O `tracing` loga a mensagem detalhada; o cliente recebe uma genérica.
                tracing::error!("Erro Interno do Servidor: {}", e);
                json!({ "error": "Ocorreu um erro inesperado." })
            }
            e => json!({ "error": e.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
