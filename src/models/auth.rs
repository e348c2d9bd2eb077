// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

// Perfis de acesso do sistema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Administrador,
    Cabral,
    Mauricio,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Administrador => "administrador",
            Role::Cabral => "cabral",
            Role::Mauricio => "mauricio",
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Cabral")]
    pub nome: String,
    #[schema(example = "cabral@sofibor.com")]
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    #[schema(ignore)]
    pub senha_hash: String,

    pub tipo: Role,
    pub created_at: DateTime<Utc>,
}

// Dados já validados para inserir um usuário
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nome: String,
    pub email: String,
    pub senha_hash: String,
    pub tipo: Role,
}

// Identidade carregada no token e disponível nos handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUser {
    pub id: i32,
    pub nome: String,
    pub tipo: Role,
}

// Dados para login. Os campos são opcionais para que a ausência vire MissingField (400).
#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginUserPayload {
    #[schema(example = "cabral@sofibor.com")]
    pub email: Option<String>,
    #[schema(example = "segredo123")]
    pub senha: Option<String>,
}

// Limites seguem as colunas VARCHAR(100) de `usuarios`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(length(max = 100, message = "O nome deve ter no máximo 100 caracteres."))]
    #[schema(example = "Maurício")]
    pub nome: Option<String>,
    #[validate(
        email(message = "O e-mail fornecido é inválido."),
        length(max = 100, message = "O e-mail deve ter no máximo 100 caracteres.")
    )]
    #[schema(example = "mauricio@sofibor.com")]
    pub email: Option<String>,
    pub senha: Option<String>,
    pub tipo: Option<Role>,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i32,     // Subject (ID do usuário)
    pub nome: String,
    pub tipo: Role,
    pub jti: String,  // ID único do token
    pub exp: usize,   // Expiration time (quando o token expira)
    pub iat: usize,   // Issued At (quando o token foi criado)
}

impl From<Claims> for SessionUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            nome: claims.nome,
            tipo: claims.tipo,
        }
    }
}
