use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{NewUser, User},
};

const USER_COLUMNS: &str = "id, nome, email, senha_hash, tipo, created_at";

// O repositório de usuários, responsável por todas as interações com a tabela 'usuarios'
#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserRepository {
    // Busca um usuário pelo seu e-mail
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM usuarios ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    // Cria um novo usuário no banco de dados
    async fn create(&self, user: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO usuarios (nome, email, senha_hash, tipo) VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.nome)
        .bind(&user.email)
        .bind(&user.senha_hash)
        .bind(user.tipo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }
}
