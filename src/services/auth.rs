// src/services/auth.rs

use std::sync::Arc;

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserStore,
    models::auth::{Claims, NewUser, Role, SessionUser, User},
};

#[derive(Clone)]
pub struct AuthService {
    user_repo: Arc<dyn UserStore>,
    jwt_secret: String,
    token_ttl: chrono::Duration,
    bcrypt_cost: u32,
}

impl AuthService {
    pub fn new(
        user_repo: Arc<dyn UserStore>,
        jwt_secret: String,
        token_ttl: chrono::Duration,
        bcrypt_cost: u32,
    ) -> Self {
        Self {
            user_repo,
            jwt_secret,
            token_ttl,
            bcrypt_cost,
        }
    }

    pub async fn authenticate(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.senha_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!(user_id = user.id, tipo = user.tipo.as_str(), "login efetuado");
        self.create_token(&user)
    }

    pub fn verify_token(&self, token: &str) -> Result<SessionUser, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::Unauthorized)?;

        Ok(token_data.claims.into())
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.user_repo.list().await
    }

    pub async fn create_user(
        &self,
        nome: String,
        email: String,
        password: String,
        tipo: Role,
    ) -> Result<User, AppError> {
        // Hashing fora do runtime assíncrono
        let cost = self.bcrypt_cost;
        let senha_hash = tokio::task::spawn_blocking(move || hash(&password, cost))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let user = self
            .user_repo
            .create(NewUser {
                nome,
                email,
                senha_hash,
                tipo,
            })
            .await?;

        tracing::info!(user_id = user.id, tipo = user.tipo.as_str(), "usuário criado");
        Ok(user)
    }

    /// Garante que o administrador configurado exista. Sem ele não há como
    /// obter o primeiro token.
    pub async fn bootstrap_admin(
        &self,
        nome: &str,
        email: &str,
        password: &str,
    ) -> Result<(), AppError> {
        if self.user_repo.find_by_email(email).await?.is_some() {
            return Ok(());
        }

        match self
            .create_user(nome.to_owned(), email.to_owned(), password.to_owned(), Role::Administrador)
            .await
        {
            // Outra instância pode ter criado no meio tempo
            Ok(_) | Err(AppError::EmailAlreadyExists) => Ok(()),
            Err(e) => Err(e),
        }
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: user.id,
            nome: user.nome.clone(),
            tipo: user.tipo,
            jti: Uuid::new_v4().to_string(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
