// src/config.rs

use std::{env, net::SocketAddr, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{MemoryOrderStore, MemoryUserStore, OrderStore, PgOrderRepository, PgUserRepository, UserStore},
    services::{auth::AuthService, order_service::OrderService},
};

/// Valor de `DATABASE_URL` que seleciona os stores em memória.
pub const MEMORY_DATABASE_URL: &str = "memory";

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub nome: String,
    pub email: String,
    pub senha: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub token_ttl_minutes: i64,
    pub bcrypt_cost: u32,
    pub enforce_roles: bool,
    pub admin: Option<AdminSeed>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let admin = match (env::var("ADMIN_EMAIL"), env::var("ADMIN_PASSWORD")) {
            (Ok(email), Ok(senha)) => Some(AdminSeed {
                nome: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrador".to_string()),
                email,
                senha,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: env_or("BIND_ADDR", SocketAddr::from(([0, 0, 0, 0], 3000)))?,
            db_max_connections: env_or("DB_MAX_CONNECTIONS", 5)?,
            token_ttl_minutes: env_or("JWT_EXPIRES_MINUTES", 15)?,
            bcrypt_cost: env_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            enforce_roles: env_or("ENFORCE_ROLES", false)?,
            admin,
        })
    }
}

fn env_or<T>(key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} tem um valor inválido: {raw}")),
        Err(_) => Ok(default),
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: Option<PgPool>,
    pub auth_service: AuthService,
    pub order_service: OrderService,
    pub enforce_roles: bool,
}

impl AppState {
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        if config.database_url == MEMORY_DATABASE_URL {
            tracing::warn!("Usando armazenamento em memória; os dados somem ao encerrar.");
            return Ok(Self::with_stores(
                config,
                Arc::new(MemoryUserStore::new()),
                Arc::new(MemoryOrderStore::new()),
                None,
            ));
        }

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        sqlx::migrate!()
            .run(&db_pool)
            .await
            .context("Falha ao rodar as migrações do banco de dados")?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        Ok(Self::with_stores(
            config,
            Arc::new(PgUserRepository::new(db_pool.clone())),
            Arc::new(PgOrderRepository::new(db_pool.clone())),
            Some(db_pool),
        ))
    }

    // --- Monta o gráfico de dependências ---
    pub fn with_stores(
        config: &Config,
        user_store: Arc<dyn UserStore>,
        order_store: Arc<dyn OrderStore>,
        db_pool: Option<PgPool>,
    ) -> Self {
        let auth_service = AuthService::new(
            user_store,
            config.jwt_secret.clone(),
            chrono::Duration::minutes(config.token_ttl_minutes),
            config.bcrypt_cost,
        );
        let order_service = OrderService::new(order_store);

        Self {
            db_pool,
            auth_service,
            order_service,
            enforce_roles: config.enforce_roles,
        }
    }

    pub async fn shutdown(&self) {
        if let Some(pool) = &self.db_pool {
            pool.close().await;
            tracing::info!("Pool de conexões encerrado.");
        }
    }
}
