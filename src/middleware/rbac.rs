// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::{Role, SessionUser},
};

/// Define quais perfis podem executar uma operação.
pub trait RolePolicy: Send + Sync + 'static {
    fn allowed() -> &'static [Role];

    fn permits(role: Role) -> bool {
        role == Role::Administrador || Self::allowed().contains(&role)
    }
}

/// Guardião por perfil. Só barra alguém quando `ENFORCE_ROLES` está ligado;
/// caso contrário qualquer usuário autenticado passa.
pub struct RequireRole<P>(pub PhantomData<P>);

impl<P, S> FromRequestParts<S> for RequireRole<P>
where
    P: RolePolicy,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let user = parts
            .extensions
            .get::<SessionUser>()
            .ok_or(AppError::Unauthorized)?;

        if app_state.enforce_roles && !P::permits(user.tipo) {
            tracing::warn!(user_id = user.id, tipo = user.tipo.as_str(), "acesso negado por perfil");
            return Err(AppError::Forbidden);
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// DEFINIÇÃO DAS POLÍTICAS (TIPOS)
// ---

pub struct ManageUsers;
impl RolePolicy for ManageUsers {
    fn allowed() -> &'static [Role] { &[Role::Administrador] }
}

pub struct Purchasing;
impl RolePolicy for Purchasing {
    fn allowed() -> &'static [Role] { &[Role::Cabral] }
}

pub struct Receiving;
impl RolePolicy for Receiving {
    fn allowed() -> &'static [Role] { &[Role::Mauricio] }
}
