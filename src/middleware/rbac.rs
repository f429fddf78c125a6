// src/middleware/rbac.rs

use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::SessionUser, i18n::Locale},
    models::account::Role,
};

/// 1. O Trait que define qual papel uma área exige
pub trait RoleDef: Send + Sync + 'static {
    fn role() -> Role;
}

/// 2. O Extractor (Guardião)
pub struct RequireRole<T>(pub PhantomData<T>);

impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleDef,
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state)
            .await
            .unwrap_or_default();

        let user = parts
            .extensions
            .get::<SessionUser>()
            .ok_or_else(|| AppError::SessionExpired.to_api_error(&locale, &app_state.i18n_store))?;

        if user.role != T::role() {
            tracing::warn!(
                "⛔ {} ({}) tentou acessar área de {}",
                user.username,
                user.role.as_str(),
                T::role().as_str()
            );
            return Err(AppError::Forbidden.to_api_error(&locale, &app_state.i18n_store));
        }

        Ok(RequireRole(PhantomData))
    }
}

// ---
// ÁREAS DO PAINEL
// ---

pub struct AdminOnly;
impl RoleDef for AdminOnly {
    fn role() -> Role { Role::Admin }
}

pub struct StaffOnly;
impl RoleDef for StaffOnly {
    fn role() -> Role { Role::Staff }
}

pub struct CustomerOnly;
impl RoleDef for CustomerOnly {
    fn role() -> Role { Role::Customer }
}
