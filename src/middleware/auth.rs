// src/middleware/auth.rs

use axum::{
    extract::{FromRef, FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::account::Role,
};

// Claims emitidas pelo backend TigMotors
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,  // username
    pub role: String, // ADMIN | PERSONAL_CENTRO_DE_SERVICIOS | USER
    pub exp: usize,
}

/// Usuário da sessão atual. O token segue junto para as chamadas ao backend.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
    pub token: String,
}

pub fn decode_session(token: &str, jwt_secret: &str) -> Result<SessionUser, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_ref()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("Token rejeitado: {}", e);
        AppError::SessionExpired
    })?;

    let role = Role::from_claim(&token_data.claims.role).ok_or(AppError::Forbidden)?;

    Ok(SessionUser {
        username: token_data.claims.sub,
        role,
        token: token.to_string(),
    })
}

// Middleware: token ausente ou vencido = 401 "sessão expirada", sempre.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    locale: Locale,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = request
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(AppError::SessionExpired)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let user = decode_session(bearer.token(), &app_state.jwt_secret)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

// Extrator para obter o usuário autenticado diretamente nos handlers
pub struct AuthenticatedUser(pub SessionUser);

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<SessionUser>() {
            return Ok(AuthenticatedUser(user.clone()));
        }
        let app_state = AppState::from_ref(state);
        let locale = Locale::from_request_parts(parts, state)
            .await
            .unwrap_or_default();
        Err(AppError::SessionExpired.to_api_error(&locale, &app_state.i18n_store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{token_for, TEST_SECRET};

    #[test]
    fn valid_token_yields_session() {
        let token = token_for("carlosm", "ROLE_ADMIN");
        let user = decode_session(&token, TEST_SECRET).unwrap();
        assert_eq!(user.username, "carlosm");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.token, token);
    }

    #[test]
    fn wrong_secret_or_garbage_is_an_expired_session() {
        let token = token_for("carlosm", "USER");
        assert!(matches!(decode_session(&token, "outro-segredo"), Err(AppError::SessionExpired)));
        assert!(matches!(decode_session("abc.def", TEST_SECRET), Err(AppError::SessionExpired)));
    }

    #[test]
    fn unknown_role_is_forbidden() {
        let token = token_for("carlosm", "SUPERUSER");
        assert!(matches!(decode_session(&token, TEST_SECRET), Err(AppError::Forbidden)));
    }
}
