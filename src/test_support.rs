// src/test_support.rs

// Utilitários de teste: tokens assinados, estado da aplicação e um backend falso.

use std::time::Duration;

use axum::Router;
use jsonwebtoken::{encode, EncodingKey, Header};
use tokio::net::TcpListener;

use crate::config::{AppState, Settings};
use crate::middleware::auth::Claims;

pub const TEST_SECRET: &str = "segredo-de-teste";

pub fn token_for(username: &str, role: &str) -> String {
    let exp = (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize;
    let claims = Claims {
        sub: username.to_string(),
        role: role.to_string(),
        exp,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_ref()),
    )
    .expect("token de teste")
}

pub fn settings_for(backend_url: &str) -> Settings {
    Settings {
        backend_url: backend_url.to_string(),
        jwt_secret: TEST_SECRET.to_string(),
        addr: "127.0.0.1:0".to_string(),
        stats_poll_interval: Duration::from_millis(50),
        flash_ttl: Duration::from_secs(5),
        backend_timeout: Duration::from_secs(2),
        default_locale: "es".to_string(),
    }
}

pub fn state_for(backend_url: &str) -> AppState {
    AppState::new(settings_for(backend_url)).expect("estado de teste")
}

/// Sobe o router dado como backend TigMotors numa porta livre e devolve a URL base.
pub async fn spawn_backend(backend: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("porta livre");
    let addr = listener.local_addr().expect("endereço local");
    tokio::spawn(async move {
        axum::serve(listener, backend).await.expect("backend falso");
    });
    format!("http://{}", addr)
}
