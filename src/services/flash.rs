// src/services/flash.rs

use std::{collections::HashMap, sync::Arc, time::Duration};

use serde::Serialize;
use tokio::{sync::RwLock, time::Instant};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    Success,
    Error,
}

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq)]
pub struct FlashMessage {
    pub kind: FlashKind,
    pub text: String,
}

struct FlashEntry {
    message: FlashMessage,
    expires_at: Instant,
}

/// Última mensagem de cada usuário; some sozinha depois do TTL.
#[derive(Clone)]
pub struct FlashStore {
    entries: Arc<RwLock<HashMap<String, FlashEntry>>>,
    ttl: Duration,
}

impl FlashStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub async fn success(&self, username: &str, text: impl Into<String>) -> FlashMessage {
        self.record(username, FlashKind::Success, text.into()).await
    }

    pub async fn error(&self, username: &str, text: impl Into<String>) -> FlashMessage {
        self.record(username, FlashKind::Error, text.into()).await
    }

    async fn record(&self, username: &str, kind: FlashKind, text: String) -> FlashMessage {
        let message = FlashMessage { kind, text };
        let entry = FlashEntry {
            message: message.clone(),
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().await.insert(username.to_string(), entry);
        message
    }

    pub async fn current(&self, username: &str) -> Option<FlashMessage> {
        {
            let entries = self.entries.read().await;
            match entries.get(username) {
                None => return None,
                Some(entry) if entry.expires_at > Instant::now() => {
                    return Some(entry.message.clone());
                }
                Some(_) => {}
            }
        }
        self.evict_expired(username).await
    }

    // Entre soltar a leitura e pegar a escrita pode chegar mensagem nova: reconfere.
    async fn evict_expired(&self, username: &str) -> Option<FlashMessage> {
        let mut entries = self.entries.write().await;
        match entries.get(username) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.message.clone()),
            Some(_) => {
                entries.remove(username);
                None
            }
            None => None,
        }
    }

    pub async fn clear(&self, username: &str) {
        self.entries.write().await.remove(username);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn message_clears_after_ttl() {
        let store = FlashStore::new(Duration::from_secs(5));
        store.success("ana", "Usuario aprobado correctamente.").await;

        tokio::time::advance(Duration::from_secs(4)).await;
        let current = store.current("ana").await.unwrap();
        assert_eq!(current.kind, FlashKind::Success);

        tokio::time::advance(Duration::from_secs(2)).await;
        assert!(store.current("ana").await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn expiry_cleanup_keeps_a_message_recorded_meanwhile() {
        let store = FlashStore::new(Duration::from_secs(5));
        store.success("ana", "vieja").await;
        tokio::time::advance(Duration::from_secs(6)).await;

        // quem leu a antiga como expirada chega à limpeza depois da nova
        store.error("ana", "nueva").await;
        let kept = store.evict_expired("ana").await.unwrap();
        assert_eq!(kept.text, "nueva");
        assert_eq!(store.current("ana").await.unwrap().kind, FlashKind::Error);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert!(store.evict_expired("ana").await.is_none());
        assert!(store.entries.read().await.is_empty());
    }

    #[tokio::test]
    async fn messages_are_per_user_and_last_one_wins() {
        let store = FlashStore::new(Duration::from_secs(5));
        store.success("ana", "uno").await;
        store.error("ana", "dos").await;
        assert_eq!(store.current("ana").await.unwrap().text, "dos");
        assert!(store.current("pedro").await.is_none());
    }
}
