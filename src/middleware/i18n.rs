// src/middleware/i18n.rs

use axum::extract::{FromRef, FromRequestParts};
use axum::http::{header, request::Parts};

use crate::common::i18n::DEFAULT_LANG;
use crate::config::AppState;

// Idioma da resposta, vindo do Accept-Language
#[derive(Debug, Clone)]
pub struct Locale(pub String);

impl Default for Locale {
    fn default() -> Self {
        Locale(DEFAULT_LANG.to_string())
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
    AppState: FromRef<S>,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let requested = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                accept_language::parse(header_str)
                    .first() // Pega o primeiro idioma (ex: "pt-BR")
                    .map(|tag_string| {
                        // "pt-BR" -> "pt"
                        tag_string.split('-').next().unwrap_or(tag_string).to_lowercase()
                    })
            });

        // Idioma sem catálogo cai no padrão configurado
        let lang = match requested {
            Some(lang) if app_state.i18n_store.supports(&lang) => lang,
            _ => app_state.settings.default_locale.clone(),
        };

        Ok(Locale(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::state_for;
    use axum::http::Request;

    async fn locale_for(header: Option<&str>) -> String {
        let state = state_for("http://127.0.0.1:9");
        let mut builder = Request::builder();
        if let Some(h) = header {
            builder = builder.header(header::ACCEPT_LANGUAGE, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        Locale::from_request_parts(&mut parts, &state).await.unwrap().0
    }

    #[tokio::test]
    async fn picks_primary_subtag_of_preferred_language() {
        assert_eq!(locale_for(Some("pt-BR,pt;q=0.9,en;q=0.8")).await, "pt");
        assert_eq!(locale_for(Some("en-US")).await, "en");
    }

    #[tokio::test]
    async fn unsupported_or_missing_language_uses_default() {
        assert_eq!(locale_for(Some("de-DE")).await, "es");
        assert_eq!(locale_for(None).await, "es");
    }
}
