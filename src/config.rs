// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;

use crate::{
    client::{AccountApi, AdminApi, BackendClient, CustomerApi, StaffApi},
    common::i18n::I18nStore,
    services::{
        account_service::AccountService, flash::FlashStore, invoice_service::InvoiceService,
        request_service::RequestService, stats_service::StatsService,
        ticket_service::TicketService,
    },
};

#[derive(Debug, Clone)]
pub struct Settings {
    pub backend_url: String,
    pub jwt_secret: String,
    pub addr: String,
    pub stats_poll_interval: Duration,
    pub flash_ttl: Duration,
    pub backend_timeout: Duration,
    pub default_locale: String,
}

fn var_or<T: FromStr>(name: &str, default: T) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} tem um valor inválido: '{}'", name, raw)),
        Err(_) => Ok(default),
    }
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let backend_url = env::var("TIGMOTORS_BACKEND_URL")
            .context("TIGMOTORS_BACKEND_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        Ok(Self {
            backend_url,
            jwt_secret,
            addr: var_or("DASHBOARD_ADDR", "0.0.0.0:3000".to_string())?,
            stats_poll_interval: Duration::from_secs(var_or("STATS_POLL_SECONDS", 15u64)?),
            flash_ttl: Duration::from_secs(var_or("FLASH_TTL_SECONDS", 5u64)?),
            backend_timeout: Duration::from_secs(var_or("BACKEND_TIMEOUT_SECONDS", 10u64)?),
            default_locale: var_or("DEFAULT_LOCALE", "es".to_string())?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub jwt_secret: String,
    pub i18n_store: Arc<I18nStore>,
    pub flash_store: FlashStore,

    pub request_service: RequestService,
    pub ticket_service: TicketService,
    pub invoice_service: InvoiceService,
    pub account_service: AccountService,
    pub stats_service: StatsService,
}

impl AppState {
    pub fn new(settings: Settings) -> anyhow::Result<Self> {
        let backend = BackendClient::new(&settings.backend_url, settings.backend_timeout)
            .map_err(|e| anyhow::anyhow!("{}", e))?;

        tracing::info!("✅ Backend TigMotors configurado em {}", settings.backend_url);

        // --- Monta o gráfico de dependências ---
        let account_api = AccountApi::new(backend.clone());
        let admin_api = AdminApi::new(backend.clone());
        let staff_api = StaffApi::new(backend.clone());
        let customer_api = CustomerApi::new(backend);

        let request_service = RequestService::new(admin_api.clone(), customer_api.clone());
        let ticket_service =
            TicketService::new(admin_api.clone(), staff_api.clone(), customer_api.clone());
        let invoice_service = InvoiceService::new(staff_api.clone(), customer_api.clone());
        let account_service = AccountService::new(
            account_api,
            admin_api.clone(),
            staff_api.clone(),
            customer_api,
        );
        let stats_service = StatsService::new(admin_api, staff_api, settings.stats_poll_interval);

        Ok(Self {
            jwt_secret: settings.jwt_secret.clone(),
            i18n_store: Arc::new(I18nStore::new()),
            flash_store: FlashStore::new(settings.flash_ttl),
            settings: Arc::new(settings),
            request_service,
            ticket_service,
            invoice_service,
            account_service,
            stats_service,
        })
    }
}
