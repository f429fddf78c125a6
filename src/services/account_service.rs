// src/services/account_service.rs

use serde_json::Value;

use crate::{
    client::{AccountApi, AdminApi, CustomerApi, StaffApi},
    common::{
        error::AppError,
        i18n::I18nStore,
        listing::{filter_searchable, paginate, ActionRow, ListQuery, Page},
    },
    middleware::auth::SessionUser,
    models::{
        account::{
            Account, CustomerContact, DeleteAccountPayload, PasswordChangeBody,
            PasswordChangePayload, PasswordResetPayload, ProfileUpdatePayload, RegisterBody,
            RegisterPayload, Role,
        },
        dashboard::{NavEntry, SessionInfo},
    },
    workflow::{allowed_user_actions, ensure_allowed, UserAction},
};

pub type PendingUserRow = ActionRow<Account, UserAction>;

// (chave i18n, rota do painel)
const ADMIN_NAV: &[(&str, &str)] = &[
    ("nav.registrations", "/api/admin/pending-users"),
    ("nav.work_requests", "/api/admin/work-requests"),
    ("nav.jobs", "/api/admin/tickets"),
    ("nav.register_job", "/api/admin/work-requests"),
    ("nav.profile", "/api/admin/profile"),
];

const STAFF_NAV: &[(&str, &str)] = &[
    ("nav.payments", "/api/staff/invoices"),
    ("nav.jobs", "/api/staff/tickets"),
    ("nav.reports", "/api/staff/invoices/report"),
    ("nav.customers", "/api/staff/customers"),
    ("nav.profile", "/api/staff/profile"),
];

const CUSTOMER_NAV: &[(&str, &str)] = &[
    ("nav.request_job", "/api/customer/work-requests"),
    ("nav.jobs", "/api/customer/jobs"),
    ("nav.receipts", "/api/customer/invoices"),
    ("nav.profile", "/api/customer/profile"),
];

pub fn navigation(role: Role, store: &I18nStore, lang: &str) -> Vec<NavEntry> {
    let entries = match role {
        Role::Admin => ADMIN_NAV,
        Role::Staff => STAFF_NAV,
        Role::Customer => CUSTOMER_NAV,
    };
    entries
        .iter()
        .map(|(key, path)| NavEntry { label: store.translate(lang, key), path: *path })
        .collect()
}

// lista-nombres-usuarios pode vir como ["ana", ...] ou [{"username": "ana"}, ...]
fn usernames_from(values: Vec<Value>) -> Vec<String> {
    values
        .into_iter()
        .filter_map(|v| match v {
            Value::String(s) => Some(s),
            Value::Object(map) => map.get("username").and_then(Value::as_str).map(str::to_string),
            _ => None,
        })
        .collect()
}

#[derive(Clone)]
pub struct AccountService {
    account_api: AccountApi,
    admin_api: AdminApi,
    staff_api: StaffApi,
    customer_api: CustomerApi,
}

impl AccountService {
    pub fn new(
        account_api: AccountApi,
        admin_api: AdminApi,
        staff_api: StaffApi,
        customer_api: CustomerApi,
    ) -> Self {
        Self { account_api, admin_api, staff_api, customer_api }
    }

    // =========================================================================
    //  PÚBLICO
    // =========================================================================

    pub async fn register(&self, payload: RegisterPayload) -> Result<(), AppError> {
        let username = payload.username.clone();
        self.account_api.register(&RegisterBody::from(payload)).await?;
        tracing::info!("🆕 Cadastro enviado para aprovação: {}", username);
        Ok(())
    }

    pub async fn reset_password(&self, payload: &PasswordResetPayload) -> Result<(), AppError> {
        self.account_api.reset_password(payload).await?;
        Ok(())
    }

    /// Retorna `true` quando o backend não confirmou e o logout foi só local.
    pub async fn logout(&self, user: &SessionUser) -> Result<bool, AppError> {
        match self.account_api.logout(&user.token).await {
            Ok(_) => Ok(false),
            Err(AppError::Backend { status: 401 | 403, .. }) | Err(AppError::BackendUnavailable(_)) => {
                tracing::warn!("Logout forçado para {}", user.username);
                Ok(true)
            }
            Err(e) => Err(e),
        }
    }

    pub fn session_info(&self, user: &SessionUser, store: &I18nStore, lang: &str) -> SessionInfo {
        SessionInfo {
            username: user.username.clone(),
            role: user.role,
            navigation: navigation(user.role, store, lang),
        }
    }

    // =========================================================================
    //  PERFIL
    // =========================================================================

    pub async fn profile(&self, user: &SessionUser) -> Result<Account, AppError> {
        match user.role {
            Role::Admin => self.admin_api.profile(&user.token).await,
            Role::Staff => self.staff_api.profile(&user.token).await,
            Role::Customer => self.customer_api.profile(&user.token).await,
        }
    }

    /// Uma chamada ao backend por campo alterado.
    pub async fn update_profile(&self, user: &SessionUser, payload: &ProfileUpdatePayload) -> Result<(), AppError> {
        let fields = payload.changed_fields();
        if fields.is_empty() {
            return Err(AppError::NothingToUpdate);
        }
        for (field, value) in &fields {
            self.customer_api.update_field(&user.token, field, value).await?;
        }
        tracing::info!("Perfil de {} atualizado ({} campos)", user.username, fields.len());
        Ok(())
    }

    pub async fn change_password(&self, user: &SessionUser, payload: &PasswordChangePayload) -> Result<(), AppError> {
        if payload.new_password != payload.repeat_new_password {
            return Err(AppError::PasswordMismatch);
        }
        let body = PasswordChangeBody {
            current_password: &payload.current_password,
            new_password: &payload.new_password,
        };
        self.customer_api.change_password(&user.token, &body).await?;
        Ok(())
    }

    pub async fn delete_account(&self, user: &SessionUser, payload: &DeleteAccountPayload) -> Result<(), AppError> {
        if payload.password.is_empty() || !payload.confirm {
            return Err(AppError::ConfirmationRequired);
        }
        self.customer_api.delete_account(&user.token, &payload.password).await?;
        tracing::info!("🗑️ Conta {} excluída", user.username);
        Ok(())
    }

    // =========================================================================
    //  ADMIN: Solicitudes de Registro
    // =========================================================================

    pub async fn pending_users(&self, user: &SessionUser, query: &ListQuery) -> Result<Page<PendingUserRow>, AppError> {
        let per_page = query.page_size()?;
        let users = self.admin_api.pending_users(&user.token).await?;
        let users = filter_searchable(users, query.term());
        Ok(paginate(users, query.page(), per_page).map(|account| {
            let actions = allowed_user_actions(&account);
            ActionRow { item: account, actions }
        }))
    }

    async fn pending_user(&self, user: &SessionUser, id: &str) -> Result<Account, AppError> {
        self.admin_api
            .pending_users(&user.token)
            .await?
            .into_iter()
            .find(|a| a.id.as_deref() == Some(id))
            .ok_or_else(|| AppError::not_found("Usuario", id))
    }

    pub async fn approve_user(&self, user: &SessionUser, id: &str) -> Result<(), AppError> {
        let account = self.pending_user(user, id).await?;
        let state = if account.permiso { "APROBADO" } else { "PENDIENTE" };
        ensure_allowed(&allowed_user_actions(&account), UserAction::Approve, state)?;
        self.admin_api.approve_user(&user.token, id).await?;
        tracing::info!("✅ Usuário {} aprovado por {}", account.username, user.username);
        Ok(())
    }

    pub async fn delete_user(&self, user: &SessionUser, id: &str) -> Result<(), AppError> {
        let account = self.pending_user(user, id).await?;
        self.admin_api.delete_user(&user.token, id).await?;
        tracing::info!("🗑️ Usuário {} excluído por {}", account.username, user.username);
        Ok(())
    }

    // =========================================================================
    //  CONSULTAS
    // =========================================================================

    pub async fn usernames(&self, user: &SessionUser) -> Result<Vec<String>, AppError> {
        let raw = match user.role {
            Role::Admin => self.admin_api.usernames(&user.token).await?,
            Role::Staff => self.staff_api.usernames(&user.token).await?,
            Role::Customer => return Err(AppError::Forbidden),
        };
        Ok(usernames_from(raw))
    }

    pub async fn customers(&self, user: &SessionUser, query: &ListQuery) -> Result<Page<CustomerContact>, AppError> {
        let per_page = query.page_size()?;
        let customers = self.staff_api.customers(&user.token).await?;
        let customers = filter_searchable(customers, query.term());
        Ok(paginate(customers, query.page(), per_page).map(CustomerContact::from))
    }
}
