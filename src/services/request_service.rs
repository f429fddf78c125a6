// src/services/request_service.rs

use crate::{
    client::{AdminApi, CustomerApi},
    common::{
        error::AppError,
        listing::{ActionRow, ListQuery, Page},
    },
    middleware::auth::SessionUser,
    models::{
        account::Role,
        work_request::{
            CreateRequestPayload, Priority, QuotePayload, RegisterJobPayload, RequestState,
            WorkRequest,
        },
    },
    workflow::{allowed_request_actions, ensure_allowed, RequestAction},
};

pub type RequestRow = ActionRow<WorkRequest, RequestAction>;

#[derive(Clone)]
pub struct RequestService {
    admin_api: AdminApi,
    customer_api: CustomerApi,
}

impl RequestService {
    pub fn new(admin_api: AdminApi, customer_api: CustomerApi) -> Self {
        Self { admin_api, customer_api }
    }

    fn with_actions(role: Role, request: WorkRequest) -> RequestRow {
        let actions = allowed_request_actions(role, &request);
        ActionRow { item: request, actions }
    }

    fn find(requests: Vec<WorkRequest>, id: &str) -> Result<WorkRequest, AppError> {
        requests
            .into_iter()
            .find(|r| r.id_solicitud == id)
            .ok_or_else(|| AppError::not_found("Solicitud", id))
    }

    // =========================================================================
    //  ADMIN
    // =========================================================================

    pub async fn admin_list(
        &self,
        user: &SessionUser,
        priority: Option<Priority>,
        query: &ListQuery,
    ) -> Result<Page<RequestRow>, AppError> {
        let requests: Vec<WorkRequest> = self
            .admin_api
            .list_requests(&user.token)
            .await?
            .into_iter()
            .filter(|r| priority.is_none() || r.prioridad == priority)
            .collect();

        let page = query.apply(requests, |r| vec![r.id_solicitud.as_str(), r.username.as_str()])?;
        Ok(page.map(|r| Self::with_actions(Role::Admin, r)))
    }

    async fn admin_find(&self, user: &SessionUser, id: &str) -> Result<WorkRequest, AppError> {
        Self::find(self.admin_api.list_requests(&user.token).await?, id)
    }

    /// Aceita e cotiza. São duas chamadas sem transação: se a segunda falhar,
    /// a solicitação fica aceita sem cotização (`PartialQuote`).
    pub async fn admin_quote(
        &self,
        user: &SessionUser,
        id: &str,
        payload: &QuotePayload,
    ) -> Result<(), AppError> {
        let request = self.admin_find(user, id).await?;
        ensure_allowed(
            &allowed_request_actions(Role::Admin, &request),
            RequestAction::Quote,
            request.estado.as_str(),
        )?;

        let body = payload.to_backend_body();

        // Já aceita (recotização ou correção): só grava a cotização
        if request.estado == RequestState::Aceptado {
            self.admin_api.add_quote(&user.token, id, &body).await?;
            tracing::info!("💰 Solicitação {} recotizada por {}", id, user.username);
            return Ok(());
        }

        self.admin_api.accept_request(&user.token, id).await?;

        if let Err(e) = self.admin_api.add_quote(&user.token, id, &body).await {
            tracing::error!("🔥 Solicitação {} aceita, mas a cotização falhou: {}", id, e);
            return Err(AppError::PartialQuote {
                id: id.to_string(),
                reason: e.to_string(),
            });
        }

        tracing::info!("✅ Solicitação {} aceita e cotizada por {}", id, user.username);
        Ok(())
    }

    pub async fn admin_reject(&self, user: &SessionUser, id: &str) -> Result<(), AppError> {
        let request = self.admin_find(user, id).await?;
        ensure_allowed(
            &allowed_request_actions(Role::Admin, &request),
            RequestAction::Reject,
            request.estado.as_str(),
        )?;
        self.admin_api.reject_request(&user.token, id).await?;
        Ok(())
    }

    pub async fn admin_delete(&self, user: &SessionUser, id: &str) -> Result<(), AppError> {
        let request = self.admin_find(user, id).await?;
        ensure_allowed(
            &allowed_request_actions(Role::Admin, &request),
            RequestAction::Delete,
            request.estado.as_str(),
        )?;
        self.admin_api.delete_request(&user.token, id).await?;
        Ok(())
    }

    pub async fn admin_register_job(
        &self,
        user: &SessionUser,
        payload: &RegisterJobPayload,
    ) -> Result<Option<String>, AppError> {
        let message = self
            .admin_api
            .create_request(&user.token, &payload.to_backend_body())
            .await?;
        tracing::info!("📝 Trabalho registrado para {} por {}", payload.username, user.username);
        Ok(message)
    }

    // =========================================================================
    //  CLIENTE
    // =========================================================================

    pub async fn customer_list(
        &self,
        user: &SessionUser,
        state: Option<RequestState>,
        query: &ListQuery,
    ) -> Result<Page<RequestRow>, AppError> {
        let requests: Vec<WorkRequest> = self
            .customer_api
            .list_requests(&user.token)
            .await?
            .into_iter()
            .filter(|r| state.is_none_or(|s| r.estado == s))
            .collect();

        let page = query.apply(requests, |r| {
            vec![r.id_solicitud.as_str(), r.descripcion_inicial.as_str()]
        })?;
        Ok(page.map(|r| Self::with_actions(Role::Customer, r)))
    }

    async fn customer_find(&self, user: &SessionUser, id: &str) -> Result<WorkRequest, AppError> {
        Self::find(self.customer_api.list_requests(&user.token).await?, id)
    }

    async fn customer_guard(
        &self,
        user: &SessionUser,
        id: &str,
        action: RequestAction,
    ) -> Result<(), AppError> {
        let request = self.customer_find(user, id).await?;
        ensure_allowed(
            &allowed_request_actions(Role::Customer, &request),
            action,
            request.estado.as_str(),
        )
    }

    pub async fn customer_create(
        &self,
        user: &SessionUser,
        payload: &CreateRequestPayload,
    ) -> Result<(), AppError> {
        self.customer_api
            .create_request(&user.token, &payload.to_backend_body())
            .await?;
        Ok(())
    }

    pub async fn customer_edit(
        &self,
        user: &SessionUser,
        id: &str,
        description: &str,
    ) -> Result<(), AppError> {
        self.customer_guard(user, id, RequestAction::EditDescription).await?;
        self.customer_api.edit_description(&user.token, id, description).await?;
        Ok(())
    }

    pub async fn customer_delete(&self, user: &SessionUser, id: &str) -> Result<(), AppError> {
        self.customer_guard(user, id, RequestAction::Delete).await?;
        self.customer_api.delete_request(&user.token, id).await?;
        Ok(())
    }

    pub async fn accept_quote(&self, user: &SessionUser, id: &str) -> Result<Option<String>, AppError> {
        self.customer_guard(user, id, RequestAction::AcceptQuote).await?;
        self.customer_api.accept_quote(&user.token, id).await
    }

    pub async fn reject_quote(&self, user: &SessionUser, id: &str) -> Result<Option<String>, AppError> {
        self.customer_guard(user, id, RequestAction::RejectQuote).await?;
        self.customer_api.reject_quote(&user.token, id).await
    }
}
