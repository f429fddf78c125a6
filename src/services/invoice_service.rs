// src/services/invoice_service.rs

use crate::{
    client::{CustomerApi, StaffApi},
    common::{
        error::AppError,
        listing::{filter_searchable, paginate, ActionRow, ListQuery, Page},
    },
    middleware::auth::SessionUser,
    models::{
        account::Role,
        invoice::{Invoice, InvoiceFilterPayload, InvoiceReportPayload, PaymentState},
    },
    workflow::{allowed_invoice_actions, ensure_allowed, InvoiceAction},
};

pub type InvoiceRow = ActionRow<Invoice, InvoiceAction>;

#[derive(Clone)]
pub struct InvoiceService {
    staff_api: StaffApi,
    customer_api: CustomerApi,
}

fn by_payment_state(invoices: Vec<Invoice>, state: Option<PaymentState>) -> Vec<Invoice> {
    invoices
        .into_iter()
        .filter(|i| state.is_none_or(|s| i.estado_pago == s))
        .collect()
}

impl InvoiceService {
    pub fn new(staff_api: StaffApi, customer_api: CustomerApi) -> Self {
        Self { staff_api, customer_api }
    }

    fn staff_page(invoices: Vec<Invoice>, query: &ListQuery) -> Result<Page<InvoiceRow>, AppError> {
        let per_page = query.page_size()?;
        let invoices = filter_searchable(invoices, query.term());
        Ok(paginate(invoices, query.page(), per_page).map(|invoice| {
            let actions = allowed_invoice_actions(Role::Staff, &invoice);
            ActionRow { item: invoice, actions }
        }))
    }

    // --- Staff: Estado de Pago ---

    pub async fn staff_list(
        &self,
        user: &SessionUser,
        state: Option<PaymentState>,
        query: &ListQuery,
    ) -> Result<Page<InvoiceRow>, AppError> {
        let invoices = self.staff_api.list_invoices(&user.token).await?;
        Self::staff_page(by_payment_state(invoices, state), query)
    }

    pub async fn staff_filter(
        &self,
        user: &SessionUser,
        filter: &InvoiceFilterPayload,
        query: &ListQuery,
    ) -> Result<Page<InvoiceRow>, AppError> {
        let invoices = self
            .staff_api
            .filter_invoices(&user.token, &filter.to_backend_body())
            .await?;
        Self::staff_page(invoices, query)
    }

    pub async fn mark_paid(&self, user: &SessionUser, id: &str) -> Result<(), AppError> {
        let invoice = self
            .staff_api
            .list_invoices(&user.token)
            .await?
            .into_iter()
            .find(|i| i.factura_id == id)
            .ok_or_else(|| AppError::not_found("Factura", id))?;

        // VALOR_PAGADO é terminal: recusa sem chamar o backend
        ensure_allowed(
            &allowed_invoice_actions(Role::Staff, &invoice),
            InvoiceAction::MarkPaid,
            invoice.estado_pago.as_str(),
        )?;

        self.staff_api.mark_paid(&user.token, id).await?;
        tracing::info!("💵 Factura {} marcada como paga por {}", id, user.username);
        Ok(())
    }

    pub async fn report(&self, user: &SessionUser, payload: &InvoiceReportPayload) -> Result<Vec<u8>, AppError> {
        let pdf = self
            .staff_api
            .download_report(&user.token, &payload.to_backend_body())
            .await?;
        tracing::info!("📄 Relatório de facturas gerado ({} bytes)", pdf.len());
        Ok(pdf)
    }

    // --- Cliente: Comprobantes ---

    pub async fn customer_list(
        &self,
        user: &SessionUser,
        state: Option<PaymentState>,
        query: &ListQuery,
    ) -> Result<Page<Invoice>, AppError> {
        let per_page = query.page_size()?;
        let invoices = match state {
            Some(state) => self.customer_api.invoices_by_state(&user.token, state).await?,
            None => self.customer_api.list_invoices(&user.token).await?,
        };
        let invoices = filter_searchable(invoices, query.term());
        Ok(paginate(invoices, query.page(), per_page))
    }
}
