//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod client;
mod common;
mod config;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;
mod workflow;

#[cfg(test)]
mod test_support;

use crate::config::{AppState, Settings};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

pub fn build_router(app_state: AppState) -> Router {
    // Rotas públicas (sem token)
    let public_routes = Router::new()
        .route("/register", post(handlers::public::register))
        .route("/password/reset", post(handlers::public::reset_password));

    let session_routes = Router::new()
        .route("/logout", post(handlers::session::logout))
        .route("/me", get(handlers::session::me))
        .route("/flash", get(handlers::session::current_flash));

    let admin_routes = Router::new()
        .route("/work-requests"
               ,get(handlers::admin::list_work_requests)
               .post(handlers::admin::register_job)
        )
        .route("/work-requests/{id}"
               ,delete(handlers::admin::delete_request)
        )
        .route("/work-requests/{id}/quote", put(handlers::admin::quote_request))
        .route("/work-requests/{id}/reject", put(handlers::admin::reject_request))
        .route("/usernames", get(handlers::admin::list_usernames))
        .route("/pending-users", get(handlers::admin::list_pending_users))
        .route("/pending-users/{id}", delete(handlers::admin::delete_user))
        .route("/pending-users/{id}/approve", put(handlers::admin::approve_user))
        .route("/tickets", get(handlers::admin::list_tickets))
        .route("/tickets/filter", post(handlers::admin::filter_tickets))
        .route("/tickets/{id}/state", put(handlers::admin::advance_ticket))
        .route("/profile", get(handlers::admin::profile))
        // Gráficos
        .route("/charts/users", get(handlers::charts::users_chart))
        .route("/charts/users/stream", get(handlers::charts::users_stream))
        .route("/charts/requests", get(handlers::charts::requests_chart))
        .route("/charts/requests/stream", get(handlers::charts::requests_stream));

    let staff_routes = Router::new()
        .route("/invoices", get(handlers::staff::list_invoices))
        .route("/invoices/filter", post(handlers::staff::filter_invoices))
        .route("/invoices/report", post(handlers::staff::download_report))
        .route("/invoices/{id}/payment", put(handlers::staff::mark_paid))
        .route("/tickets", get(handlers::staff::list_tickets))
        .route("/tickets/filter", post(handlers::staff::filter_tickets))
        .route("/tickets/{id}/state", put(handlers::staff::advance_ticket))
        .route("/customers", get(handlers::staff::list_customers))
        .route("/usernames", get(handlers::staff::list_usernames))
        .route("/profile", get(handlers::staff::profile))
        .route("/charts/tickets", get(handlers::charts::tickets_chart))
        .route("/charts/tickets/stream", get(handlers::charts::tickets_stream));

    let customer_routes = Router::new()
        .route("/work-requests"
               ,get(handlers::customer::list_work_requests)
               .post(handlers::customer::create_work_request)
        )
        .route("/work-requests/{id}"
               ,put(handlers::customer::edit_work_request)
               .delete(handlers::customer::delete_work_request)
        )
        .route("/work-requests/{id}/quote/accept", put(handlers::customer::accept_quote))
        .route("/work-requests/{id}/quote/reject", put(handlers::customer::reject_quote))
        .route("/jobs", get(handlers::customer::list_jobs))
        .route("/invoices", get(handlers::customer::list_invoices))
        .route("/profile"
               ,get(handlers::customer::profile)
               .put(handlers::customer::update_profile)
               .delete(handlers::customer::delete_account)
        )
        .route("/profile/password", put(handlers::customer::change_password));

    // Tudo que exige sessão passa pelo auth_guard; o papel é checado em cada handler
    let auth = axum_middleware::from_fn_with_state(app_state.clone(), auth_guard);

    // Combina tudo no router principal
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/public", public_routes)
        .nest("/api/session", session_routes.layer(auth.clone()))
        .nest("/api/admin", admin_routes.layer(auth.clone()))
        .nest("/api/staff", staff_routes.layer(auth.clone()))
        .nest("/api/customer", customer_routes.layer(auth))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let addr = settings.addr.clone();
    let app_state = AppState::new(settings)?;

    let app = build_router(app_state);

    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Painel escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
