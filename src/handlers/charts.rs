// src/handlers/charts.rs

// Gráficos do painel: foto atual (JSON) ou atualização contínua (SSE).

use std::{convert::Infallible, time::Duration};

use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use tokio_stream::{wrappers::ReceiverStream, Stream, StreamExt};

use crate::{
    common::error::ApiError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        i18n::Locale,
        rbac::{AdminOnly, RequireRole, StaffOnly},
    },
    models::dashboard::ChartData,
    services::stats_service::{ChartSource, StatsService},
};

async fn snapshot(
    app_state: &AppState,
    locale: &Locale,
    user: &AuthenticatedUser,
    source: ChartSource,
) -> Result<(StatusCode, Json<ChartData>), ApiError> {
    let chart = app_state
        .stats_service
        .snapshot(source, &user.0.token)
        .await
        .map_err(|e| e.to_api_error(locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(chart)))
}

fn stream(
    stats: StatsService,
    user: AuthenticatedUser,
    source: ChartSource,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    tracing::info!("📈 {} assinou o gráfico {:?}", user.0.username, source);

    let rx = stats.subscribe(source, user.0.token);
    let events = ReceiverStream::new(rx).filter_map(|chart: ChartData| {
        serde_json::to_string(&chart)
            .ok()
            .map(|data| Ok(Event::default().event("chart").data(data)))
    });

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    )
}

// =============================================================================
//  ADMIN
// =============================================================================

// GET /api/admin/charts/users
#[utoipa::path(
    get,
    path = "/api/admin/charts/users",
    tag = "Charts",
    responses(
        (status = 200, description = "Usuários aprovados x pendentes", body = ChartData),
        (status = 403, description = "Somente admin")
    ),
    security(("api_jwt" = []))
)]
pub async fn users_chart(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    snapshot(&app_state, &locale, &user, ChartSource::Users).await
}

// GET /api/admin/charts/users/stream
#[utoipa::path(
    get,
    path = "/api/admin/charts/users/stream",
    tag = "Charts",
    responses((status = 200, description = "Eventos `chart` com o gráfico atualizado", content_type = "text/event-stream")),
    security(("api_jwt" = []))
)]
pub async fn users_stream(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    stream(app_state.stats_service, user, ChartSource::Users)
}

// GET /api/admin/charts/requests
#[utoipa::path(
    get,
    path = "/api/admin/charts/requests",
    tag = "Charts",
    responses((status = 200, description = "Solicitações aceitas x pendentes", body = ChartData)),
    security(("api_jwt" = []))
)]
pub async fn requests_chart(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    snapshot(&app_state, &locale, &user, ChartSource::Requests).await
}

// GET /api/admin/charts/requests/stream
#[utoipa::path(
    get,
    path = "/api/admin/charts/requests/stream",
    tag = "Charts",
    responses((status = 200, description = "Eventos `chart` com o gráfico atualizado", content_type = "text/event-stream")),
    security(("api_jwt" = []))
)]
pub async fn requests_stream(
    State(app_state): State<AppState>,
    _guard: RequireRole<AdminOnly>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    stream(app_state.stats_service, user, ChartSource::Requests)
}

// =============================================================================
//  STAFF
// =============================================================================

// GET /api/staff/charts/tickets
#[utoipa::path(
    get,
    path = "/api/staff/charts/tickets",
    tag = "Charts",
    responses((status = 200, description = "Tickets por estado", body = ChartData)),
    security(("api_jwt" = []))
)]
pub async fn tickets_chart(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    snapshot(&app_state, &locale, &user, ChartSource::Tickets).await
}

// GET /api/staff/charts/tickets/stream
#[utoipa::path(
    get,
    path = "/api/staff/charts/tickets/stream",
    tag = "Charts",
    responses((status = 200, description = "Eventos `chart` com o gráfico atualizado", content_type = "text/event-stream")),
    security(("api_jwt" = []))
)]
pub async fn tickets_stream(
    State(app_state): State<AppState>,
    _guard: RequireRole<StaffOnly>,
    user: AuthenticatedUser,
) -> impl IntoResponse {
    stream(app_state.stats_service, user, ChartSource::Tickets)
}
