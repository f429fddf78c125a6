pub mod admin;
pub mod charts;
pub mod customer;
pub mod public;
pub mod session;
pub mod staff;

use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::SessionUser, i18n::Locale},
    services::flash::FlashMessage,
};

/// Resposta de toda ação que altera dados.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse {
    pub flash: FlashMessage,
}

/// Registra o flash do usuário (sucesso ou erro) e monta a resposta.
pub(crate) async fn finish_action(
    app_state: &AppState,
    user: &SessionUser,
    locale: &Locale,
    result: Result<String, AppError>,
) -> Result<Json<ActionResponse>, ApiError> {
    match result {
        Ok(text) => {
            let flash = app_state.flash_store.success(&user.username, text).await;
            Ok(Json(ActionResponse { flash }))
        }
        Err(err) => {
            let api_error = err.to_api_error(locale, &app_state.i18n_store);
            app_state
                .flash_store
                .error(&user.username, api_error.error.clone())
                .await;
            Err(api_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        routing::{get, post, put},
        Json, Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::{
        build_router,
        test_support::{spawn_backend, state_for, token_for},
    };

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_needs_no_session() {
        let app = build_router(state_for("http://127.0.0.1:9"));
        let response = app
            .oneshot(request(Method::GET, "/api/health", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_token_is_a_session_expired_401() {
        let app = build_router(state_for("http://127.0.0.1:9"));
        let response = app
            .oneshot(request(Method::GET, "/api/admin/work-requests", None, None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Sesión expirada. Por favor, inicia sesión nuevamente.");
    }

    #[tokio::test]
    async fn wrong_role_is_forbidden_before_reaching_the_backend() {
        let app = build_router(state_for("http://127.0.0.1:9"));
        let token = token_for("ana", "USER");
        let response = app
            .oneshot(request(Method::GET, "/api/staff/invoices", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn session_me_lists_the_role_navigation() {
        let app = build_router(state_for("http://127.0.0.1:9"));
        let token = token_for("carlosm", "ROLE_PERSONAL_CENTRO_DE_SERVICIOS");
        let response = app
            .oneshot(request(Method::GET, "/api/session/me", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["username"], "carlosm");
        assert_eq!(body["role"], "PERSONAL_CENTRO_DE_SERVICIOS");
        assert!(!body["navigation"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn paid_invoice_is_refused_without_calling_the_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let backend = Router::new()
            .route(
                "/api/staff-cds/listado-facturas",
                get(|| async {
                    Json(json!([{ "facturaId": 7, "username": "ana", "estadoPago": "VALOR_PAGADO" }]))
                }),
            )
            .route(
                "/api/staff-cds/{id}/actualizar-pago",
                put(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            );
        let state = state_for(&spawn_backend(backend).await);
        let app = build_router(state.clone());
        let token = token_for("staff", "PERSONAL_CENTRO_DE_SERVICIOS");

        let response = app
            .oneshot(request(Method::PUT, "/api/staff/invoices/7/payment", Some(&token), None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let flash = state.flash_store.current("staff").await.unwrap();
        assert_eq!(flash.kind, crate::services::flash::FlashKind::Error);
        assert!(flash.text.contains("VALOR_PAGADO"));
    }

    #[tokio::test]
    async fn quote_failure_after_accept_is_reported_as_partial() {
        let backend = Router::new()
            .route(
                "/api/admin/historial-solicitudes",
                get(|| async {
                    Json(json!([{
                        "idSolicitud": 3,
                        "username": "ana",
                        "descripcionInicial": "Frenos",
                        "estado": "PENDIENTE"
                    }]))
                }),
            )
            .route("/api/admin/aceptar/{id}", put(|| async { "Solicitud aceptada" }))
            .route(
                "/api/admin/anadir-cotizacion/{id}",
                put(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "fallo") }),
            );
        let app = build_router(state_for(&spawn_backend(backend).await));
        let token = token_for("admin", "ADMIN");

        let response = app
            .oneshot(request(
                Method::PUT,
                "/api/admin/work-requests/3/quote",
                Some(&token),
                Some(json!({ "cotizacion": 120.5, "descripcionTrabajo": "Cambio de pastillas" })),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("3"));
    }

    #[tokio::test]
    async fn successful_mutation_returns_and_records_the_flash() {
        let backend = Router::new()
            .route(
                "/api/admin/usuarios-pendientes",
                get(|| async {
                    Json(json!([{ "id": 11, "username": "pedro", "permiso": false }]))
                }),
            )
            .route("/api/admin/usuarios/aprobar/{id}", put(|| async { "" }));
        let state = state_for(&spawn_backend(backend).await);
        let app = build_router(state.clone());
        let token = token_for("admin", "ADMIN");

        let mut req = request(Method::PUT, "/api/admin/pending-users/11/approve", Some(&token), None);
        req.headers_mut()
            .insert(header::ACCEPT_LANGUAGE, "pt-BR".parse().unwrap());
        let response = app.oneshot(req).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["flash"]["kind"], "success");
        assert_eq!(body["flash"]["text"], "Usuário aprovado com sucesso.");

        let flash = state.flash_store.current("admin").await.unwrap();
        assert_eq!(flash.text, "Usuário aprovado com sucesso.");
    }

    #[tokio::test]
    async fn unsupported_page_size_is_a_bad_request() {
        let backend = Router::new().route(
            "/api-user/historial-facturas",
            get(|| async { Json(json!([])) }),
        );
        let app = build_router(state_for(&spawn_backend(backend).await));
        let token = token_for("ana", "USER");

        let response = app
            .oneshot(request(Method::GET, "/api/customer/invoices?perPage=7", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn backward_ticket_move_is_refused_without_calling_the_backend() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let backend = Router::new()
            .route(
                "/api/staff-cds/historial-tickets",
                get(|| async {
                    Json(json!([{ "ticketId": 5, "username": "ana", "estado": "TRABAJO_EN_PROGRESO", "prioridad": "ALTA" }]))
                }),
            )
            .route(
                "/api/staff-cds/{id}/estado-ticket",
                put(move || {
                    let counter = counter.clone();
                    async move {
                        counter.fetch_add(1, Ordering::SeqCst);
                        "ok"
                    }
                }),
            );
        let app = build_router(state_for(&spawn_backend(backend).await));
        let token = token_for("staff", "PERSONAL_CENTRO_DE_SERVICIOS");

        for next in ["TRABAJO_PENDIENTE", "TRABAJO_EN_PROGRESO"] {
            let response = app
                .clone()
                .oneshot(request(
                    Method::PUT,
                    "/api/staff/tickets/5/state",
                    Some(&token),
                    Some(json!({ "nextState": next })),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CONFLICT, "{next}");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        // para frente passa
        let response = app
            .oneshot(request(
                Method::PUT,
                "/api/staff/tickets/5/state",
                Some(&token),
                Some(json!({ "nextState": "TRABAJO_TERMINADO" })),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn ticket_rows_offer_only_forward_states() {
        let backend = Router::new().route(
            "/api/admin/historial-tickets",
            get(|| async {
                Json(json!([
                    { "ticketId": 1, "username": "ana", "estado": "TRABAJO_PENDIENTE" },
                    { "ticketId": 2, "username": "ana", "estado": "TRABAJO_TERMINADO" }
                ]))
            }),
        );
        let app = build_router(state_for(&spawn_backend(backend).await));
        let token = token_for("admin", "ADMIN");

        let response = app
            .oneshot(request(Method::GET, "/api/admin/tickets", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["items"][0]["id"], "1");
        assert_eq!(body["items"][0]["nextStates"], json!(["TRABAJO_EN_PROGRESO", "TRABAJO_TERMINADO"]));
        assert_eq!(body["items"][0]["actions"], json!(["ADVANCE"]));
        assert_eq!(body["items"][1]["nextStates"], json!([]));
    }

    fn counted_tickets(calls: Arc<AtomicUsize>, rows: Value) -> axum::routing::MethodRouter {
        get(move || {
            let calls = calls.clone();
            let rows = rows.clone();
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Json(rows)
            }
        })
    }

    #[tokio::test]
    async fn customer_jobs_without_filter_merge_every_priority() {
        let hits: Vec<Arc<AtomicUsize>> = (0..3).map(|_| Arc::new(AtomicUsize::new(0))).collect();
        let backend = Router::new()
            .route(
                "/api-user/prioridad-ticket/ALTA",
                counted_tickets(hits[0].clone(), json!([
                    { "ticketId": 1, "username": "ana", "estado": "TRABAJO_PENDIENTE", "prioridad": "ALTA" }
                ])),
            )
            .route(
                "/api-user/prioridad-ticket/MEDIA",
                counted_tickets(hits[1].clone(), json!([
                    { "ticketId": 2, "username": "ana", "estado": "TRABAJO_PENDIENTE", "prioridad": "MEDIA" },
                    { "ticketId": 3, "username": "ana", "estado": "TRABAJO_TERMINADO", "prioridad": "MEDIA" }
                ])),
            )
            .route(
                "/api-user/prioridad-ticket/BAJA",
                counted_tickets(hits[2].clone(), json!([
                    { "ticketId": 4, "username": "ana", "estado": "TRABAJO_EN_PROGRESO", "prioridad": "BAJA" }
                ])),
            );
        let app = build_router(state_for(&spawn_backend(backend).await));
        let token = token_for("ana", "USER");

        let response = app
            .oneshot(request(Method::GET, "/api/customer/jobs", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 4);
        let ids: Vec<&str> = body["items"].as_array().unwrap().iter().map(|t| t["id"].as_str().unwrap()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        for hit in &hits {
            assert_eq!(hit.load(Ordering::SeqCst), 1);
        }
    }

    #[tokio::test]
    async fn customer_jobs_by_state_filter_priority_locally() {
        let by_state = Arc::new(AtomicUsize::new(0));
        let by_priority = Arc::new(AtomicUsize::new(0));
        let backend = Router::new()
            .route(
                "/api-user/estado-ticket/TRABAJO_PENDIENTE",
                counted_tickets(by_state.clone(), json!([
                    { "ticketId": 1, "username": "ana", "estado": "TRABAJO_PENDIENTE", "prioridad": "ALTA" },
                    { "ticketId": 2, "username": "ana", "estado": "TRABAJO_PENDIENTE", "prioridad": "BAJA" }
                ])),
            )
            .route(
                "/api-user/prioridad-ticket/{priority}",
                counted_tickets(by_priority.clone(), json!([])),
            );
        let app = build_router(state_for(&spawn_backend(backend).await));
        let token = token_for("ana", "USER");

        let response = app
            .oneshot(request(
                Method::GET,
                "/api/customer/jobs?state=TRABAJO_PENDIENTE&priority=BAJA",
                Some(&token),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["total"], 1);
        assert_eq!(body["items"][0]["id"], "2");
        assert_eq!(by_state.load(Ordering::SeqCst), 1);
        assert_eq!(by_priority.load(Ordering::SeqCst), 0);
    }

    async fn logout_against(backend_url: &str) -> Value {
        let app = build_router(state_for(backend_url));
        let token = token_for("ana", "USER");
        let response = app
            .oneshot(request(Method::POST, "/api/session/logout", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        json_body(response).await
    }

    #[tokio::test]
    async fn logout_is_forced_when_the_backend_refuses_or_is_down() {
        let confirmed = Router::new().route("/api/v1/cerrar-sesion", post(|| async { "Sesión cerrada" }));
        let body = logout_against(&spawn_backend(confirmed).await).await;
        assert_eq!(body["forced"], false);

        let expired = Router::new().route(
            "/api/v1/cerrar-sesion",
            post(|| async { (StatusCode::UNAUTHORIZED, "jwt expired") }),
        );
        let body = logout_against(&spawn_backend(expired).await).await;
        assert_eq!(body["forced"], true);
        assert_eq!(body["flash"]["kind"], "success");

        // nada escutando na porta 9
        let body = logout_against("http://127.0.0.1:9").await;
        assert_eq!(body["forced"], true);
    }

    #[tokio::test]
    async fn chart_snapshot_and_stream_answer_for_the_owning_role() {
        let backend = Router::new().route(
            "/api/staff-cds/estadisticas-tickets",
            get(|| async { Json(json!({ "TRABAJO_PENDIENTE": 2, "TRABAJO_TERMINADO": 5 })) }),
        );
        let app = build_router(state_for(&spawn_backend(backend).await));
        let token = token_for("staff", "PERSONAL_CENTRO_DE_SERVICIOS");

        let response = app
            .clone()
            .oneshot(request(Method::GET, "/api/staff/charts/tickets", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["datasets"][0]["data"], json!([2, 5, 0]));

        let response = app
            .oneshot(request(Method::GET, "/api/staff/charts/tickets/stream", Some(&token), None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    }
}
