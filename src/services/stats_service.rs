// src/services/stats_service.rs

use std::{collections::HashMap, time::Duration};

use serde_json::Value;
use tokio::sync::mpsc;

use crate::{
    client::{AdminApi, StaffApi},
    common::error::AppError,
    models::dashboard::{ChartData, ChartDataset, ChartKind},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSource {
    Users,
    Requests,
    Tickets,
}

struct ChartSpec {
    title: &'static str,
    label: &'static str,
    kind: ChartKind,
    // (chave no backend, rótulo)
    series: &'static [(&'static str, &'static str)],
    background: &'static [&'static str],
    border: &'static [&'static str],
}

const USERS_CHART: ChartSpec = ChartSpec {
    title: "Estado de los Usuarios",
    label: "Usuarios",
    kind: ChartKind::Bar,
    series: &[("Aprobado", "Aprobado"), ("Pendiente", "Pendiente")],
    background: &["#4CAF50", "#FFC107"],
    border: &["#388E3C", "#FF8F00"],
};

const REQUESTS_CHART: ChartSpec = ChartSpec {
    title: "Estado de las Solicitudes",
    label: "Solicitudes",
    kind: ChartKind::Doughnut,
    series: &[("ACEPTADO", "Aceptado"), ("PENDIENTE", "Pendiente")],
    background: &["#4CAF50", "#FFC107"],
    border: &["#388E3C", "#FF8F00"],
};

const TICKETS_CHART: ChartSpec = ChartSpec {
    title: "Estado de los Tickets",
    label: "Tickets",
    kind: ChartKind::Doughnut,
    series: &[
        ("TRABAJO_PENDIENTE", "Pendiente"),
        ("TRABAJO_TERMINADO", "Terminado"),
        ("TRABAJO_EN_PROGRESO", "En Progreso"),
    ],
    background: &["#4CAF50", "#36A2EB", "#FFC107"],
    border: &["#4CAF50", "#36A2EB", "#FFC107"],
};

impl ChartSource {
    fn spec(&self) -> &'static ChartSpec {
        match self {
            ChartSource::Users => &USERS_CHART,
            ChartSource::Requests => &REQUESTS_CHART,
            ChartSource::Tickets => &TICKETS_CHART,
        }
    }
}

// Contador ausente ou ilegível conta como 0
fn count(counts: &HashMap<String, Value>, key: &str) -> u64 {
    match counts.get(key) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

pub fn build_chart(source: ChartSource, counts: &HashMap<String, Value>) -> ChartData {
    let spec = source.spec();
    ChartData {
        title: spec.title.to_string(),
        kind: spec.kind,
        labels: spec.series.iter().map(|(_, label)| label.to_string()).collect(),
        datasets: vec![ChartDataset {
            label: spec.label.to_string(),
            data: spec.series.iter().map(|(key, _)| count(counts, key)).collect(),
            background_color: spec.background.iter().map(|c| c.to_string()).collect(),
            border_color: spec.border.iter().map(|c| c.to_string()).collect(),
        }],
    }
}

#[derive(Clone)]
pub struct StatsService {
    admin_api: AdminApi,
    staff_api: StaffApi,
    poll_interval: Duration,
}

impl StatsService {
    pub fn new(admin_api: AdminApi, staff_api: StaffApi, poll_interval: Duration) -> Self {
        Self { admin_api, staff_api, poll_interval }
    }

    pub async fn snapshot(&self, source: ChartSource, token: &str) -> Result<ChartData, AppError> {
        let counts = match source {
            ChartSource::Users => self.admin_api.user_stats(token).await?,
            ChartSource::Requests => self.admin_api.request_stats(token).await?,
            ChartSource::Tickets => self.staff_api.ticket_stats(token).await?,
        };
        Ok(build_chart(source, &counts))
    }

    /// Um poller por assinante, em intervalo fixo e sem backoff.
    /// Termina assim que o receptor é descartado (cliente desconectou).
    pub fn subscribe(&self, source: ChartSource, token: String) -> mpsc::Receiver<ChartData> {
        let (tx, rx) = mpsc::channel(4);
        let service = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(service.poll_interval);
            loop {
                tokio::select! {
                    _ = tx.closed() => break,
                    _ = ticker.tick() => {
                        match service.snapshot(source, &token).await {
                            Ok(chart) => {
                                if tx.send(chart).await.is_err() {
                                    break;
                                }
                            }
                            // Falha de uma rodada: loga e espera a próxima
                            Err(e) => tracing::warn!("Falha ao atualizar gráfico {:?}: {}", source, e),
                        }
                    }
                }
            }
            tracing::debug!("Poller do gráfico {:?} encerrado", source);
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use axum::{routing::get, Json, Router};

    use super::*;
    use crate::test_support::{spawn_backend, state_for};
    use serde_json::json;

    fn counts(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn missing_counters_default_to_zero() {
        let chart = build_chart(ChartSource::Tickets, &counts(json!({ "TRABAJO_TERMINADO": 4 })));
        assert_eq!(chart.labels, vec!["Pendiente", "Terminado", "En Progreso"]);
        assert_eq!(chart.datasets[0].data, vec![0, 4, 0]);
        assert_eq!(chart.kind, ChartKind::Doughnut);
    }

    #[test]
    fn users_chart_is_a_bar_chart_in_label_order() {
        let chart = build_chart(ChartSource::Users, &counts(json!({ "Pendiente": 2, "Aprobado": "7" })));
        assert_eq!(chart.kind, ChartKind::Bar);
        assert_eq!(chart.datasets[0].data, vec![7, 2]);
        assert_eq!(chart.datasets[0].background_color.len(), 2);
    }

    #[tokio::test]
    async fn poller_stops_once_the_subscriber_goes_away() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let backend = Router::new().route(
            "/api/staff-cds/estadisticas-tickets",
            get(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Json(json!({ "TRABAJO_PENDIENTE": 3 }))
                }
            }),
        );
        let stats = state_for(&spawn_backend(backend).await).stats_service;

        let mut rx = stats.subscribe(ChartSource::Tickets, "token".to_string());
        let first = rx.recv().await.unwrap();
        assert_eq!(first.datasets[0].data, vec![3, 0, 0]);
        let second = rx.recv().await.unwrap();
        assert_eq!(second.labels, first.labels);
        drop(rx);

        // rodada em andamento termina; depois disso nenhuma chamada nova
        tokio::time::sleep(Duration::from_millis(150)).await;
        let settled = calls.load(Ordering::SeqCst);
        assert!(settled >= 2);
        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(calls.load(Ordering::SeqCst), settled);
    }
}
