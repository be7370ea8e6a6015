use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum_prometheus::PrometheusMetricLayer;
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::json;
use talent_portal::config::AppConfig;
use talent_portal::error::AppError;
use talent_portal::infra::{DiskFiles, MemorySessions, MemoryStore};
use talent_portal::portal::{portal_router, PortalState};
use talent_portal::telemetry;
use tracing::info;

use crate::cli::ServeArgs;
use crate::demo;

#[derive(Clone)]
struct OpsState {
    readiness: Arc<AtomicBool>,
    metrics: Arc<PrometheusHandle>,
}

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let ops_state = OpsState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(MemoryStore::default());
    let sessions = Arc::new(MemorySessions::default());
    let files = Arc::new(DiskFiles::new(config.storage.upload_dir.clone()));

    if args.demo {
        let fixtures = demo::seed(&store)?;
        info!(
            clinic = %fixtures.clinic,
            candidate = %fixtures.candidate,
            owner = demo::DEMO_OWNER_EMAIL,
            client = demo::DEMO_CLIENT_EMAIL,
            candidate_login = demo::DEMO_CANDIDATE_EMAIL,
            password = demo::DEMO_PASSWORD,
            "demo fixtures seeded"
        );
    }

    let state = PortalState::new(store, sessions, files);
    let app = portal_router(state)
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(Extension(ops_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "talent portal ready");

    axum::serve(listener, app).await?;
    Ok(())
}

async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn readiness_endpoint(Extension(state): Extension<OpsState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

async fn metrics_endpoint(Extension(state): Extension<OpsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
