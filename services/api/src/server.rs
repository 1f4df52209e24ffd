use crate::cli::ServeArgs;
use crate::infra::{AppState, ConfiguredSink};
use crate::routes::with_roster_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use clan_sync::config::AppConfig;
use clan_sync::error::AppError;
use clan_sync::telemetry;
use clan_sync::workflows::roster::{ReportFormatter, RosterReconciliationService, TempleTracker};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    // reqwest's blocking clients must not be built on an async worker thread.
    let tracker_config = config.tracker.clone();
    let delivery_config = config.delivery.clone();
    let (tracker, sink) = tokio::task::spawn_blocking(move || {
        let tracker = TempleTracker::new(&tracker_config)?;
        let sink = ConfiguredSink::from_config(&delivery_config)?;
        Ok::<_, AppError>((tracker, sink))
    })
    .await??;

    let webhook_enabled = matches!(sink, ConfiguredSink::Webhook(_));
    let service = Arc::new(RosterReconciliationService::new(
        Arc::new(tracker),
        Arc::new(sink),
        ReportFormatter::new(config.delivery.max_chunk_len),
    ));

    let app = with_roster_routes(service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        webhook_enabled,
        members_url = %config.tracker.members_url(),
        "clan sync webhook ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
