use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use clan_sync::workflows::roster::{
    roster_router, DeliverySink, RosterReconciliationService, TrackerSource,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_roster_routes<T, S>(
    service: Arc<RosterReconciliationService<T, S>>,
) -> axum::Router
where
    T: TrackerSource + 'static,
    S: DeliverySink + 'static,
{
    roster_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
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

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use clan_sync::workflows::roster::{DisabledSink, RefreshError, ReportFormatter};
    use tower::ServiceExt;

    #[derive(Debug)]
    struct StaticTracker(Vec<String>);

    impl TrackerSource for StaticTracker {
        fn refresh(&self) -> Result<Vec<String>, RefreshError> {
            Ok(self.0.clone())
        }
    }

    fn router() -> axum::Router {
        let service = RosterReconciliationService::new(
            Arc::new(StaticTracker(vec!["Bob".to_string()])),
            Arc::new(DisabledSink),
            ReportFormatter::default(),
        );
        with_roster_routes(Arc::new(service))
    }

    #[tokio::test]
    async fn healthcheck_reports_ok() {
        let Json(body) = healthcheck().await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn compare_route_is_mounted_alongside_health() {
        let response = router()
            .oneshot(
                Request::post("/compare-clan")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"clanName":"Iron Keep","clanMemberMaps":[{"rsn":"bob","rank":"Owner","joinedDate":"01-Jan-2020"}]}"#,
                    ))
                    .unwrap(),
            )
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);

        let response = router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("router responds");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
