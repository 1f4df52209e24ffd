use std::sync::Arc;

use axum::{extract::State, routing::post, Json, Router};
use chrono::Local;

use super::delivery::DeliverySink;
use super::domain::{ClanPayload, ComparisonResult};
use super::service::RosterReconciliationService;
use super::tracker::TrackerSource;
use crate::error::AppError;

/// Router exposing the comparison webhook.
pub fn roster_router<T, S>(service: Arc<RosterReconciliationService<T, S>>) -> Router
where
    T: TrackerSource + 'static,
    S: DeliverySink + 'static,
{
    Router::new()
        .route("/compare-clan", post(compare_handler::<T, S>))
        .with_state(service)
}

/// The comparison makes blocking HTTP and file calls, so it runs off the
/// async worker threads.
pub(crate) async fn compare_handler<T, S>(
    State(service): State<Arc<RosterReconciliationService<T, S>>>,
    Json(payload): Json<ClanPayload>,
) -> Result<Json<ComparisonResult>, AppError>
where
    T: TrackerSource + 'static,
    S: DeliverySink + 'static,
{
    let today = Local::now().date_naive();
    let result =
        tokio::task::spawn_blocking(move || service.compare(&payload, today)).await??;
    Ok(Json(result))
}
