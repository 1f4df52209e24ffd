use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};

use super::delivery::{deliver_all, DeliverySink};
use super::diff::RosterDiff;
use super::domain::{ClanPayload, ComparisonResult};
use super::promotion::PromotionEvaluator;
use super::report::ReportFormatter;
use super::tenure::ParseError;
use super::tracker::{RefreshError, TrackerSource};

/// Runs one comparison end to end: refresh the tracker snapshot, compute the
/// roster diff and promotion list, then post the rendered report.
#[derive(Debug)]
pub struct RosterReconciliationService<T, S> {
    tracker: Arc<T>,
    sink: Arc<S>,
    formatter: ReportFormatter,
}

impl<T, S> RosterReconciliationService<T, S>
where
    T: TrackerSource + 'static,
    S: DeliverySink + 'static,
{
    pub fn new(tracker: Arc<T>, sink: Arc<S>, formatter: ReportFormatter) -> Self {
        Self {
            tracker,
            sink,
            formatter,
        }
    }

    /// Delivery failures never fail the request; refresh and date parse
    /// failures do, and nothing is posted in that case.
    pub fn compare(
        &self,
        payload: &ClanPayload,
        today: NaiveDate,
    ) -> Result<ComparisonResult, ReconcileError> {
        debug!(clan = %payload.clan_name, "refreshing tracker snapshot");
        let tracker_names = self.tracker.refresh()?;

        let result = compare_with_snapshot(payload, &tracker_names, today)?;
        info!(
            clan = %result.clan_name,
            clan_not_in_temple = result.clan_not_in_temple.len(),
            temple_not_in_clan = result.temple_not_in_clan.len(),
            needs_promotion = result.needs_promotion.len(),
            "roster comparison computed"
        );

        let blocks = self.formatter.render(&result);
        deliver_all(&*self.sink, &blocks);

        Ok(result)
    }
}

/// Comparison against an already loaded tracker roster. Performs no I/O.
pub fn compare_with_snapshot<N: AsRef<str>>(
    payload: &ClanPayload,
    tracker_names: &[N],
    today: NaiveDate,
) -> Result<ComparisonResult, ParseError> {
    let clan_names = payload.member_names();
    let diff = RosterDiff::compute(&clan_names, tracker_names);
    debug!(
        clan = %payload.clan_name,
        in_sync = diff.is_in_sync(),
        "roster diff computed"
    );
    let needs_promotion = PromotionEvaluator::new(today).evaluate(&payload.clan_member_maps)?;

    Ok(ComparisonResult {
        clan_name: payload.clan_name.clone(),
        clan_not_in_temple: diff.clan_not_in_tracker,
        temple_not_in_clan: diff.tracker_not_in_clan,
        needs_promotion,
    })
}

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error(transparent)]
    Refresh(#[from] RefreshError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}
