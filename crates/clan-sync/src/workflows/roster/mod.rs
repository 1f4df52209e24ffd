//! Clan roster reconciliation against the Temple tracker, tenure-based
//! promotion checks, and webhook report rendering.

pub mod delivery;
mod diff;
pub mod domain;
mod normalizer;
mod promotion;
pub mod report;
pub mod router;
mod service;
pub mod tenure;
pub mod tracker;

pub use delivery::{
    deliver_all, DeliveryError, DeliveryOutcome, DeliverySink, DisabledSink, DiscordWebhook,
};
pub use diff::RosterDiff;
pub use domain::{ClanMember, ClanPayload, ComparisonResult, PromotionCandidate, RankTier};
pub use normalizer::normalize_name;
pub use promotion::PromotionEvaluator;
pub use report::{ReportFormatter, DEFAULT_MAX_CHUNK_LEN};
pub use router::roster_router;
pub use service::{compare_with_snapshot, ReconcileError, RosterReconciliationService};
pub use tenure::{months_between, months_in_clan, parse_joined_date, ParseError};
pub use tracker::{RefreshError, SnapshotFile, TempleTracker, TrackerSource};
