use chrono::{Local, NaiveDate};
use clan_sync::config::AppConfig;
use clan_sync::error::AppError;
use clan_sync::workflows::roster::{
    compare_with_snapshot, ClanPayload, ComparisonResult, ReconcileError, ReportFormatter,
    SnapshotFile,
};
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Roster payload in the /compare-clan request format
    #[arg(long)]
    pub(crate) payload: PathBuf,
    /// Temple snapshot to compare against (defaults to TEMPLE_SNAPSHOT_PATH)
    #[arg(long)]
    pub(crate) snapshot: Option<PathBuf>,
    /// Evaluation date for tenure (defaults to today)
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
    /// Override the message chunk budget
    #[arg(long)]
    pub(crate) max_chunk_len: Option<usize>,
    /// Print the comparison result as JSON instead of chat blocks
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_report(args: ReportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let ReportArgs {
        payload,
        snapshot,
        today,
        max_chunk_len,
        json,
    } = args;

    let snapshot = SnapshotFile::new(snapshot.unwrap_or(config.tracker.snapshot_path));
    let formatter = ReportFormatter::new(max_chunk_len.unwrap_or(config.delivery.max_chunk_len));
    let today = today.unwrap_or_else(|| Local::now().date_naive());

    let result = build_report(&payload, &snapshot, today)?;

    if json {
        let rendered = serde_json::to_string_pretty(&result).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        println!("{}", render_blocks(&formatter, &result));
    }

    Ok(())
}

fn build_report(
    payload_path: &Path,
    snapshot: &SnapshotFile,
    today: NaiveDate,
) -> Result<ComparisonResult, AppError> {
    let raw = fs::read_to_string(payload_path)?;
    let payload: ClanPayload = serde_json::from_str(&raw).map_err(std::io::Error::from)?;
    let tracker_names = snapshot.load()?;
    let result =
        compare_with_snapshot(&payload, &tracker_names, today).map_err(ReconcileError::from)?;
    Ok(result)
}

/// Blocks separated by a blank line, in the order they would be posted.
fn render_blocks(formatter: &ReportFormatter, result: &ComparisonResult) -> String {
    formatter.render(result).join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixtures(dir: &Path) -> (PathBuf, SnapshotFile) {
        let payload_path = dir.join("roster.json");
        fs::write(
            &payload_path,
            r#"{"clanName":"Iron Keep","clanMemberMaps":[
                {"rsn":"Bob","rank":"Squire","joinedDate":"02-Mar-2025"},
                {"rsn":"alice","rank":"Knight","joinedDate":"01-Sep-2025"}
            ]}"#,
        )
        .expect("write payload");

        let snapshot = SnapshotFile::new(dir.join("temple.json"));
        snapshot
            .store(&["ALICE".to_string(), "carol".to_string()])
            .expect("write snapshot");
        (payload_path, snapshot)
    }

    #[test]
    fn offline_report_renders_summary_and_promotions() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (payload_path, snapshot) = write_fixtures(dir.path());
        let today = NaiveDate::from_ymd_opt(2025, 10, 19).expect("valid date");

        let result = build_report(&payload_path, &snapshot, today).expect("report builds");
        let rendered = render_blocks(&ReportFormatter::default(), &result);

        assert_eq!(result.clan_not_in_temple, vec!["Bob"]);
        assert_eq!(result.temple_not_in_clan, vec!["carol"]);
        assert!(rendered.contains("Members in clan but NOT Temple (1):\n```\nBob\n```"));
        assert!(rendered.ends_with("```\nBob: Squire -> Inquisitor\n```"));
    }

    #[test]
    fn missing_snapshot_surfaces_refresh_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let (payload_path, _) = write_fixtures(dir.path());
        let absent = SnapshotFile::new(dir.path().join("absent.json"));
        let today = NaiveDate::from_ymd_opt(2025, 10, 19).expect("valid date");

        let err = build_report(&payload_path, &absent, today).expect_err("snapshot required");
        assert!(matches!(
            err,
            AppError::Reconcile(ReconcileError::Refresh(_))
        ));
    }
}
