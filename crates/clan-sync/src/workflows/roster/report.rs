//! Chat-ready rendering of a [`ComparisonResult`].
//!
//! A report is a summary block followed by one or more promotion blocks. Each
//! block is posted as its own message, so promotion lines are packed into
//! chunks that stay under the webhook's message budget.

use super::domain::{ComparisonResult, PromotionCandidate};

pub const DEFAULT_MAX_CHUNK_LEN: usize = 1500;

pub const CLAN_IN_SYNC: &str = "`All clan members are in sync with Temple!`";
pub const TEMPLE_IN_SYNC: &str = "`All clan members in Temple are in sync with the in game clan!`";
pub const NO_PROMOTIONS: &str = "`No members are due for promotion.`";

const CODE_FENCE: &str = "```";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportFormatter {
    max_chunk_len: usize,
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHUNK_LEN)
    }
}

impl ReportFormatter {
    pub fn new(max_chunk_len: usize) -> Self {
        Self { max_chunk_len }
    }

    /// Every block in delivery order: summary first, then promotions.
    pub fn render(&self, result: &ComparisonResult) -> Vec<String> {
        let mut blocks = vec![self.summary(result)];
        blocks.extend(self.promotion_blocks(result));
        blocks
    }

    pub fn summary(&self, result: &ComparisonResult) -> String {
        let mut lines = vec![
            format!("**Clan sync results for {}**", result.clan_name),
            String::new(),
            format!(
                "Members in clan but NOT Temple ({}):",
                result.clan_not_in_temple.len()
            ),
        ];
        push_name_listing(&mut lines, &result.clan_not_in_temple, CLAN_IN_SYNC);

        lines.push(String::new());
        lines.push(format!(
            "Members in Temple but NOT clan ({}):",
            result.temple_not_in_clan.len()
        ));
        push_name_listing(&mut lines, &result.temple_not_in_clan, TEMPLE_IN_SYNC);

        lines.push(String::new());
        lines.push(format!(
            "Members eligible for promotion: {}",
            result.needs_promotion.len()
        ));
        lines.push("Full list follows below:".to_string());

        lines.join("\n")
    }

    /// Fenced promotion chunks, or the single sentinel block when nobody is due.
    pub fn promotion_blocks(&self, result: &ComparisonResult) -> Vec<String> {
        if result.needs_promotion.is_empty() {
            return vec![NO_PROMOTIONS.to_string()];
        }

        let lines = promotion_lines(&result.needs_promotion);
        split_into_chunks(&lines, self.max_chunk_len)
            .into_iter()
            .map(|chunk| format!("{CODE_FENCE}\n{chunk}\n{CODE_FENCE}"))
            .collect()
    }
}

fn push_name_listing(lines: &mut Vec<String>, names: &[String], in_sync: &str) {
    if names.is_empty() {
        lines.push(in_sync.to_string());
        return;
    }

    lines.push(CODE_FENCE.to_string());
    lines.extend(names.iter().cloned());
    lines.push(CODE_FENCE.to_string());
}

/// `name: Current -> Expected`, sorted case-insensitively by name.
pub fn promotion_lines(candidates: &[PromotionCandidate]) -> Vec<String> {
    let mut sorted: Vec<&PromotionCandidate> = candidates.iter().collect();
    sorted.sort_by_cached_key(|candidate| candidate.rsn.to_lowercase());
    sorted
        .into_iter()
        .map(|candidate| {
            format!(
                "{}: {} -> {}",
                candidate.rsn,
                candidate.current_rank.label(),
                candidate.expected_rank.label()
            )
        })
        .collect()
}

/// Greedy packing where each line costs its length plus one separator. A line
/// longer than `max_len` on its own still gets a chunk of its own.
pub fn split_into_chunks<S: AsRef<str>>(lines: &[S], max_len: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_len = 0usize;

    for line in lines.iter().map(|line| line.as_ref()) {
        let cost = line.chars().count() + 1;
        if !current.is_empty() && current_len + cost > max_len {
            chunks.push(current.join("\n"));
            current.clear();
            current_len = 0;
        }
        current.push(line);
        current_len += cost;
    }

    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }

    chunks
}
