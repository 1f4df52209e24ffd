use chrono::NaiveDate;
use tracing::debug;

use super::domain::{ClanMember, PromotionCandidate, RankTier};
use super::tenure::{months_in_clan, ParseError};

/// Flags members whose rank lags the rank their tenure earns them.
#[derive(Debug, Clone, Copy)]
pub struct PromotionEvaluator {
    today: NaiveDate,
}

impl PromotionEvaluator {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Candidates in roster order. A malformed join date on any ranked member
    /// fails the whole evaluation.
    pub fn evaluate(&self, members: &[ClanMember]) -> Result<Vec<PromotionCandidate>, ParseError> {
        let mut candidates = Vec::new();

        for member in members {
            if let Some(candidate) = self.evaluate_member(member)? {
                candidates.push(candidate);
            }
        }

        Ok(candidates)
    }

    fn evaluate_member(
        &self,
        member: &ClanMember,
    ) -> Result<Option<PromotionCandidate>, ParseError> {
        let current = member.rank_tier();
        let Some(current_index) = current.index() else {
            debug!(
                rsn = %member.rsn,
                rank = %member.rank,
                "rank outside ladder; skipping promotion check"
            );
            return Ok(None);
        };

        let months = months_in_clan(&member.joined_date, self.today)?;
        let expected = RankTier::expected_for_months(months);
        let expected_index = expected.index().unwrap_or(current_index);

        if current_index >= expected_index {
            return Ok(None);
        }

        Ok(Some(PromotionCandidate {
            rsn: member.rsn.clone(),
            current_rank: current,
            expected_rank: expected,
            joined_date: member.joined_date.clone(),
            months_in_clan: months,
        }))
    }
}
