use serde::{Deserialize, Serialize};

/// In-game clan ranks in promotion order.
///
/// `Unknown` covers any label outside the progression ladder (staff ranks,
/// typos, renamed ranks). Those members still take part in roster diffs but
/// are never evaluated for promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankTier {
    Squire,
    Striker,
    Inquisitor,
    Expert,
    Knight,
    Unknown,
}

impl RankTier {
    pub fn ordered() -> [RankTier; 5] {
        [
            RankTier::Squire,
            RankTier::Striker,
            RankTier::Inquisitor,
            RankTier::Expert,
            RankTier::Knight,
        ]
    }

    /// Exact match against the in-game labels.
    pub fn parse(label: &str) -> Self {
        match label {
            "Squire" => RankTier::Squire,
            "Striker" => RankTier::Striker,
            "Inquisitor" => RankTier::Inquisitor,
            "Expert" => RankTier::Expert,
            "Knight" => RankTier::Knight,
            _ => RankTier::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RankTier::Squire => "Squire",
            RankTier::Striker => "Striker",
            RankTier::Inquisitor => "Inquisitor",
            RankTier::Expert => "Expert",
            RankTier::Knight => "Knight",
            RankTier::Unknown => "Unknown",
        }
    }

    /// Position on the ladder, `None` for ranks outside it.
    pub fn index(self) -> Option<usize> {
        RankTier::ordered().iter().position(|tier| *tier == self)
    }

    /// Rank a member is expected to hold after `months` whole months in the clan.
    pub fn expected_for_months(months: u32) -> Self {
        match months {
            0..=2 => RankTier::Squire,
            3..=5 => RankTier::Striker,
            6..=8 => RankTier::Inquisitor,
            9..=11 => RankTier::Expert,
            _ => RankTier::Knight,
        }
    }
}

/// One row of the in-game roster export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanMember {
    pub rsn: String,
    pub rank: String,
    pub joined_date: String,
}

impl ClanMember {
    pub fn rank_tier(&self) -> RankTier {
        RankTier::parse(&self.rank)
    }
}

/// Roster submitted for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanPayload {
    pub clan_name: String,
    pub clan_member_maps: Vec<ClanMember>,
}

impl ClanPayload {
    pub fn member_names(&self) -> Vec<&str> {
        self.clan_member_maps
            .iter()
            .map(|member| member.rsn.as_str())
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionCandidate {
    pub rsn: String,
    pub current_rank: RankTier,
    pub expected_rank: RankTier,
    pub joined_date: String,
    pub months_in_clan: u32,
}

/// Outcome of one comparison request. Names keep the spelling of their source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    pub clan_name: String,
    pub clan_not_in_temple: Vec<String>,
    pub temple_not_in_clan: Vec<String>,
    pub needs_promotion: Vec<PromotionCandidate>,
}
