use std::collections::HashSet;

use super::normalizer::normalize_name;

/// Names present on one side of the comparison but not the other.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterDiff {
    pub clan_not_in_tracker: Vec<String>,
    pub tracker_not_in_clan: Vec<String>,
}

impl RosterDiff {
    /// Matching uses normalized keys; output keeps every original occurrence
    /// (duplicates included), sorted case-insensitively.
    pub fn compute<C, T>(clan: &[C], tracker: &[T]) -> Self
    where
        C: AsRef<str>,
        T: AsRef<str>,
    {
        let clan_keys = normalized_set(clan);
        let tracker_keys = normalized_set(tracker);

        Self {
            clan_not_in_tracker: missing_from(clan, &tracker_keys),
            tracker_not_in_clan: missing_from(tracker, &clan_keys),
        }
    }

    pub fn is_in_sync(&self) -> bool {
        self.clan_not_in_tracker.is_empty() && self.tracker_not_in_clan.is_empty()
    }
}

fn normalized_set<S: AsRef<str>>(names: &[S]) -> HashSet<String> {
    names
        .iter()
        .map(|name| normalize_name(name.as_ref()))
        .collect()
}

fn missing_from<S: AsRef<str>>(names: &[S], other: &HashSet<String>) -> Vec<String> {
    let mut missing: Vec<String> = names
        .iter()
        .map(|name| name.as_ref())
        .filter(|name| !other.contains(&normalize_name(name)))
        .map(str::to_string)
        .collect();
    sort_case_insensitive(&mut missing);
    missing
}

fn sort_case_insensitive(names: &mut [String]) {
    names.sort_by_cached_key(|name| name.to_lowercase());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_each_side_in_original_spelling() {
        let diff = RosterDiff::compute(&["Bob", "alice"], &["ALICE", "carol"]);
        assert_eq!(diff.clan_not_in_tracker, vec!["Bob"]);
        assert_eq!(diff.tracker_not_in_clan, vec!["carol"]);
        assert!(!diff.is_in_sync());
    }

    #[test]
    fn swapping_inputs_swaps_outputs() {
        let clan = ["Iron_Pete", "zed", "Anna", "mo-mo"];
        let tracker = ["iron pete", "Mo Mo", "Kai", "bea"];
        let forward = RosterDiff::compute(&clan, &tracker);
        let backward = RosterDiff::compute(&tracker, &clan);
        assert_eq!(forward.clan_not_in_tracker, backward.tracker_not_in_clan);
        assert_eq!(forward.tracker_not_in_clan, backward.clan_not_in_tracker);
        assert_eq!(forward.clan_not_in_tracker, vec!["Anna", "zed"]);
        assert_eq!(forward.tracker_not_in_clan, vec!["bea", "Kai"]);
    }

    #[test]
    fn duplicates_are_reported_per_occurrence() {
        let diff = RosterDiff::compute(&["Dup", "dup", "Kept"], &["kept"]);
        assert_eq!(diff.clan_not_in_tracker, vec!["Dup", "dup"]);
        assert!(diff.tracker_not_in_clan.is_empty());
    }

    #[test]
    fn empty_sides_are_in_sync() {
        let empty: [&str; 0] = [];
        let diff = RosterDiff::compute(&empty, &empty);
        assert!(diff.is_in_sync());
    }
}
