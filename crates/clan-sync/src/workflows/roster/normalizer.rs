/// Comparison key for display names: case, `_`/`-` and spacing are ignored.
pub fn normalize_name(value: &str) -> String {
    let lowered = value.trim().to_lowercase().replace(['_', '-'], " ");
    lowered.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::normalize_name;

    #[test]
    fn separators_case_and_spacing_are_equivalent() {
        let expected = "bob smith";
        assert_eq!(normalize_name("Bob_Smith"), expected);
        assert_eq!(normalize_name("bob-smith"), expected);
        assert_eq!(normalize_name("  bob   smith "), expected);
        assert_eq!(normalize_name("BOB\t_-smith"), expected);
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["", "   ", "A__b", " Zezima ", "iron-man_btw", "x\u{a0}y"] {
            let once = normalize_name(raw);
            assert_eq!(normalize_name(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name(" _ - "), "");
    }
}
