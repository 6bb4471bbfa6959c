use crate::record::Record;
use std::collections::HashSet;

/// Keep the first record per identity key, in input order. Keys are compared
/// without surrounding whitespace; records with a blank key are dropped.
pub fn dedupe(records: Vec<Record>) -> Vec<Record> {
    let mut seen = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|r| {
            let key = r.identity_key.trim();
            !key.is_empty() && seen.insert(key.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(records: &[Record]) -> Vec<&str> {
        records.iter().map(|r| r.identity_key.as_str()).collect()
    }

    #[test]
    fn first_occurrence_wins() {
        let input = vec![
            Record::new("Web Intern", "https://a").with_organization("First"),
            Record::new("Cloud Intern", "https://b"),
            Record::new("Web Intern", "https://a").with_organization("Second"),
            Record::new("Mobile Intern", ""),
            Record::new("Backend Intern", "https://c"),
            Record::new("Cloud Intern", "https://b"),
        ];
        let out = dedupe(input);
        assert_eq!(keys(&out), vec!["https://a", "https://b", "https://c"]);
        assert_eq!(out[0].organization, "First");
    }

    #[test]
    fn padded_keys_collapse_and_blank_keys_drop() {
        let input = vec![
            Record::new("Web Intern", " https://a").with_organization("First"),
            Record::new("Web Intern", "https://a\t"),
            Record::new("Cloud Intern", "   "),
            Record::new("Mobile Intern", "https://b"),
        ];
        let out = dedupe(input);
        assert_eq!(keys(&out), vec![" https://a", "https://b"]);
        assert_eq!(out[0].organization, "First");
    }

    #[test]
    fn idempotent() {
        let input = vec![
            Record::new("x", "k1"),
            Record::new("y", "k2"),
            Record::new("z", "k1"),
        ];
        let once = dedupe(input);
        assert_eq!(dedupe(once.clone()), once);
    }
}
