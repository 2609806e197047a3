//! Client-side narrowing of already-fetched record lists.
//!
//! Used where the API offers no server-side filter: the full listing is
//! fetched first and then reduced here.

use crate::models::Record;

/// Equality predicate on a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Match<'a> {
    Id(&'a str),
    Name(&'a str),
}

impl Match<'_> {
    /// Whether `record` satisfies this predicate.
    pub fn matches<R: Record>(&self, record: &R) -> bool {
        match self {
            Match::Id(id) => record.id() == *id,
            Match::Name(name) => record.name() == *name,
        }
    }
}

/// Keep only the records matching `predicate`, preserving their relative order.
///
/// Consumes the input and builds a fresh vector in a single pass.
pub fn filter<R: Record>(records: Vec<R>, predicate: &Match<'_>) -> Vec<R> {
    records
        .into_iter()
        .filter(|r| predicate.matches(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: &'static str,
        name: &'static str,
        seq: u32,
    }

    impl Record for Row {
        fn id(&self) -> &str {
            self.id
        }
        fn name(&self) -> &str {
            self.name
        }
    }

    fn row(id: &'static str, name: &'static str, seq: u32) -> Row {
        Row { id, name, seq }
    }

    #[test]
    fn test_filter_by_id_keeps_duplicates_in_order() {
        let rows = vec![
            row("X", "a", 0),
            row("Y", "b", 1),
            row("X", "c", 2),
            row("Z", "d", 3),
            row("W", "e", 4),
        ];
        let out = filter(rows, &Match::Id("X"));
        let seqs: Vec<u32> = out.iter().map(|r| r.seq).collect();
        assert_eq!(seqs, vec![0, 2]);
        assert!(out.iter().all(|r| r.id == "X"));
    }

    #[test]
    fn test_filter_by_name_exact_match_only() {
        let rows = vec![
            row("1", "Serving Infra Default", 0),
            row("2", "serving infra default", 1),
            row("3", "Serving Infra Default ", 2),
            row("4", "Serving Infra Default", 3),
        ];
        let out = filter(rows, &Match::Name("Serving Infra Default"));
        let ids: Vec<&str> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["1", "4"]);
    }

    #[test]
    fn test_filter_no_matches_is_empty() {
        let rows = vec![row("1", "a", 0), row("2", "b", 1)];
        assert!(filter(rows, &Match::Name("c")).is_empty());
    }

    #[test]
    fn test_filter_does_not_reorder() {
        let rows = vec![row("1", "z", 0), row("2", "z", 1), row("3", "a", 2)];
        let out = filter(rows.clone(), &Match::Name("z"));
        assert_eq!(out, rows[..2].to_vec());
    }

    #[test]
    fn test_filter_empty_input() {
        let rows: Vec<Row> = Vec::new();
        assert!(filter(rows, &Match::Id("X")).is_empty());
    }
}
