//! Mapping-table lint: patterns of one account that also match another's.

use std::fmt;

use csv2qif_core::{MappingTable, Pattern};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub pattern: String,
    pub account: String,
    pub matched_pattern: String,
    pub matched_account: String,
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Conflict: '{}' ({}) matches '{}' ({})",
            self.pattern, self.account, self.matched_pattern, self.matched_account
        )
    }
}

fn conflict(pattern: (&str, &Pattern), matched: (&str, &Pattern)) -> Conflict {
    Conflict {
        pattern: pattern.1.as_str().to_string(),
        account: pattern.0.to_string(),
        matched_pattern: matched.1.as_str().to_string(),
        matched_account: matched.0.to_string(),
    }
}

/// Every pair of patterns under different accounts where one matches the
/// other's text. Each pair is reported once.
pub fn find_conflicts(table: &MappingTable) -> Vec<Conflict> {
    let entries: Vec<(&str, &Pattern)> = table
        .iter()
        .flat_map(|(account, patterns)| patterns.iter().map(move |p| (account, p)))
        .collect();

    let mut conflicts = Vec::new();
    for (i, &outer) in entries.iter().enumerate() {
        for &inner in &entries[..i] {
            if outer.0 == inner.0 {
                continue;
            }
            if outer.1.matches(inner.1.as_str()) {
                conflicts.push(conflict(outer, inner));
            } else if inner.1.matches(outer.1.as_str()) {
                conflicts.push(conflict(inner, outer));
            }
        }
    }
    conflicts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlapping_patterns_conflict() {
        let table = MappingTable::new()
            .with("Expenses:Groceries", ["rimi"])
            .with("Expenses:Food", ["rimi hyper"]);
        let conflicts = find_conflicts(&table);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(
            conflicts[0].to_string(),
            "Conflict: 'rimi' (Expenses:Groceries) matches 'rimi hyper' (Expenses:Food)"
        );
    }

    #[test]
    fn test_regex_pattern_conflict() {
        let table = MappingTable::new()
            .with("Expenses:Utilities", ["^elektrum"])
            .with("Expenses:Other", ["Elektrum AS"]);
        let conflicts = find_conflicts(&table);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].pattern, "^elektrum");
        assert_eq!(conflicts[0].matched_account, "Expenses:Other");
    }

    #[test]
    fn test_same_account_and_disjoint_patterns_are_fine() {
        let table = MappingTable::new()
            .with("Expenses:Groceries", ["rimi", "rimi hyper"])
            .with("Income:Salary", ["salary"])
            .with("Expenses:Fees", ["fee ("]);
        assert!(find_conflicts(&table).is_empty());
    }
}
