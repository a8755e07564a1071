// Coupling and orphan analysis

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Coupling figures for one file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouplingRecord {
    pub file: String,
    /// Outgoing dependency count
    pub dependencies: usize,
    /// Incoming dependency count
    pub dependents: usize,
    pub total_coupling: usize,
}

/// Files with no dependencies in either direction
pub fn orphaned_files(
    nodes: impl Iterator<Item = impl AsRef<str>>,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
    dependent_counts: &BTreeMap<String, usize>,
) -> Vec<String> {
    let mut orphaned = Vec::new();
    for node in nodes {
        let node = node.as_ref();
        let has_dependencies = dependencies.get(node).map_or(false, |d| !d.is_empty());
        let has_dependents = dependent_counts.get(node).copied().unwrap_or(0) > 0;
        if !has_dependencies && !has_dependents {
            orphaned.push(node.to_string());
        }
    }
    orphaned
}

/// Files whose combined in+out degree reaches the threshold, sorted by
/// total descending; equal totals are ordered by path ascending.
pub fn highly_coupled_files(
    nodes: impl Iterator<Item = impl AsRef<str>>,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
    dependent_counts: &BTreeMap<String, usize>,
    threshold: usize,
) -> Vec<CouplingRecord> {
    let mut records = Vec::new();
    for node in nodes {
        let node = node.as_ref();
        let outgoing = dependencies.get(node).map_or(0, |d| d.len());
        let incoming = dependent_counts.get(node).copied().unwrap_or(0);
        let total = outgoing + incoming;
        if total >= threshold {
            records.push(CouplingRecord {
                file: node.to_string(),
                dependencies: outgoing,
                dependents: incoming,
                total_coupling: total,
            });
        }
    }

    records.sort_by(|a, b| {
        b.total_coupling
            .cmp(&a.total_coupling)
            .then_with(|| a.file.cmp(&b.file))
    });
    records
}

/// Incoming edge counts for every node, computed by scanning all
/// adjacency sets
pub fn dependent_counts(
    nodes: impl Iterator<Item = impl AsRef<str>>,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
) -> BTreeMap<String, usize> {
    nodes
        .map(|node| {
            let node = node.as_ref();
            let count = dependencies
                .values()
                .filter(|targets| targets.contains(node))
                .count();
            (node.to_string(), count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph(edges: &[(&str, &str)]) -> BTreeMap<String, BTreeSet<String>> {
        let mut deps: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (from, to) in edges {
            deps.entry(from.to_string())
                .or_default()
                .insert(to.to_string());
        }
        deps
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_orphan_is_fully_disconnected() {
        let deps = graph(&[("a", "b")]);
        let all = names(&["a", "b", "lonely"]);
        let counts = dependent_counts(all.iter(), &deps);

        let orphans = orphaned_files(all.iter(), &deps, &counts);
        assert_eq!(orphans, vec!["lonely".to_string()]);
    }

    #[test]
    fn test_dependency_only_file_is_not_orphan() {
        let deps = graph(&[("a", "b")]);
        let all = names(&["a", "b"]);
        let counts = dependent_counts(all.iter(), &deps);

        let orphans = orphaned_files(all.iter(), &deps, &counts);
        assert!(orphans.is_empty());
    }

    #[test]
    fn test_dependent_counts_match_adjacency() {
        let deps = graph(&[("a", "c"), ("b", "c"), ("c", "a")]);
        let all = names(&["a", "b", "c"]);
        let counts = dependent_counts(all.iter(), &deps);

        assert_eq!(counts.get("a"), Some(&1));
        assert_eq!(counts.get("b"), Some(&0));
        assert_eq!(counts.get("c"), Some(&2));
    }

    #[test]
    fn test_highly_coupled_threshold() {
        // hub: 3 out + 2 in = 5
        let deps = graph(&[
            ("hub", "a"),
            ("hub", "b"),
            ("hub", "c"),
            ("x", "hub"),
            ("y", "hub"),
        ]);
        let all = names(&["hub", "a", "b", "c", "x", "y"]);
        let counts = dependent_counts(all.iter(), &deps);

        let coupled = highly_coupled_files(all.iter(), &deps, &counts, 5);
        assert_eq!(coupled.len(), 1);
        assert_eq!(coupled[0].file, "hub");
        assert_eq!(coupled[0].dependencies, 3);
        assert_eq!(coupled[0].dependents, 2);
        assert_eq!(coupled[0].total_coupling, 5);

        let coupled = highly_coupled_files(all.iter(), &deps, &counts, 6);
        assert!(coupled.is_empty());
    }

    #[test]
    fn test_highly_coupled_sorted_descending() {
        let deps = graph(&[
            ("big", "a"),
            ("big", "b"),
            ("big", "c"),
            ("small", "a"),
            ("small", "b"),
        ]);
        let all = names(&["big", "small", "a", "b", "c"]);
        let counts = dependent_counts(all.iter(), &deps);

        let coupled = highly_coupled_files(all.iter(), &deps, &counts, 2);
        assert_eq!(coupled[0].file, "big");
        assert_eq!(coupled[1].file, "small");
    }

    #[test]
    fn test_ties_break_by_path() {
        let deps = graph(&[("m", "a"), ("m", "b"), ("n", "a"), ("n", "b")]);
        let all = names(&["m", "n", "a", "b"]);
        let counts = dependent_counts(all.iter(), &deps);

        let coupled = highly_coupled_files(all.iter(), &deps, &counts, 2);
        let files: Vec<&str> = coupled.iter().map(|r| r.file.as_str()).collect();
        assert_eq!(files, vec!["a", "b", "m", "n"]);
    }
}
