// Dependency map construction
//
// Flattens the resolved dependency state into serializable nodes and edges.
// External dependencies stay in their own table and never become graph
// edges.

use crate::analysis::index::ProjectIndex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A file node in the dependency map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyNode {
    pub id: String,
    pub path: String,
    pub language: String,
    /// Package or namespace, empty when the file declares none
    pub package: String,
    /// Simple names of declared classes and interfaces
    pub classes: Vec<String>,
    /// Outgoing edge count
    pub dependency_count: usize,
    /// Incoming edge count
    pub dependent_count: usize,
}

/// A directed internal dependency edge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub edge_type: String,
}

/// The full dependency map: nodes, internal edges, and per-file external
/// imports
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyMap {
    pub nodes: Vec<DependencyNode>,
    pub edges: Vec<DependencyEdge>,
    pub external_dependencies: BTreeMap<String, Vec<String>>,
}

/// Build the dependency map from the index and resolved edge sets.
///
/// Incoming counts are computed by scanning all adjacency sets; fine at
/// single-repository scale.
pub fn build_dependency_map(
    index: &ProjectIndex,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
    externals: &BTreeMap<String, BTreeSet<String>>,
) -> DependencyMap {
    let mut nodes = Vec::with_capacity(index.files.len());
    for (path, entry) in &index.files {
        let outgoing = dependencies.get(path).map(|d| d.len()).unwrap_or(0);
        let incoming = dependencies
            .values()
            .filter(|targets| targets.contains(path))
            .count();

        nodes.push(DependencyNode {
            id: path.clone(),
            path: path.clone(),
            language: entry.language.tag().to_string(),
            package: entry.symbols.namespace.clone(),
            classes: entry.types.iter().map(|t| t.name.clone()).collect(),
            dependency_count: outgoing,
            dependent_count: incoming,
        });
    }

    let mut edges = Vec::new();
    for (source, targets) in dependencies {
        for target in targets {
            edges.push(DependencyEdge {
                source: source.clone(),
                target: target.clone(),
                edge_type: "internal".to_string(),
            });
        }
    }

    let external_dependencies = externals
        .iter()
        .map(|(path, deps)| (path.clone(), deps.iter().cloned().collect()))
        .collect();

    DependencyMap {
        nodes,
        edges,
        external_dependencies,
    }
}
