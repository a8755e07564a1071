// Circular dependency detection
//
// Depth-first search from every unvisited node with a global visited set
// and a recursion stack. Each recursive call gets its own copy of the path
// so sibling branches cannot contaminate each other. The same underlying
// cycle can be reported more than once when several roots reach one
// strongly connected component; full SCC enumeration is out of scope.

use std::collections::{BTreeMap, BTreeSet};

/// Detect cycles in the dependency graph.
///
/// Every returned cycle starts and ends on the same node. Iteration is
/// over sorted maps, so results are deterministic for a given graph.
pub fn detect_cycles(
    nodes: impl Iterator<Item = impl AsRef<str>>,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
) -> Vec<Vec<String>> {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut rec_stack: BTreeSet<String> = BTreeSet::new();
    let mut cycles = Vec::new();

    for node in nodes {
        let node = node.as_ref();
        if !visited.contains(node) {
            dfs(
                node,
                Vec::new(),
                dependencies,
                &mut visited,
                &mut rec_stack,
                &mut cycles,
            );
        }
    }

    cycles
}

fn dfs(
    node: &str,
    mut path: Vec<String>,
    dependencies: &BTreeMap<String, BTreeSet<String>>,
    visited: &mut BTreeSet<String>,
    rec_stack: &mut BTreeSet<String>,
    cycles: &mut Vec<Vec<String>>,
) {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(neighbors) = dependencies.get(node) {
        for neighbor in neighbors {
            if !visited.contains(neighbor) {
                dfs(neighbor, path.clone(), dependencies, visited, rec_stack, cycles);
            } else if rec_stack.contains(neighbor) {
                // Close the loop from the neighbor's first occurrence
                let start = path
                    .iter()
                    .position(|p| p == neighbor)
                    .unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].to_vec();
                cycle.push(neighbor.clone());
                cycles.push(cycle);
            }
        }
    }

    rec_stack.remove(node);
}
