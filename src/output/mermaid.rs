// Mermaid diagram generation
//
// All graph-style diagrams share one node-id convention: a sanitized,
// length-capped slug plus a short content-hash suffix, so distinct paths
// can never collide after sanitization.

use crate::analysis::{Analysis, ClassCallGraph};
use crate::catalog::ServiceCatalog;
use crate::correlation::CorrelationSignals;
use sha2::{Digest, Sha256};
use std::collections::{BTreeMap, BTreeSet};

/// Sanitize a free-form value for use as a Mermaid node id (catalog and
/// call-graph diagrams, where class/method names are already distinct)
pub fn safe_id(value: &str) -> String {
    let sanitized: String = value
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(50)
        .collect();
    if sanitized.is_empty() {
        "node".to_string()
    } else {
        sanitized
    }
}

/// Collision-safe node id for a file path: sanitized slug capped at 40
/// chars plus an 8-hex hash of the full path
pub fn path_node_id(path: &str) -> String {
    let slug: String = path
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .take(40)
        .collect();
    let digest = Sha256::digest(path.as_bytes());
    let hash: String = digest.iter().take(4).map(|b| format!("{:02x}", b)).collect();
    format!("{}_{}", slug, hash)
}

/// Generates Mermaid diagrams from analysis state
pub struct MermaidGenerator {
    /// Maximum source nodes whose edges are rendered; None = unlimited
    max_sources: Option<usize>,
    /// Maximum edges rendered per source; None = unlimited
    max_targets_per_source: Option<usize>,
}

impl MermaidGenerator {
    /// Unlimited generator for standalone exports
    pub fn new() -> Self {
        Self {
            max_sources: None,
            max_targets_per_source: None,
        }
    }

    /// Size-capped generator for report embedding
    pub fn with_limits(max_sources: usize, max_targets_per_source: usize) -> Self {
        Self {
            max_sources: Some(max_sources),
            max_targets_per_source: Some(max_targets_per_source),
        }
    }

    /// Render the file dependency graph.
    ///
    /// Labels show the filename (with a parent-folder prefix when two
    /// files share a name) and the first declared class when present.
    pub fn dependency_graph(&self, analysis: &Analysis) -> String {
        let labels = node_labels(analysis);
        let mut lines = vec!["graph LR".to_string()];

        let mut rendered: BTreeSet<&str> = BTreeSet::new();
        let mut edge_lines = Vec::new();

        for (i, (source, targets)) in analysis.dependencies.iter().enumerate() {
            if let Some(max) = self.max_sources {
                if i >= max {
                    break;
                }
            }
            for (j, target) in targets.iter().enumerate() {
                if let Some(max) = self.max_targets_per_source {
                    if j >= max {
                        break;
                    }
                }
                rendered.insert(source);
                rendered.insert(target);
                edge_lines.push(format!(
                    "    {} --> {}",
                    path_node_id(source),
                    path_node_id(target)
                ));
            }
        }

        // Uncapped output declares every indexed file; the capped variant
        // only declares participants to keep the embedded diagram small
        let declare_all = self.max_sources.is_none();
        for path in analysis.index.files.keys() {
            if declare_all || rendered.contains(path.as_str()) {
                let label = labels.get(path).cloned().unwrap_or_else(|| path.clone());
                lines.push(format!("    {}[\"{}\"]", path_node_id(path), label));
            }
        }

        lines.extend(edge_lines);
        lines.join("\n")
    }

    /// Render one class's intra-class call graph
    pub fn class_call_graph(&self, graph: &ClassCallGraph) -> String {
        let mut lines = vec!["graph TD".to_string()];
        for edge in &graph.edges {
            let caller = format!("{}.{}", graph.class, edge.caller);
            let callee = format!("{}.{}", graph.class, edge.callee);
            lines.push(format!(
                "    {}[\"{}\"] --> {}[\"{}\"]",
                safe_id(&caller),
                caller,
                safe_id(&callee),
                callee
            ));
        }
        lines.join("\n")
    }

    /// Render the controller → dependency flow graph, or None when the
    /// catalog found no controller dependencies
    pub fn flow_graph(&self, catalog: &ServiceCatalog) -> Option<String> {
        let mut lines = vec!["graph LR".to_string()];
        let mut edges_added: BTreeSet<String> = BTreeSet::new();

        for (controller, deps) in &catalog.controller_dependencies {
            let src_id = safe_id(controller);
            for dep in deps {
                let dst_id = safe_id(dep);
                let edge_key = format!("{}->{}", src_id, dst_id);
                if !edges_added.insert(edge_key) {
                    continue;
                }
                lines.push(format!(
                    "    {}[\"{}\"] --> {}[\"{}\"]",
                    src_id, controller, dst_id, dep
                ));
            }
        }

        if edges_added.is_empty() {
            None
        } else {
            Some(lines.join("\n"))
        }
    }

    /// Render the cross-stack relationship diagram, or None when every
    /// bucket is empty
    pub fn correlation_diagram(&self, signals: &CorrelationSignals) -> Option<String> {
        if signals.is_empty() {
            return None;
        }

        let backend = signals.backend_messaging.len();
        let frontend = signals.frontend_messaging.len();
        let ui = signals.ui_files.len();

        let mut lines = vec!["graph LR".to_string()];
        if backend > 0 {
            lines.push(format!("    BACKEND[\".NET Services ({})\"]", backend));
        }
        if frontend > 0 {
            lines.push(format!("    FRONTEND[\"Node.js Services ({})\"]", frontend));
        }
        if ui > 0 {
            lines.push(format!("    UI[\"Angular UI ({})\"]", ui));
        }
        if backend > 0 || frontend > 0 {
            lines.push("    MQ[\"RabbitMQ / Messaging\"]".to_string());
        }

        if backend > 0 {
            lines.push("    BACKEND --> MQ".to_string());
        }
        if frontend > 0 {
            lines.push("    FRONTEND --> MQ".to_string());
        }
        if ui > 0 && frontend > 0 {
            lines.push("    UI --> FRONTEND".to_string());
        } else if ui > 0 {
            lines.push("    UI --> MQ".to_string());
        }

        Some(lines.join("\n"))
    }
}

impl Default for MermaidGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Node labels: filename, parent-folder prefix on duplicate filenames,
/// plus the first declared class when the file has one
fn node_labels(analysis: &Analysis) -> BTreeMap<String, String> {
    let mut filename_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for path in analysis.index.files.keys() {
        *filename_counts.entry(file_name(path)).or_default() += 1;
    }

    let mut labels = BTreeMap::new();
    for (path, entry) in &analysis.index.files {
        let name = file_name(path);
        let mut label = if filename_counts.get(name).copied().unwrap_or(0) > 1 {
            match parent_folder(path) {
                Some(parent) => format!("{}/{}", parent, name),
                None => name.to_string(),
            }
        } else {
            name.to_string()
        };

        if let Some(first) = entry.types.first() {
            label.push_str(&format!(" / {}", first.name));
        }

        labels.insert(path.clone(), label);
    }
    labels
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

fn parent_folder(path: &str) -> Option<&str> {
    let mut parts = path.rsplit('/');
    parts.next();
    parts.next()
}
