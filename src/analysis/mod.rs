// Dependency analysis pipeline
//
// Index building, import resolution, graph assembly and the derived
// metrics. The analyzer holds no mutable state between runs: every call to
// `analyze` builds a fresh `Analysis` from nothing, so one long-lived
// analyzer can safely serve independent batches in sequence.

pub mod call_graph;
pub mod coupling;
pub mod cycles;
pub mod graph;
pub mod index;
pub mod resolver;

pub use call_graph::{CallEdge, CallGraphExtractor, ClassCallGraph};
pub use coupling::CouplingRecord;
pub use graph::{DependencyEdge, DependencyMap, DependencyNode};
pub use index::{FileEntry, ProjectIndex, QualifiedType};
pub use resolver::{ImportResolver, Resolution};

use crate::config::AnalysisConfig;
use crate::extract::ExtractorSet;
use crate::source::SourceFile;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Runs the dependency analysis pipeline over a batch of files
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    /// Analyze one batch of files.
    ///
    /// Indexing runs first and in full; resolution runs strictly after,
    /// since it needs the complete class and package indices.
    pub fn analyze(&self, files: &[SourceFile], extractors: &ExtractorSet) -> Analysis {
        let index = ProjectIndex::build(files, extractors);

        let mut dependencies: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        let mut externals: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        {
            let resolver = ImportResolver::new(&index);
            for file in files {
                let entry = match index.files.get(&file.relative_path) {
                    Some(entry) => entry,
                    None => continue,
                };

                for raw_import in &entry.symbols.imports {
                    match resolver.resolve(raw_import, entry, &file.content) {
                        Resolution::Internal(targets) => {
                            for target in targets {
                                // Self-references are dropped, never recorded
                                if target == file.relative_path {
                                    continue;
                                }
                                dependencies
                                    .entry(file.relative_path.clone())
                                    .or_default()
                                    .insert(target);
                            }
                        }
                        Resolution::External => {
                            externals
                                .entry(file.relative_path.clone())
                                .or_default()
                                .insert(raw_import.trim().to_string());
                        }
                    }
                }
            }
        }

        Analysis {
            index,
            dependencies,
            external_dependencies: externals,
            coupling_threshold: self.config.coupling_threshold,
        }
    }
}

/// The complete result state of one analysis run. Exports are pure
/// functions of this.
#[derive(Debug)]
pub struct Analysis {
    pub index: ProjectIndex,
    /// Source path → set of target paths (deduplicated, no self-loops)
    pub dependencies: BTreeMap<String, BTreeSet<String>>,
    /// Source path → unresolved import strings
    pub external_dependencies: BTreeMap<String, BTreeSet<String>>,
    coupling_threshold: usize,
}

impl Analysis {
    /// Total number of internal dependency edges
    pub fn dependency_count(&self) -> usize {
        self.dependencies.values().map(|d| d.len()).sum()
    }

    /// Total number of recorded external imports
    pub fn external_dependency_count(&self) -> usize {
        self.external_dependencies.values().map(|d| d.len()).sum()
    }

    /// Build the serializable dependency map
    pub fn dependency_map(&self) -> DependencyMap {
        graph::build_dependency_map(&self.index, &self.dependencies, &self.external_dependencies)
    }

    /// Detect circular dependencies
    pub fn circular_dependencies(&self) -> Vec<Vec<String>> {
        cycles::detect_cycles(self.index.files.keys(), &self.dependencies)
    }

    /// Files with no edges in either direction
    pub fn orphaned_files(&self) -> Vec<String> {
        let counts = coupling::dependent_counts(self.index.files.keys(), &self.dependencies);
        coupling::orphaned_files(self.index.files.keys(), &self.dependencies, &counts)
    }

    /// Files at or above the coupling threshold, most coupled first
    pub fn highly_coupled_files(&self) -> Vec<CouplingRecord> {
        let counts = coupling::dependent_counts(self.index.files.keys(), &self.dependencies);
        coupling::highly_coupled_files(
            self.index.files.keys(),
            &self.dependencies,
            &counts,
            self.coupling_threshold,
        )
    }

    /// Assemble the full analysis report
    pub fn report(&self) -> AnalysisReport {
        AnalysisReport {
            dependency_map: self.dependency_map(),
            file_count: self.index.file_count(),
            class_count: self.index.class_count(),
            dependency_count: self.dependency_count(),
            external_dependency_count: self.external_dependency_count(),
            circular_dependencies: self.circular_dependencies(),
            orphaned_files: self.orphaned_files(),
            highly_coupled_files: self.highly_coupled_files(),
        }
    }
}

/// Serializable analysis result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub dependency_map: DependencyMap,
    pub file_count: usize,
    pub class_count: usize,
    pub dependency_count: usize,
    pub external_dependency_count: usize,
    pub circular_dependencies: Vec<Vec<String>>,
    pub orphaned_files: Vec<String>,
    pub highly_coupled_files: Vec<CouplingRecord>,
}
