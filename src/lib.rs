//! Depscribe - Cross-file static analysis for documentation generation
//!
//! Turns heuristically-extracted symbol tables into a dependency graph,
//! intra-class call graphs, an HTTP-endpoint catalog and cross-stack
//! correlation signals, and exports them as JSON, DOT, Mermaid and
//! Markdown.

pub mod analysis;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod correlation;
pub mod error;
pub mod extract;
pub mod output;
pub mod source;

// Re-export main types
pub use analysis::{Analysis, AnalysisReport, Analyzer, CallGraphExtractor};
pub use catalog::{CatalogBuilder, ServiceCatalog};
pub use config::Config;
pub use correlation::{CorrelationAnalyzer, CorrelationSignals};
pub use error::{Error, Result};
pub use extract::{ExtractorSet, SymbolExtractor, SymbolTable};
pub use output::{MermaidGenerator, ReportGenerator, ReportInputs};
pub use source::{Language, SourceFile};
