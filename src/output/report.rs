// Markdown report generation
//
// Renders the embedded Tera template with precomputed rows: joined cycle
// chains, the top-10 coupling table, a size-capped dependency diagram and
// the optional catalog, call-graph and correlation sections.

use serde::Serialize;
use tera::{Context, Tera};

use crate::analysis::{Analysis, ClassCallGraph};
use crate::catalog::ServiceCatalog;
use crate::config::DiagramConfig;
use crate::correlation::CorrelationSignals;
use crate::error::Result;

use super::mermaid::MermaidGenerator;
use super::sequence::endpoint_diagrams;

/// Everything the report can draw from
pub struct ReportInputs<'a> {
    pub analysis: &'a Analysis,
    pub catalog: Option<&'a ServiceCatalog>,
    pub correlation: Option<&'a CorrelationSignals>,
    pub call_graphs: &'a [ClassCallGraph],
    pub project_name: &'a str,
}

#[derive(Serialize)]
struct EndpointRow {
    controller: String,
    method: String,
    verbs: String,
    route: String,
    components: String,
    steps: String,
}

#[derive(Serialize)]
struct DiagramSection {
    title: String,
    diagram: String,
}

/// Renders the Markdown analysis report
pub struct ReportGenerator {
    tera: Tera,
}

impl ReportGenerator {
    /// Create a generator with the embedded report template
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();
        tera.add_raw_template("report.md", include_str!("../../templates/report.md.tera"))?;
        Ok(Self { tera })
    }

    /// Render the report
    pub fn render(&self, inputs: &ReportInputs, diagrams: &DiagramConfig) -> Result<String> {
        let report = inputs.analysis.report();

        let cycles: Vec<String> = report
            .circular_dependencies
            .iter()
            .map(|cycle| cycle.join(" -> "))
            .collect();

        let coupled: Vec<_> = report.highly_coupled_files.iter().take(10).collect();

        let mut context = Context::new();
        context.insert("project_name", inputs.project_name);
        context.insert("file_count", &report.file_count);
        context.insert("class_count", &report.class_count);
        context.insert("dependency_count", &report.dependency_count);
        context.insert(
            "external_dependency_count",
            &report.external_dependency_count,
        );
        context.insert("cycles", &cycles);
        context.insert("orphans", &report.orphaned_files);
        context.insert("coupled", &coupled);

        let diagram = if diagrams.enabled {
            let generator =
                MermaidGenerator::with_limits(diagrams.max_sources, diagrams.max_targets_per_source);
            Some(generator.dependency_graph(inputs.analysis))
        } else {
            None
        };
        context.insert("diagram", &diagram);

        let mut endpoint_rows = Vec::new();
        let mut flow_graph = None;
        let mut sequences = Vec::new();
        if let Some(catalog) = inputs.catalog {
            endpoint_rows = catalog
                .api_spec
                .iter()
                .map(|row| EndpointRow {
                    controller: row.controller.clone(),
                    method: row.method.clone(),
                    verbs: row.http_verbs.join(", "),
                    route: row.route.clone(),
                    components: row.components.join(", "),
                    steps: row.steps.join("; "),
                })
                .collect();

            if diagrams.enabled {
                flow_graph = MermaidGenerator::new().flow_graph(catalog);
                sequences = endpoint_diagrams(catalog)
                    .into_iter()
                    .map(|diagram| DiagramSection {
                        title: format!(
                            "{} {}",
                            diagram.http_verbs.join(", "),
                            if diagram.route.is_empty() {
                                diagram.method.clone()
                            } else {
                                diagram.route.clone()
                            }
                        ),
                        diagram: diagram.diagram,
                    })
                    .collect();
            }
        }
        context.insert("endpoints", &endpoint_rows);
        context.insert("flow_graph", &flow_graph);
        context.insert("sequences", &sequences);

        let call_graphs: Vec<DiagramSection> = if diagrams.enabled {
            let generator = MermaidGenerator::new();
            inputs
                .call_graphs
                .iter()
                .map(|graph| DiagramSection {
                    title: graph.class.clone(),
                    diagram: generator.class_call_graph(graph),
                })
                .collect()
        } else {
            Vec::new()
        };
        context.insert("call_graphs", &call_graphs);

        let correlation = inputs
            .correlation
            .filter(|_| diagrams.enabled)
            .and_then(|signals| MermaidGenerator::new().correlation_diagram(signals));
        context.insert("correlation", &correlation);

        Ok(self.tera.render("report.md", &context)?)
    }
}
