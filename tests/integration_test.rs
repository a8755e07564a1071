// Integration tests for depscribe

use depscribe::analysis::Analyzer;
use depscribe::catalog::CatalogBuilder;
use depscribe::config::{AnalysisConfig, Config, DiagramConfig};
use depscribe::extract::ExtractorSet;
use depscribe::output::{self, MermaidGenerator, ReportGenerator, ReportInputs};
use depscribe::source::{Language, SourceFile};

fn analyzer() -> Analyzer {
    Analyzer::new(AnalysisConfig::default())
}

fn extractors() -> ExtractorSet {
    ExtractorSet::with_defaults().expect("extractors should build")
}

fn java(path: &str, content: &str) -> SourceFile {
    SourceFile::new(format!("/repo/{}", path), path, Language::Java, content)
}

fn csharp(path: &str, content: &str) -> SourceFile {
    SourceFile::new(format!("/repo/{}", path), path, Language::CSharp, content)
}

// ============================================================================
// Dependency analysis scenarios
// ============================================================================

#[test]
fn test_exact_import_single_edge() {
    let files = vec![
        java(
            "A.java",
            "package pa;\nimport pb.Target;\npublic class A {}\n",
        ),
        java("B.java", "package pb;\npublic class Target {}\n"),
    ];
    let analysis = analyzer().analyze(&files, &extractors());
    let report = analysis.report();

    assert_eq!(report.file_count, 2);
    assert_eq!(report.dependency_count, 1);
    assert_eq!(report.external_dependency_count, 0);
    assert!(report.circular_dependencies.is_empty());
    assert!(report.orphaned_files.is_empty());

    let edge = &report.dependency_map.edges[0];
    assert_eq!(edge.source, "A.java");
    assert_eq!(edge.target, "B.java");
}

#[test]
fn test_mutual_imports_report_one_cycle() {
    let files = vec![
        java("A.java", "package pa;\nimport pb.B;\npublic class A {}\n"),
        java("B.java", "package pb;\nimport pa.A;\npublic class B {}\n"),
    ];
    let analysis = analyzer().analyze(&files, &extractors());
    let cycles = analysis.circular_dependencies();

    assert_eq!(cycles.len(), 1);
    let cycle = &cycles[0];
    assert_eq!(cycle.len(), 3);
    assert_eq!(cycle.first(), cycle.last());

    // Every consecutive pair is a real edge
    for pair in cycle.windows(2) {
        assert!(analysis
            .dependencies
            .get(&pair[0])
            .map_or(false, |targets| targets.contains(&pair[1])));
    }
}

#[test]
fn test_unmatched_import_lands_in_externals() {
    let files = vec![java(
        "A.java",
        "package pa;\nimport com.vendor.Widget;\nimport com.vendor.util.*;\npublic class A {}\n",
    )];
    let analysis = analyzer().analyze(&files, &extractors());

    assert_eq!(analysis.dependency_count(), 0);
    let externals = analysis.external_dependencies.get("A.java").expect("externals");
    assert!(externals.contains("com.vendor.Widget"));
    // The recorded string keeps the wildcard suffix
    assert!(externals.contains("com.vendor.util.*"));
    assert_eq!(analysis.external_dependency_count(), 2);
}

#[test]
fn test_no_self_loops_property() {
    let files = vec![
        java("A.java", "package pa;\nimport pa.A;\npublic class A {}\n"),
        java(
            "B.java",
            "package pb;\nimport pa.A;\nimport pb.B;\npublic class B {}\n",
        ),
    ];
    let analysis = analyzer().analyze(&files, &extractors());

    for (source, targets) in &analysis.dependencies {
        assert!(!targets.contains(source), "self-loop on {}", source);
    }
}

#[test]
fn test_coupling_symmetry_property() {
    let files = vec![
        java("A.java", "package pa;\nimport ph.Hub;\npublic class A {}\n"),
        java("B.java", "package pb;\nimport ph.Hub;\npublic class B {}\n"),
        java("Hub.java", "package ph;\nimport pa.A;\npublic class Hub {}\n"),
    ];
    let analysis = analyzer().analyze(&files, &extractors());
    let map = analysis.dependency_map();

    for node in &map.nodes {
        let actual = analysis
            .dependencies
            .values()
            .filter(|targets| targets.contains(&node.path))
            .count();
        assert_eq!(node.dependent_count, actual, "dependents of {}", node.path);
    }
}

#[test]
fn test_orphan_correctness_property() {
    let files = vec![
        java("A.java", "package pa;\nimport pb.B;\npublic class A {}\n"),
        java("B.java", "package pb;\npublic class B {}\n"),
        java("Lonely.java", "package pl;\npublic class Lonely {}\n"),
    ];
    let analysis = analyzer().analyze(&files, &extractors());

    assert_eq!(analysis.orphaned_files(), vec!["Lonely.java".to_string()]);
}

#[test]
fn test_idempotence_property() {
    let files = vec![
        java(
            "A.java",
            "package pa;\nimport pb.Target;\nimport gone.Thing;\npublic class A {}\n",
        ),
        java("B.java", "package pb;\npublic class Target {}\n"),
    ];
    let first = analyzer().analyze(&files, &extractors());
    let second = analyzer().analyze(&files, &extractors());

    assert_eq!(first.dependencies, second.dependencies);
    assert_eq!(first.external_dependencies, second.external_dependencies);
    assert_eq!(first.index.class_count(), second.index.class_count());
}

#[test]
fn test_reset_isolation_property() {
    let shared = analyzer();
    let extractors = extractors();

    let batch_a = vec![java("a/First.java", "package pa;\npublic class First {}\n")];
    let batch_b = vec![java("b/Second.java", "package pb;\npublic class Second {}\n")];

    let _first = shared.analyze(&batch_a, &extractors);
    let second = shared.analyze(&batch_b, &extractors);

    let report = second.report();
    assert_eq!(report.file_count, 1);
    assert!(report
        .dependency_map
        .nodes
        .iter()
        .all(|n| n.path != "a/First.java"));
}

#[test]
fn test_highly_coupled_detection() {
    // Hub imports three files and is imported by two: total degree 5
    let files = vec![
        java(
            "Hub.java",
            "package ph;\nimport pa.A;\nimport pb.B;\nimport pc.C;\npublic class Hub {}\n",
        ),
        java("A.java", "package pa;\npublic class A {}\n"),
        java("B.java", "package pb;\npublic class B {}\n"),
        java("C.java", "package pc;\npublic class C {}\n"),
        java("X.java", "package px;\nimport ph.Hub;\npublic class X {}\n"),
        java("Y.java", "package py;\nimport ph.Hub;\npublic class Y {}\n"),
    ];
    let analysis = analyzer().analyze(&files, &extractors());
    let coupled = analysis.highly_coupled_files();

    assert_eq!(coupled.len(), 1);
    assert_eq!(coupled[0].file, "Hub.java");
    assert_eq!(coupled[0].dependencies, 3);
    assert_eq!(coupled[0].dependents, 2);
    assert_eq!(coupled[0].total_coupling, 5);
}

// ============================================================================
// Service catalog scenario
// ============================================================================

#[test]
fn test_endpoint_flow_with_consumer_hop() {
    let controller = csharp(
        "OrdersController.cs",
        r#"
namespace Shop.Api
{
    [ApiController]
    [Route("api/[controller]")]
    public class OrdersController
    {
        [HttpPost]
        public IActionResult Create(OrderDto dto)
        {
            _db.Orders.Add(dto);
            _db.SaveChanges();
            _bus.Publish(new OrderCreated(dto.Id));
            return Ok();
        }
    }
}
"#,
    );
    let consumer = csharp(
        "OrderCreatedConsumer.cs",
        r#"
namespace Shop.Workers
{
    public class OrderCreatedConsumer : IConsumer<OrderCreated>
    {
        private readonly AppDbContext _db;

        public async Task Consume(ConsumeContext<OrderCreated> context)
        {
            await _db.SaveChangesAsync();
        }
    }
}
"#,
    );
    let files = vec![controller, consumer];

    let catalog = CatalogBuilder::new()
        .expect("catalog builder")
        .build(&files, None);

    assert_eq!(catalog.endpoints.len(), 1);
    assert_eq!(catalog.endpoints[0].route, "api/orders");

    let flow = &catalog.endpoint_flows[0];
    assert_eq!(
        flow.steps,
        vec![
            "Insert/Update DB".to_string(),
            "Publish/Send OrderCreated to queue".to_string(),
            "Consumer OrderCreatedConsumer reads queue".to_string(),
            "Consumer OrderCreatedConsumer reads DB".to_string(),
        ]
    );
    assert_eq!(flow.messages, vec!["OrderCreated".to_string()]);
}

// ============================================================================
// Empty input and exports
// ============================================================================

#[test]
fn test_empty_file_list_valid_everywhere() {
    let analysis = analyzer().analyze(&[], &extractors());
    let report = analysis.report();

    assert_eq!(report.file_count, 0);
    assert_eq!(report.class_count, 0);
    assert!(report.circular_dependencies.is_empty());
    assert!(report.orphaned_files.is_empty());
    assert!(report.highly_coupled_files.is_empty());

    // Every export still produces syntactically valid output
    let json = output::render_json(&report).expect("json");
    let parsed: serde_json::Value = serde_json::from_str(&json).expect("valid json");
    assert_eq!(parsed["file_count"], 0);

    let dot = output::render_dot(&analysis);
    assert!(dot.starts_with("digraph Dependencies {"));
    assert!(dot.ends_with("}"));

    let mermaid = MermaidGenerator::new().dependency_graph(&analysis);
    assert_eq!(mermaid, "graph LR");

    let report_md = ReportGenerator::new()
        .expect("report generator")
        .render(
            &ReportInputs {
                analysis: &analysis,
                catalog: None,
                correlation: None,
                call_graphs: &[],
                project_name: "Empty",
            },
            &DiagramConfig::default(),
        )
        .expect("report renders");
    assert!(report_md.contains("**Total Files:** 0"));
}

#[test]
fn test_exports_written_to_disk() {
    use tempfile::TempDir;

    let files = vec![
        java(
            "A.java",
            "package pa;\nimport pb.Target;\npublic class A {}\n",
        ),
        java("B.java", "package pb;\npublic class Target {}\n"),
    ];
    let analysis = analyzer().analyze(&files, &extractors());

    let dir = TempDir::new().expect("temp dir");
    let json_path = dir.path().join("out/dependency_map.json");
    let json = output::render_json(&analysis.report()).expect("json");
    output::write_export(&json_path, &json).expect("write succeeds");

    let written = std::fs::read_to_string(&json_path).expect("file exists");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(parsed["file_count"], 2);
}

// ============================================================================
// End-to-end through the filesystem and binary
// ============================================================================

#[test]
fn test_discovery_and_analysis_from_disk() {
    use std::fs;
    use tempfile::TempDir;

    let dir = TempDir::new().expect("temp dir");
    fs::write(
        dir.path().join("A.java"),
        "package pa;\nimport pb.Target;\npublic class A {}\n",
    )
    .expect("write A");
    fs::write(
        dir.path().join("B.java"),
        "package pb;\npublic class Target {}\n",
    )
    .expect("write B");
    fs::write(dir.path().join("notes.txt"), "not code").expect("write notes");

    let config = Config::default();
    let files = depscribe::source::discover(dir.path(), &config.analysis).expect("discover");
    assert_eq!(files.len(), 2);

    let analysis = analyzer().analyze(&files, &extractors());
    assert_eq!(analysis.index.file_count(), 2);
    assert_eq!(analysis.dependency_count(), 1);
}

#[test]
fn test_cli_analyze_json() {
    use assert_cmd::Command;
    use predicates::prelude::*;
    use std::fs;
    use tempfile::TempDir;

    let project = TempDir::new().expect("project dir");
    fs::write(
        project.path().join("A.java"),
        "package pa;\nimport pb.Target;\npublic class A {}\n",
    )
    .expect("write A");
    fs::write(
        project.path().join("B.java"),
        "package pb;\npublic class Target {}\n",
    )
    .expect("write B");

    let out = TempDir::new().expect("output dir");

    let mut cmd = Command::cargo_bin("depscribe").expect("binary");
    cmd.arg("analyze")
        .arg(project.path())
        .arg("--output")
        .arg(out.path())
        .arg("--format")
        .arg("json");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Analysis complete"));

    let json_path = out.path().join("dependency_map.json");
    let written = fs::read_to_string(&json_path).expect("json written");
    let parsed: serde_json::Value = serde_json::from_str(&written).expect("valid json");
    assert_eq!(parsed["file_count"], 2);
    assert_eq!(parsed["dependency_count"], 1);
}

#[test]
fn test_cli_version() {
    use assert_cmd::Command;
    use predicates::prelude::*;

    let mut cmd = Command::cargo_bin("depscribe").expect("binary");
    cmd.arg("version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("depscribe"));
}
