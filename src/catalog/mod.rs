// Service catalog
//
// Cross-file endpoint and flow inventory for attribute-bearing controller
// code: which controllers exist, what they expose, what each endpoint does
// step by step, and which service/repository/consumer classes a controller
// reaches through its file-level dependency edges.

mod endpoints;
mod flows;

pub use endpoints::{Controller, Endpoint, EndpointExtractor, FileScan};
pub use flows::{ConsumerInfo, ConsumerMap, EndpointFlow, StepInferencer};

use crate::analysis::Analysis;
use crate::error::Result;
use crate::source::{Language, SourceFile};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One flattened row of the endpoint table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSpecRow {
    pub controller: String,
    pub method: String,
    pub http_verbs: Vec<String>,
    pub route: String,
    /// Controller plus its catalog-relevant dependencies
    pub components: Vec<String>,
    pub steps: Vec<String>,
}

/// The assembled service catalog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceCatalog {
    pub controllers: Vec<Controller>,
    /// Service/Repository-suffixed class names, sorted and deduplicated
    pub services: Vec<String>,
    /// I-prefixed class names, sorted and deduplicated
    pub interfaces: Vec<String>,
    pub endpoints: Vec<Endpoint>,
    /// Controller name → dependency class names, discovery order
    pub controller_dependencies: BTreeMap<String, Vec<String>>,
    pub endpoint_flows: Vec<EndpointFlow>,
    pub api_spec: Vec<ApiSpecRow>,
}

impl ServiceCatalog {
    /// Whether the batch produced any catalog content at all
    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty() && self.endpoints.is_empty()
    }
}

/// Builds the service catalog from a batch of files
pub struct CatalogBuilder {
    extractor: EndpointExtractor,
    inferencer: StepInferencer,
}

impl CatalogBuilder {
    pub fn new() -> Result<Self> {
        Ok(Self {
            extractor: EndpointExtractor::new()?,
            inferencer: StepInferencer::new()?,
        })
    }

    /// Build the catalog. Endpoint-to-dependency edges come from the
    /// dependency analysis when one is supplied; without it the catalog
    /// still lists controllers, endpoints and flows.
    pub fn build(&self, files: &[SourceFile], analysis: Option<&Analysis>) -> ServiceCatalog {
        let mut controllers = Vec::new();
        let mut endpoints = Vec::new();
        let mut services = BTreeSet::new();
        let mut interfaces = BTreeSet::new();
        let mut class_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let mut endpoint_bodies: BTreeMap<String, String> = BTreeMap::new();

        let consumer_map = self.inferencer.build_consumer_map(files);

        for file in files {
            if file.language != Language::CSharp {
                continue;
            }
            let scan = self.extractor.scan(&file.content);

            for class in &scan.classes {
                if class.ends_with("Service") || class.ends_with("Repository") {
                    services.insert(class.clone());
                }
                if class.starts_with('I') && class.len() > 1 {
                    interfaces.insert(class.clone());
                }
            }

            class_map.insert(file.relative_path.clone(), scan.classes);
            controllers.extend(scan.controllers);
            endpoints.extend(scan.endpoints);
            endpoint_bodies.extend(scan.endpoint_bodies);
        }

        let controller_dependencies =
            self.controller_dependencies(&controllers, &class_map, analysis);
        let endpoint_flows =
            self.inferencer
                .build_endpoint_flows(&endpoints, &endpoint_bodies, &consumer_map);
        let api_spec = build_api_spec(&endpoints, &controller_dependencies, &endpoint_flows);

        ServiceCatalog {
            controllers,
            services: services.into_iter().collect(),
            interfaces: interfaces.into_iter().collect(),
            endpoints,
            controller_dependencies,
            endpoint_flows,
            api_spec,
        }
    }

    /// Intersect each controller's file-level dependency edges with files
    /// declaring catalog-relevant classes (Service/Repository/Consumer/
    /// Handler suffix, or I prefix).
    fn controller_dependencies(
        &self,
        controllers: &[Controller],
        class_map: &BTreeMap<String, Vec<String>>,
        analysis: Option<&Analysis>,
    ) -> BTreeMap<String, Vec<String>> {
        let mut dependencies: BTreeMap<String, Vec<String>> = BTreeMap::new();
        let analysis = match analysis {
            Some(analysis) => analysis,
            None => return dependencies,
        };

        // Controller class name → declaring file
        let mut controller_files: BTreeMap<&str, &str> = BTreeMap::new();
        for (path, classes) in class_map {
            for class in classes {
                if class.ends_with("Controller") {
                    controller_files.insert(class.as_str(), path.as_str());
                }
            }
        }

        for controller in controllers {
            let file_path = match controller_files.get(controller.name.as_str()) {
                Some(path) => *path,
                None => continue,
            };
            let deps = match analysis.dependencies.get(file_path) {
                Some(deps) => deps,
                None => continue,
            };

            for dep_path in deps {
                let dep_classes = match class_map.get(dep_path) {
                    Some(classes) => classes,
                    None => continue,
                };
                for dep_class in dep_classes {
                    if !is_catalog_component(dep_class) {
                        continue;
                    }
                    let entry = dependencies.entry(controller.name.clone()).or_default();
                    if !entry.contains(dep_class) {
                        entry.push(dep_class.clone());
                    }
                }
            }
        }

        dependencies
    }
}

fn is_catalog_component(class_name: &str) -> bool {
    class_name.ends_with("Service")
        || class_name.ends_with("Repository")
        || class_name.ends_with("Consumer")
        || class_name.ends_with("Handler")
        || class_name.starts_with('I')
}

fn build_api_spec(
    endpoints: &[Endpoint],
    controller_dependencies: &BTreeMap<String, Vec<String>>,
    endpoint_flows: &[EndpointFlow],
) -> Vec<ApiSpecRow> {
    let flow_lookup: BTreeMap<String, &EndpointFlow> = endpoint_flows
        .iter()
        .map(|flow| (format!("{}.{}", flow.controller, flow.method), flow))
        .collect();

    endpoints
        .iter()
        .map(|endpoint| {
            let deps = controller_dependencies
                .get(&endpoint.controller)
                .cloned()
                .unwrap_or_default();
            let steps = flow_lookup
                .get(&endpoint.key())
                .map(|flow| flow.steps.clone())
                .unwrap_or_default();

            let mut components = vec![endpoint.controller.clone()];
            components.extend(deps);

            ApiSpecRow {
                controller: endpoint.controller.clone(),
                method: endpoint.method.clone(),
                http_verbs: endpoint.http_verbs.clone(),
                route: endpoint.route.clone(),
                components,
                steps,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Analyzer;
    use crate::config::AnalysisConfig;
    use crate::extract::ExtractorSet;

    const CONTROLLER: &str = r#"
using Shop.Services;

namespace Shop.Api
{
    [ApiController]
    [Route("api/[controller]")]
    public class OrdersController : ControllerBase
    {
        private readonly OrderService _service;

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
"#;

    const SERVICE: &str = r#"
namespace Shop.Services
{
    public class OrderService
    {
        public void Place() { }
    }
}
"#;

    const CONSUMER: &str = r#"
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
"#;

    fn batch() -> Vec<SourceFile> {
        vec![
            SourceFile::new(
                "/r/OrdersController.cs",
                "OrdersController.cs",
                Language::CSharp,
                CONTROLLER,
            ),
            SourceFile::new("/r/OrderService.cs", "OrderService.cs", Language::CSharp, SERVICE),
            SourceFile::new(
                "/r/OrderCreatedConsumer.cs",
                "OrderCreatedConsumer.cs",
                Language::CSharp,
                CONSUMER,
            ),
        ]
    }

    #[test]
    fn test_catalog_lists_controllers_and_endpoints() {
        let builder = CatalogBuilder::new().unwrap();
        let catalog = builder.build(&batch(), None);

        assert_eq!(catalog.controllers.len(), 1);
        assert_eq!(catalog.controllers[0].route, "api/orders");
        assert_eq!(catalog.endpoints.len(), 1);
        assert!(!catalog.is_empty());
    }

    #[test]
    fn test_services_and_interfaces_sorted_deduped() {
        let builder = CatalogBuilder::new().unwrap();
        let catalog = builder.build(&batch(), None);

        assert_eq!(catalog.services, vec!["OrderService".to_string()]);
        // IConsumer is not a declared class in the batch, so interfaces
        // only carries I-prefixed declared names (none here)
        assert!(catalog.interfaces.is_empty());
    }

    #[test]
    fn test_flow_spans_async_consumer_hop() {
        let builder = CatalogBuilder::new().unwrap();
        let catalog = builder.build(&batch(), None);

        assert_eq!(catalog.endpoint_flows.len(), 1);
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
    }

    #[test]
    fn test_controller_dependencies_from_analysis() {
        let files = batch();
        let analyzer = Analyzer::new(AnalysisConfig::default());
        let extractors = ExtractorSet::with_defaults().unwrap();
        let analysis = analyzer.analyze(&files, &extractors);

        let builder = CatalogBuilder::new().unwrap();
        let catalog = builder.build(&files, Some(&analysis));

        let deps = catalog
            .controller_dependencies
            .get("OrdersController")
            .expect("controller should have dependencies");
        assert!(deps.contains(&"OrderService".to_string()));
    }

    #[test]
    fn test_api_spec_rows() {
        let files = batch();
        let analyzer = Analyzer::new(AnalysisConfig::default());
        let extractors = ExtractorSet::with_defaults().unwrap();
        let analysis = analyzer.analyze(&files, &extractors);

        let builder = CatalogBuilder::new().unwrap();
        let catalog = builder.build(&files, Some(&analysis));

        assert_eq!(catalog.api_spec.len(), 1);
        let row = &catalog.api_spec[0];
        assert_eq!(row.controller, "OrdersController");
        assert_eq!(row.http_verbs, vec!["POST".to_string()]);
        assert_eq!(row.route, "api/orders");
        assert_eq!(row.components[0], "OrdersController");
        assert!(!row.steps.is_empty());
    }

    #[test]
    fn test_empty_batch_yields_empty_catalog() {
        let builder = CatalogBuilder::new().unwrap();
        let catalog = builder.build(&[], None);
        assert!(catalog.is_empty());
        assert!(catalog.api_spec.is_empty());
    }

    #[test]
    fn test_non_csharp_files_ignored() {
        let files = vec![SourceFile::new(
            "/r/app.ts",
            "app.ts",
            Language::TypeScript,
            "class OrdersController {}",
        )];
        let builder = CatalogBuilder::new().unwrap();
        let catalog = builder.build(&files, None);
        assert!(catalog.is_empty());
    }
}
