// Controller and endpoint extraction
//
// Scans attribute-bearing C# sources for controller classes and their
// HTTP-exposed methods. Route templates are joined controller-first and a
// `[controller]` placeholder resolves to the lower-cased controller name
// with its suffix stripped.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::extract::balanced_braces;

/// Bracketed attribute blocks, quoted sections included
const ATTR_PATTERN: &str = r#"\[(?:[^\]"']+|"[^"]*"|'[^']*')+\]"#;

/// A detected controller class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Controller {
    pub name: String,
    /// Base route with the controller token already resolved
    pub route: String,
}

/// An HTTP-exposed controller method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Endpoint {
    pub controller: String,
    pub method: String,
    /// Upper-cased verb set, sorted
    pub http_verbs: Vec<String>,
    /// Joined base + method route
    pub route: String,
}

impl Endpoint {
    /// `Controller.Method` key used to attach bodies and flows
    pub fn key(&self) -> String {
        format!("{}.{}", self.controller, self.method)
    }
}

/// Result of scanning one file
#[derive(Debug, Clone, Default)]
pub struct FileScan {
    /// Every class declared in the file
    pub classes: Vec<String>,
    pub controllers: Vec<Controller>,
    pub endpoints: Vec<Endpoint>,
    /// Endpoint key → raw method body
    pub endpoint_bodies: BTreeMap<String, String>,
}

/// Extracts controllers and endpoints from C# source text
pub struct EndpointExtractor {
    class_re: Regex,
    method_re: Regex,
    method_name_re: Regex,
    verb_re: Regex,
    route_re: Regex,
    http_route_re: Regex,
    controller_token_re: Regex,
}

impl EndpointExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            class_re: Regex::new(&format!(
                r"(?P<attrs>(?:{attr}\s*)*)(?:public|private|internal|protected|abstract|sealed|static|partial)?\s*class\s+(?P<name>\w+)(?:\s*:\s*[\w,\s<>]+)?\s*\{{",
                attr = ATTR_PATTERN
            ))?,
            method_re: Regex::new(&format!(
                r"(?P<attrs>(?:{attr}\s*)*)(?P<signature>(?:public|private|internal|protected)[^{{;]*\{{)",
                attr = ATTR_PATTERN
            ))?,
            method_name_re: Regex::new(r"(\w+)\s*\(")?,
            verb_re: Regex::new(
                r"(?i)\[(HttpGet|HttpPost|HttpPut|HttpDelete|HttpPatch|HttpHead|HttpOptions)\b",
            )?,
            route_re: Regex::new(r#"(?i)\[Route\(\s*"([^"]+)"\s*\)\]"#)?,
            http_route_re: Regex::new(
                r#"(?i)\[Http(?:Get|Post|Put|Delete|Patch|Head|Options)\(\s*"([^"]*)"\s*\)\]"#,
            )?,
            controller_token_re: Regex::new(r"(?i)\[controller\]")?,
        })
    }

    /// Scan one file's text for classes, controllers and endpoints
    pub fn scan(&self, code: &str) -> FileScan {
        let mut scan = FileScan::default();

        for caps in self.class_re.captures_iter(code) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let class_name = caps["name"].to_string();
            scan.classes.push(class_name.clone());

            let attrs = caps.name("attrs").map(|m| m.as_str()).unwrap_or("");
            let body = balanced_braces(code, whole.end() - 1);
            if body.is_empty() {
                continue;
            }

            let class_route =
                self.resolve_controller_token(&self.extract_route(attrs), &class_name);
            let is_controller =
                class_name.ends_with("Controller") || attrs.contains("ApiController");

            if is_controller {
                scan.controllers.push(Controller {
                    name: class_name.clone(),
                    route: class_route.clone(),
                });
            }

            for (method_name, method_attrs, method_body) in self.methods_with_attributes(body) {
                let verbs = self.extract_verbs(&method_attrs);
                if verbs.is_empty() {
                    continue;
                }
                let method_route = self.extract_route(&method_attrs);
                let endpoint = Endpoint {
                    controller: class_name.clone(),
                    method: method_name,
                    http_verbs: verbs,
                    route: join_routes(&class_route, &method_route),
                };
                scan.endpoint_bodies.insert(endpoint.key(), method_body);
                scan.endpoints.push(endpoint);
            }
        }

        scan
    }

    fn methods_with_attributes(&self, class_body: &str) -> Vec<(String, String, String)> {
        let mut methods = Vec::new();
        for caps in self.method_re.captures_iter(class_body) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let signature = caps.name("signature").map(|m| m.as_str()).unwrap_or("");
            let name = match self.method_name_re.captures(signature) {
                Some(name_caps) => name_caps[1].to_string(),
                None => continue,
            };
            let attrs = caps.name("attrs").map(|m| m.as_str()).unwrap_or("").to_string();
            let body = balanced_braces(class_body, whole.end() - 1).to_string();
            methods.push((name, attrs, body));
        }
        methods
    }

    /// Upper-cased, sorted, deduplicated verb set from attribute text
    fn extract_verbs(&self, attrs: &str) -> Vec<String> {
        let mut verbs = BTreeSet::new();
        for caps in self.verb_re.captures_iter(attrs) {
            let name = &caps[1];
            let verb = name[4..].to_uppercase();
            if !verb.is_empty() {
                verbs.insert(verb);
            }
        }
        verbs.into_iter().collect()
    }

    /// Route template from `[Route("…")]` or a verb attribute's argument
    fn extract_route(&self, attrs: &str) -> String {
        if let Some(caps) = self.route_re.captures(attrs) {
            return caps[1].to_string();
        }
        self.http_route_re
            .captures(attrs)
            .map(|caps| caps[1].to_string())
            .unwrap_or_default()
    }

    /// Replace the `[controller]` placeholder with the lower-cased
    /// controller name, conventional suffix stripped
    fn resolve_controller_token(&self, route: &str, class_name: &str) -> String {
        if route.is_empty() || !self.controller_token_re.is_match(route) {
            return route.to_string();
        }
        let name = class_name
            .strip_suffix("Controller")
            .filter(|s| !s.is_empty())
            .unwrap_or(class_name);
        let token = name.to_lowercase();
        self.controller_token_re
            .replace_all(route, token.as_str())
            .into_owned()
    }
}

/// Join base and method routes with a single separating slash
fn join_routes(base: &str, sub: &str) -> String {
    if base.is_empty() {
        return sub.to_string();
    }
    if sub.is_empty() {
        return base.to_string();
    }
    format!("{}/{}", base.trim_end_matches('/'), sub.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
[ApiController]
[Route("api/[controller]")]
public class OrdersController : ControllerBase
{
    [HttpGet]
    public IActionResult List()
    {
        return Ok();
    }

    [HttpPost("create")]
    public IActionResult Create(OrderDto dto)
    {
        return Ok();
    }

    private void Helper()
    {
    }
}

public class OrderService
{
    public void Place() { }
}
"#;

    fn scan(code: &str) -> FileScan {
        EndpointExtractor::new().unwrap().scan(code)
    }

    #[test]
    fn test_controller_detected_with_resolved_route() {
        let scan = scan(SAMPLE);
        assert_eq!(scan.controllers.len(), 1);
        assert_eq!(scan.controllers[0].name, "OrdersController");
        assert_eq!(scan.controllers[0].route, "api/orders");
    }

    #[test]
    fn test_all_classes_listed() {
        let scan = scan(SAMPLE);
        assert_eq!(
            scan.classes,
            vec!["OrdersController".to_string(), "OrderService".to_string()]
        );
    }

    #[test]
    fn test_endpoints_with_joined_routes() {
        let scan = scan(SAMPLE);
        assert_eq!(scan.endpoints.len(), 2);

        let list = &scan.endpoints[0];
        assert_eq!(list.method, "List");
        assert_eq!(list.http_verbs, vec!["GET".to_string()]);
        assert_eq!(list.route, "api/orders");

        let create = &scan.endpoints[1];
        assert_eq!(create.method, "Create");
        assert_eq!(create.http_verbs, vec!["POST".to_string()]);
        assert_eq!(create.route, "api/orders/create");
    }

    #[test]
    fn test_methods_without_verbs_skipped() {
        let scan = scan(SAMPLE);
        assert!(scan.endpoints.iter().all(|e| e.method != "Helper"));
    }

    #[test]
    fn test_endpoint_bodies_keyed_by_controller_and_method() {
        let scan = scan(SAMPLE);
        assert!(scan.endpoint_bodies.contains_key("OrdersController.List"));
        assert!(scan.endpoint_bodies.contains_key("OrdersController.Create"));
    }

    #[test]
    fn test_controller_by_attribute_only() {
        let code = r#"
[ApiController]
public class Health : ControllerBase
{
    [HttpGet]
    public IActionResult Check() { return Ok(); }
}
"#;
        let scan = scan(code);
        assert_eq!(scan.controllers.len(), 1);
        assert_eq!(scan.controllers[0].name, "Health");
        assert_eq!(scan.controllers[0].route, "");
    }

    #[test]
    fn test_join_routes() {
        assert_eq!(join_routes("api/orders", "create"), "api/orders/create");
        assert_eq!(join_routes("api/orders/", "/create"), "api/orders/create");
        assert_eq!(join_routes("", "create"), "create");
        assert_eq!(join_routes("api/orders", ""), "api/orders");
    }

    #[test]
    fn test_multiple_verbs_sorted() {
        let code = r#"
public class MixedController
{
    [HttpPost]
    [HttpGet]
    public IActionResult Both() { return Ok(); }
}
"#;
        let scan = scan(code);
        assert_eq!(
            scan.endpoints[0].http_verbs,
            vec!["GET".to_string(), "POST".to_string()]
        );
    }
}
