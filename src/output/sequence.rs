// Endpoint sequence diagram rendering
//
// Synthesizes the participants of one endpoint's request flow — client,
// controller, its dependencies, a database when any step touches
// persistence, a broker when any step publishes or consumes, and each
// inferred consumer — and emits a linear Mermaid sequence diagram.

use crate::catalog::{EndpointFlow, ServiceCatalog};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::mermaid::safe_id;

/// A rendered sequence diagram for one endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointDiagram {
    pub controller: String,
    pub method: String,
    pub http_verbs: Vec<String>,
    pub route: String,
    pub components: Vec<String>,
    pub diagram: String,
}

/// Render sequence diagrams for every endpoint in the catalog
pub fn endpoint_diagrams(catalog: &ServiceCatalog) -> Vec<EndpointDiagram> {
    let flow_lookup: BTreeMap<String, &EndpointFlow> = catalog
        .endpoint_flows
        .iter()
        .map(|flow| (format!("{}.{}", flow.controller, flow.method), flow))
        .collect();

    catalog
        .endpoints
        .iter()
        .map(|endpoint| {
            let deps = catalog
                .controller_dependencies
                .get(&endpoint.controller)
                .cloned()
                .unwrap_or_default();
            let steps = flow_lookup
                .get(&endpoint.key())
                .map(|flow| flow.steps.as_slice())
                .unwrap_or(&[]);

            let verb = endpoint.http_verbs.join(", ");
            let label = format!("{} {}", verb, endpoint.route);
            let label = label.trim();
            let request_label = if label.is_empty() { "Request" } else { label };

            let mut components = vec![endpoint.controller.clone()];
            components.extend(deps.iter().cloned());

            EndpointDiagram {
                controller: endpoint.controller.clone(),
                method: endpoint.method.clone(),
                http_verbs: endpoint.http_verbs.clone(),
                route: endpoint.route.clone(),
                components,
                diagram: render_endpoint_sequence(
                    Some(&endpoint.controller),
                    &deps,
                    request_label,
                    steps,
                ),
            }
        })
        .collect()
}

/// Render one endpoint's sequence diagram
pub fn render_endpoint_sequence(
    controller: Option<&str>,
    dependencies: &[String],
    request_label: &str,
    steps: &[String],
) -> String {
    let messages = extract_message_names(steps);
    let consumers = extract_consumers(steps);
    let has_db_activity = steps.iter().any(|s| s.to_lowercase().contains("db"));
    let has_queue_activity =
        !messages.is_empty() || steps.iter().any(|s| s.to_lowercase().contains("queue"));
    let remaining = remaining_notes(steps);

    let mut lines = vec![
        "sequenceDiagram".to_string(),
        "  participant Client".to_string(),
    ];
    let mut added: Vec<String> = vec!["Client".to_string()];

    let mut add_participant = |lines: &mut Vec<String>, id: String, label: Option<&str>| {
        if added.contains(&id) {
            return;
        }
        added.push(id.clone());
        match label {
            Some(label) => lines.push(format!("  participant {} as {}", id, label)),
            None => lines.push(format!("  participant {}", id)),
        }
    };

    if let Some(controller) = controller {
        add_participant(&mut lines, safe_id(controller), Some(controller));
    }
    for dep in dependencies {
        add_participant(&mut lines, safe_id(dep), Some(dep));
    }
    if has_db_activity {
        add_participant(&mut lines, "Database".to_string(), None);
    }
    if has_queue_activity {
        add_participant(&mut lines, "MessageBroker".to_string(), None);
    }
    for consumer in &consumers {
        add_participant(&mut lines, safe_id(consumer), Some(consumer));
    }

    let controller = match controller {
        Some(controller) => controller,
        None => {
            lines.push("  Client->>Service: Request".to_string());
            lines.push("  Service-->>Client: Response".to_string());
            return lines.join("\n");
        }
    };

    let cid = safe_id(controller);
    let publish_label = if messages.is_empty() {
        "Publish event/message".to_string()
    } else {
        format!("Publish {}", messages.join(", "))
    };

    lines.push(format!("  Client->>{}: {}", cid, request_label));
    lines.push(format!("  activate {}", cid));

    for dep in dependencies {
        let did = safe_id(dep);
        let action = dependency_action(dep, has_db_activity, has_queue_activity, &messages);
        lines.push(format!("  {}->>{}: {}", cid, did, action));
        lines.push(format!("  activate {}", did));
        if has_db_activity && is_db_component(dep) {
            lines.push(format!("  {}->>Database: Read/Write data", did));
            lines.push(format!("  Database-->>{}: Data/ACK", did));
        }
        if has_queue_activity && is_messaging_component(dep) {
            lines.push(format!("  {}->>MessageBroker: {}", did, publish_label));
            lines.push(format!("  MessageBroker-->>{}: Ack", did));
        }
        lines.push(format!("  {}-->>{}: Result", did, cid));
        lines.push(format!("  deactivate {}", did));
    }

    if dependencies.is_empty() && has_db_activity {
        lines.push(format!("  {}->>Database: Read/Write data", cid));
        lines.push(format!("  Database-->>{}: Data/ACK", cid));
    }
    if dependencies.is_empty() && has_queue_activity {
        lines.push(format!("  {}->>MessageBroker: {}", cid, publish_label));
        lines.push(format!("  MessageBroker-->>{}: Ack", cid));
    }

    for consumer in &consumers {
        let conid = safe_id(consumer);
        let deliver_label = if messages.is_empty() {
            "Deliver event/message".to_string()
        } else {
            format!("Deliver {}", messages.join(", "))
        };
        lines.push(format!("  MessageBroker->>{}: {}", conid, deliver_label));
        lines.push(format!("  activate {}", conid));
        if consumer_reads_db(consumer, steps) {
            lines.push(format!("  {}->>Database: Read/Write data", conid));
            lines.push(format!("  Database-->>{}: Data/ACK", conid));
        }
        lines.push(format!("  {}-->>MessageBroker: Ack", conid));
        lines.push(format!("  deactivate {}", conid));
    }

    if !remaining.is_empty() {
        lines.push(format!("  Note over {}: {}", cid, remaining.join(" | ")));
    }
    lines.push(format!("  {}-->>Client: Response", cid));
    lines.push(format!("  deactivate {}", cid));

    lines.join("\n")
}

/// Message names from publish steps, first-seen order
fn extract_message_names(steps: &[String]) -> Vec<String> {
    let mut names = Vec::new();
    for step in steps {
        if let Some(name) = step
            .strip_prefix("Publish/Send ")
            .and_then(|rest| rest.strip_suffix(" to queue"))
        {
            if !names.contains(&name.to_string()) {
                names.push(name.to_string());
            }
        }
    }
    names
}

/// Consumer names from consumer steps, first-seen order
fn extract_consumers(steps: &[String]) -> Vec<String> {
    let mut consumers = Vec::new();
    for step in steps {
        if let Some(name) = step
            .strip_prefix("Consumer ")
            .and_then(|rest| rest.strip_suffix(" reads queue"))
        {
            if !consumers.contains(&name.to_string()) {
                consumers.push(name.to_string());
            }
        }
    }
    consumers
}

fn consumer_reads_db(consumer: &str, steps: &[String]) -> bool {
    let marker = format!("Consumer {} reads DB", consumer);
    steps.iter().any(|s| s == &marker)
}

fn is_db_component(name: &str) -> bool {
    let lowered = name.to_lowercase();
    lowered.contains("repository") || lowered.contains("db") || lowered.contains("context")
}

fn is_messaging_component(name: &str) -> bool {
    let lowered = name.to_lowercase();
    ["bus", "publisher", "producer", "queue", "messaging", "event", "mass"]
        .iter()
        .any(|marker| lowered.contains(marker))
}

fn dependency_action(
    dependency: &str,
    has_db_activity: bool,
    has_queue_activity: bool,
    messages: &[String],
) -> String {
    if is_db_component(dependency) && has_db_activity {
        return "Read/Write data".to_string();
    }
    if is_messaging_component(dependency) && has_queue_activity {
        if messages.is_empty() {
            return "Publish event/message".to_string();
        }
        return format!("Publish {}", messages.join(", "));
    }
    "Execute business logic".to_string()
}

/// Steps not already drawn as arrows, for the trailing note
fn remaining_notes(steps: &[String]) -> Vec<String> {
    steps
        .iter()
        .filter(|step| {
            let lowered = step.to_lowercase();
            !lowered.starts_with("publish/send ")
                && !(lowered.starts_with("consumer ") && lowered.contains("reads queue"))
                && !(lowered.starts_with("consumer ") && lowered.contains("reads db"))
                && !lowered.contains("db")
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_minimal_endpoint_sequence() {
        let diagram =
            render_endpoint_sequence(Some("OrdersController"), &[], "GET api/orders", &[]);
        assert!(diagram.starts_with("sequenceDiagram"));
        assert!(diagram.contains("participant Client"));
        assert!(diagram.contains("Client->>OrdersController: GET api/orders"));
        assert!(diagram.contains("OrdersController-->>Client: Response"));
        assert!(!diagram.contains("Database"));
        assert!(!diagram.contains("MessageBroker"));
    }

    #[test]
    fn test_db_participant_synthesized() {
        let diagram = render_endpoint_sequence(
            Some("OrdersController"),
            &[],
            "POST api/orders",
            &steps(&["Insert/Update DB"]),
        );
        assert!(diagram.contains("participant Database"));
        assert!(diagram.contains("OrdersController->>Database: Read/Write data"));
    }

    #[test]
    fn test_broker_and_consumer_flow() {
        let flow = steps(&[
            "Insert/Update DB",
            "Publish/Send OrderCreated to queue",
            "Consumer OrderCreatedConsumer reads queue",
            "Consumer OrderCreatedConsumer reads DB",
        ]);
        let diagram =
            render_endpoint_sequence(Some("OrdersController"), &[], "POST api/orders", &flow);

        assert!(diagram.contains("participant MessageBroker"));
        assert!(diagram.contains("OrdersController->>MessageBroker: Publish OrderCreated"));
        assert!(diagram.contains("MessageBroker->>OrderCreatedConsumer: Deliver OrderCreated"));
        assert!(diagram.contains("OrderCreatedConsumer->>Database: Read/Write data"));
        assert!(diagram.contains("OrderCreatedConsumer-->>MessageBroker: Ack"));
    }

    #[test]
    fn test_db_dependency_gets_data_arrows() {
        let diagram = render_endpoint_sequence(
            Some("OrdersController"),
            &["OrderRepository".to_string()],
            "POST api/orders",
            &steps(&["Insert/Update DB"]),
        );
        assert!(diagram.contains("OrdersController->>OrderRepository: Read/Write data"));
        assert!(diagram.contains("OrderRepository->>Database: Read/Write data"));
    }

    #[test]
    fn test_plain_dependency_executes_business_logic() {
        let diagram = render_endpoint_sequence(
            Some("OrdersController"),
            &["OrderService".to_string()],
            "GET api/orders",
            &[],
        );
        assert!(diagram.contains("OrdersController->>OrderService: Execute business logic"));
    }

    #[test]
    fn test_no_controller_fallback() {
        let diagram = render_endpoint_sequence(None, &[], "Request", &[]);
        assert!(diagram.contains("Client->>Service: Request"));
        assert!(diagram.contains("Service-->>Client: Response"));
    }

    #[test]
    fn test_remaining_steps_become_note() {
        let diagram = render_endpoint_sequence(
            Some("OrdersController"),
            &[],
            "POST api/orders",
            &steps(&["Generate OrderId", "Send to queue endpoint"]),
        );
        assert!(diagram.contains("Note over OrdersController: Generate OrderId | Send to queue endpoint"));
    }

    #[test]
    fn test_message_name_extraction() {
        let names = extract_message_names(&steps(&[
            "Publish/Send OrderCreated to queue",
            "Publish/Send OrderCreated to queue",
            "Publish/Send InvoicePaid to queue",
        ]));
        assert_eq!(names, vec!["OrderCreated".to_string(), "InvoicePaid".to_string()]);
    }
}
