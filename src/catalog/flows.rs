// Endpoint flow inference
//
// Turns an endpoint's method body into an ordered, human-readable step
// list by recognizing textual markers: identifier generation, persistence
// calls, publish/send calls with their message types, and send-endpoint
// lookups. Consumers declared against `IConsumer<T>` elsewhere in the
// batch are stitched onto any flow that publishes `T`, so one linear step
// sequence spans the async hop.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::endpoints::Endpoint;
use crate::error::Result;
use crate::source::{Language, SourceFile};

/// A message consumer found in the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumerInfo {
    pub consumer: String,
    /// Whether the consumer's file shows persistence-access markers
    pub reads_db: bool,
}

/// Message type name → consumers of that message
pub type ConsumerMap = BTreeMap<String, Vec<ConsumerInfo>>;

/// Inferred processing flow for one endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointFlow {
    pub controller: String,
    pub method: String,
    pub http_verbs: Vec<String>,
    pub route: String,
    /// Ordered human-readable steps
    pub steps: Vec<String>,
    /// Message type names referenced by publish/send calls
    pub messages: Vec<String>,
}

/// Recognizes flow markers in method bodies
pub struct StepInferencer {
    var_new_re: Regex,
    typed_new_re: Regex,
    guid_re: Regex,
    save_re: Regex,
    db_verb_re: Regex,
    publish_generic_re: Regex,
    send_generic_re: Regex,
    publish_var_re: Regex,
    send_endpoint_re: Regex,
    consumer_re: Regex,
}

impl StepInferencer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            var_new_re: Regex::new(r"\bvar\s+(\w+)\s*=\s*new\s+([\w.]+)\s*\(")?,
            typed_new_re: Regex::new(r"\b([\w.]+)\s+(\w+)\s*=\s*new\s+([\w.]+)\s*\(")?,
            guid_re: Regex::new(r"Guid\.NewGuid\(|new\s+Guid\(")?,
            save_re: Regex::new(r"\bSaveChanges(?:Async)?\(")?,
            db_verb_re: Regex::new(r"\b(Add|AddAsync|Insert|Update)\b")?,
            publish_generic_re: Regex::new(r"\.Publish<\s*([\w.]+)\s*>|\bPublish\(\s*new\s+([\w.]+)")?,
            send_generic_re: Regex::new(r"\.Send<\s*([\w.]+)\s*>|\bSend\(\s*new\s+([\w.]+)")?,
            publish_var_re: Regex::new(r"\bPublish\(\s*(\w+)\s*\)|\bSend\(\s*(\w+)\s*\)")?,
            send_endpoint_re: Regex::new(r"GetSendEndpoint\(")?,
            consumer_re: Regex::new(r"class\s+(\w+)\s*:\s*[^{\n]*IConsumer<\s*([\w.]+)\s*>")?,
        })
    }

    /// Infer ordered steps and referenced message types from a method body
    pub fn infer(&self, body: &str) -> (Vec<String>, Vec<String>) {
        let mut steps = Vec::new();
        let mut messages: Vec<String> = Vec::new();
        if body.is_empty() {
            return (steps, messages);
        }

        // Declared-variable types, so `Publish(order)` can resolve to the
        // constructed message type
        let mut var_types: BTreeMap<String, String> = BTreeMap::new();
        for caps in self.var_new_re.captures_iter(body) {
            var_types.insert(caps[1].to_string(), caps[2].to_string());
        }
        for caps in self.typed_new_re.captures_iter(body) {
            let declared = &caps[1];
            let constructed = &caps[3];
            let resolved = if declared.eq_ignore_ascii_case("var") {
                constructed
            } else {
                declared
            };
            var_types.insert(caps[2].to_string(), resolved.to_string());
        }

        if self.guid_re.is_match(body) {
            steps.push("Generate OrderId".to_string());
        }

        if self.save_re.is_match(body) || self.db_verb_re.is_match(body) {
            steps.push("Insert/Update DB".to_string());
        }

        for re in [&self.publish_generic_re, &self.send_generic_re] {
            for caps in re.captures_iter(body) {
                let msg = caps
                    .get(1)
                    .or_else(|| caps.get(2))
                    .map(|m| m.as_str().to_string());
                if let Some(msg) = msg {
                    steps.push(format!("Publish/Send {} to queue", msg));
                    messages.push(msg);
                }
            }
        }

        for caps in self.publish_var_re.captures_iter(body) {
            let var_name = match caps.get(1).or_else(|| caps.get(2)) {
                Some(m) => m.as_str(),
                None => continue,
            };
            if let Some(msg) = var_types.get(var_name) {
                if !messages.contains(msg) {
                    steps.push(format!("Publish/Send {} to queue", msg));
                    messages.push(msg.clone());
                }
            }
        }

        if self.send_endpoint_re.is_match(body) {
            steps.push("Send to queue endpoint".to_string());
        }

        (steps, messages)
    }

    /// Scan the whole batch for `IConsumer<T>` implementations
    pub fn build_consumer_map(&self, files: &[SourceFile]) -> ConsumerMap {
        let mut map = ConsumerMap::new();
        for file in files {
            if file.language != Language::CSharp {
                continue;
            }
            let reads_db = file.content.contains("DbContext")
                || file.content.contains("DbSet")
                || file.content.contains("SaveChanges");
            for caps in self.consumer_re.captures_iter(&file.content) {
                map.entry(caps[2].to_string()).or_default().push(ConsumerInfo {
                    consumer: caps[1].to_string(),
                    reads_db,
                });
            }
        }
        map
    }

    /// Build flows for every endpoint, consumer hops appended
    pub fn build_endpoint_flows(
        &self,
        endpoints: &[Endpoint],
        endpoint_bodies: &BTreeMap<String, String>,
        consumer_map: &ConsumerMap,
    ) -> Vec<EndpointFlow> {
        let mut flows = Vec::new();
        for endpoint in endpoints {
            let body = endpoint_bodies
                .get(&endpoint.key())
                .map(String::as_str)
                .unwrap_or("");
            let (mut steps, messages) = self.infer(body);

            for message in &messages {
                if let Some(consumers) = consumer_map.get(message) {
                    for consumer in consumers {
                        steps.push(format!("Consumer {} reads queue", consumer.consumer));
                        if consumer.reads_db {
                            steps.push(format!("Consumer {} reads DB", consumer.consumer));
                        }
                    }
                }
            }

            flows.push(EndpointFlow {
                controller: endpoint.controller.clone(),
                method: endpoint.method.clone(),
                http_verbs: endpoint.http_verbs.clone(),
                route: endpoint.route.clone(),
                steps,
                messages,
            });
        }
        flows
    }
}
