// Intra-class call graph extraction
//
// For brace-delimited languages only. Class and method bodies come from
// the brace-depth scanner, so braces inside string literals or comments
// will skew the extraction; accepted limitation of the heuristic approach.
// Calls into other classes or external APIs are deliberately excluded.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::Result;
use crate::extract::balanced_braces;
use crate::source::SourceFile;

/// Names the call-site pattern can capture that are not method calls
const KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "using", "return", "new", "throw", "lock",
    "foreach", "await",
];

/// A caller→callee pair within one class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    pub caller: String,
    pub callee: String,
}

/// Call edges for the methods of one class
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassCallGraph {
    pub class: String,
    pub edges: Vec<CallEdge>,
}

/// Extracts intra-class method call graphs from raw source text
pub struct CallGraphExtractor {
    class_re: Regex,
    method_re: Regex,
    call_re: Regex,
}

impl CallGraphExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            class_re: Regex::new(
                r"(?:public|private|internal|protected|abstract|sealed|static|partial|final)?\s*class\s+(\w+)(?:\s*:\s*[\w,\s<>]+|\s+extends\s+[\w.]+(?:\s+implements\s+[\w,\s.]+)?|\s+implements\s+[\w,\s.]+)?\s*\{",
            )?,
            method_re: Regex::new(
                r"(?:public|private|internal|protected|static|virtual|override|abstract|async|final|function)?\s*(?:[\w<>,\s\[\]$]+\s+)?(\w+)\s*\([^)]*\)\s*\{",
            )?,
            call_re: Regex::new(r"\b(\w+)\s*\(")?,
        })
    }

    /// Build call graphs for every class in the file. Files in languages
    /// the brace scanner cannot walk yield an empty list. Classes with no
    /// intra-class calls are omitted.
    pub fn extract(&self, file: &SourceFile) -> Vec<ClassCallGraph> {
        if !file.language.is_brace_delimited() {
            return Vec::new();
        }
        self.extract_from_text(&file.content)
    }

    fn extract_from_text(&self, code: &str) -> Vec<ClassCallGraph> {
        let mut graphs = Vec::new();

        for caps in self.class_re.captures_iter(code) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let class_name = caps[1].to_string();
            let body = balanced_braces(code, whole.end() - 1);
            if body.is_empty() {
                continue;
            }

            let methods = self.methods_with_bodies(body, &class_name);
            if methods.is_empty() {
                continue;
            }

            let method_names: BTreeSet<&str> =
                methods.iter().map(|(name, _)| name.as_str()).collect();

            let mut edges = Vec::new();
            for (caller, method_body) in &methods {
                let called = self.calls_in(method_body, &method_names);
                for callee in called {
                    edges.push(CallEdge {
                        caller: caller.clone(),
                        callee: callee.to_string(),
                    });
                }
            }

            if edges.is_empty() {
                continue;
            }

            graphs.push(ClassCallGraph {
                class: class_name,
                edges,
            });
        }

        graphs
    }

    /// Candidate methods and their bodies, excluding language keywords and
    /// the constructor (same name as the class)
    fn methods_with_bodies(&self, class_body: &str, class_name: &str) -> Vec<(String, String)> {
        let mut methods = Vec::new();
        for caps in self.method_re.captures_iter(class_body) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let name = caps[1].to_string();
            if KEYWORDS.contains(&name.as_str()) || name == class_name {
                continue;
            }
            let body = balanced_braces(class_body, whole.end() - 1);
            if body.is_empty() {
                continue;
            }
            methods.push((name, body.to_string()));
        }
        methods
    }

    /// `identifier(`-shaped tokens naming another method of the same class
    fn calls_in<'a>(&self, body: &str, method_names: &BTreeSet<&'a str>) -> Vec<&'a str> {
        let mut calls = BTreeSet::new();
        for caps in self.call_re.captures_iter(body) {
            let name = &caps[1];
            if KEYWORDS.contains(&name) {
                continue;
            }
            if let Some(known) = method_names.get(name) {
                calls.insert(*known);
            }
        }
        calls.into_iter().collect()
    }
}
