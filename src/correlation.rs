// Cross-stack correlation signals
//
// Detects messaging-client usage on both sides of a polyglot repository
// and UI-framework files, so the report can show how the stacks talk to
// each other. Matching unions each file's declared import tokens with its
// already-resolved external-dependency strings before testing the fixed
// keyword sets.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::error::Result;
use crate::source::{Language, SourceFile};

/// Messaging-client keywords for the backend (.NET family) languages
const BACKEND_KEYWORDS: &[&str] = &[
    "masstransit",
    "rabbitmq",
    "rabbitmq.client",
    "masstransit.rabbitmq",
];

/// Messaging-client keywords for the frontend (Node) languages
const FRONTEND_KEYWORDS: &[&str] = &[
    "amqplib",
    "amqp-connection-manager",
    "rascal",
    "@golevelup/nestjs-rabbitmq",
    "@nestjs/microservices",
    "rabbitmq",
];

/// A file with the messaging keywords it matched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileMatches {
    pub file: String,
    pub matches: Vec<String>,
}

/// A file bucketed without keyword detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRef {
    pub file: String,
}

/// Cross-stack signal buckets
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorrelationSignals {
    pub backend_messaging: Vec<FileMatches>,
    pub frontend_messaging: Vec<FileMatches>,
    pub ui_files: Vec<FileRef>,
}

impl CorrelationSignals {
    /// Whether any bucket has content
    pub fn is_empty(&self) -> bool {
        self.backend_messaging.is_empty()
            && self.frontend_messaging.is_empty()
            && self.ui_files.is_empty()
    }
}

/// Scans the full file set for cross-stack messaging and UI signals
pub struct CorrelationAnalyzer {
    js_import_re: Regex,
    js_require_re: Regex,
    using_re: Regex,
}

impl CorrelationAnalyzer {
    pub fn new() -> Result<Self> {
        Ok(Self {
            js_import_re: Regex::new(r#"import\s+(?:[\w*\s{},]+)\s+from\s+['"]([^'"]+)['"]"#)?,
            js_require_re: Regex::new(r#"require\(\s*['"]([^'"]+)['"]\s*\)"#)?,
            using_re: Regex::new(r"using\s+([\w.]+)\s*;")?,
        })
    }

    /// Build the correlation buckets.
    ///
    /// `externals` is the resolved external-dependency table keyed by
    /// normalized relative path.
    pub fn analyze(
        &self,
        files: &[SourceFile],
        externals: &BTreeMap<String, BTreeSet<String>>,
    ) -> CorrelationSignals {
        let mut signals = CorrelationSignals::default();

        for file in files {
            let mut values: Vec<String> = Vec::new();
            if let Some(deps) = externals.get(&file.relative_path) {
                values.extend(deps.iter().cloned());
            }

            match file.language {
                Language::JavaScript | Language::TypeScript => {
                    values.extend(self.js_imports(&file.content));
                }
                Language::CSharp | Language::VbNet | Language::FSharp => {
                    values.extend(
                        self.using_re
                            .captures_iter(&file.content)
                            .map(|c| c[1].to_string()),
                    );
                }
                _ => {}
            }

            if matches!(
                file.language,
                Language::CSharp | Language::VbNet | Language::FSharp
            ) {
                let matches = keyword_matches(&values, BACKEND_KEYWORDS);
                if !matches.is_empty() {
                    signals.backend_messaging.push(FileMatches {
                        file: file.relative_path.clone(),
                        matches,
                    });
                }
            }

            if matches!(file.language, Language::JavaScript | Language::TypeScript) {
                let matches = keyword_matches(&values, FRONTEND_KEYWORDS);
                if !matches.is_empty() {
                    signals.frontend_messaging.push(FileMatches {
                        file: file.relative_path.clone(),
                        matches,
                    });
                }
            }

            if matches!(
                file.language,
                Language::JavaScript | Language::TypeScript | Language::Markup
            ) {
                let is_ui = values.iter().any(|v| v.to_lowercase().contains("@angular/"))
                    || file.relative_path.to_lowercase().contains("/src/app/");
                if is_ui {
                    signals.ui_files.push(FileRef {
                        file: file.relative_path.clone(),
                    });
                }
            }
        }

        signals
    }

    fn js_imports(&self, code: &str) -> Vec<String> {
        let mut imports: Vec<String> = self
            .js_import_re
            .captures_iter(code)
            .map(|c| c[1].to_string())
            .collect();
        imports.extend(self.js_require_re.captures_iter(code).map(|c| c[1].to_string()));
        imports
    }
}

/// Sorted set of keywords appearing (case-insensitive) in any value
fn keyword_matches(values: &[String], keywords: &[&str]) -> Vec<String> {
    let mut matches = BTreeSet::new();
    for value in values {
        let lowered = value.to_lowercase();
        for keyword in keywords {
            if lowered.contains(keyword) {
                matches.insert(keyword.to_string());
            }
        }
    }
    matches.into_iter().collect()
}
