// Symbol extraction for the analysis core
//
// One extractor per language, each behind the same one-operation capability
// trait so a regex extractor can later be swapped for a real parser without
// touching index/resolver/graph code. Extraction is heuristic by design:
// regex plus a brace-depth scanner stand in for a grammar.

mod csharp;
mod fsharp;
mod java;
mod php;
mod text;
mod vbnet;

pub use csharp::CSharpExtractor;
pub use fsharp::FSharpExtractor;
pub use java::JavaExtractor;
pub use php::PhpExtractor;
pub use text::{balanced_braces, contains_token};
pub use vbnet::VbNetExtractor;

use crate::error::Result;
use crate::source::Language;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A method declared on a class or interface
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodSymbol {
    pub name: String,
}

impl MethodSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A class or interface declaration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeSymbol {
    pub name: String,
    pub methods: Vec<MethodSymbol>,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn with_methods(name: impl Into<String>, methods: Vec<MethodSymbol>) -> Self {
        Self {
            name: name.into(),
            methods,
        }
    }
}

/// Heuristically extracted per-file symbol table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolTable {
    /// Package or namespace declaration, empty when absent
    pub namespace: String,
    pub classes: Vec<TypeSymbol>,
    pub interfaces: Vec<TypeSymbol>,
    /// Raw import strings as written (wildcards and aliases intact)
    pub imports: Vec<String>,
}

impl SymbolTable {
    /// All declared type names, classes first, then interfaces
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.classes
            .iter()
            .chain(self.interfaces.iter())
            .map(|t| t.name.as_str())
    }

    /// Whether the table carries no declarations at all
    pub fn is_empty(&self) -> bool {
        self.namespace.is_empty()
            && self.classes.is_empty()
            && self.interfaces.is_empty()
            && self.imports.is_empty()
    }
}

/// One-operation capability interface for per-language symbol extraction
pub trait SymbolExtractor: Send + Sync {
    /// The language this extractor understands
    fn language(&self) -> Language;

    /// Extract the symbol table from raw source text
    fn extract(&self, text: &str) -> Result<SymbolTable>;
}

/// Registry mapping language tags to extractors
pub struct ExtractorSet {
    extractors: HashMap<Language, Box<dyn SymbolExtractor>>,
}

impl ExtractorSet {
    /// Empty registry
    pub fn new() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    /// Registry with all built-in extractors
    pub fn with_defaults() -> Result<Self> {
        let mut set = Self::new();
        set.register(Box::new(JavaExtractor::new()?));
        set.register(Box::new(CSharpExtractor::new()?));
        set.register(Box::new(VbNetExtractor::new()?));
        set.register(Box::new(FSharpExtractor::new()?));
        set.register(Box::new(PhpExtractor::new()?));
        Ok(set)
    }

    /// Register an extractor, replacing any previous one for its language
    pub fn register(&mut self, extractor: Box<dyn SymbolExtractor>) {
        self.extractors.insert(extractor.language(), extractor);
    }

    /// Look up the extractor for a language
    pub fn get(&self, language: Language) -> Option<&dyn SymbolExtractor> {
        self.extractors.get(&language).map(|e| e.as_ref())
    }

    /// Whether an extractor is registered for a language
    pub fn supports(&self, language: Language) -> bool {
        self.extractors.contains_key(&language)
    }

    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty()
    }
}

impl Default for ExtractorSet {
    fn default() -> Self {
        Self::new()
    }
}
