// C# symbol extraction

use regex::Regex;

use super::text::balanced_braces;
use super::{MethodSymbol, SymbolExtractor, SymbolTable, TypeSymbol};
use crate::error::Result;
use crate::source::Language;

const KEYWORDS: &[&str] = &["if", "for", "while", "switch", "try", "catch", "using"];

/// Regex-based extractor for C# sources
pub struct CSharpExtractor {
    namespace_re: Regex,
    using_re: Regex,
    class_re: Regex,
    interface_re: Regex,
    method_re: Regex,
}

impl CSharpExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            namespace_re: Regex::new(r"namespace\s+([\w.]+)")?,
            using_re: Regex::new(r"using\s+(?:static\s+)?([\w.*=]+)\s*;")?,
            class_re: Regex::new(
                r"(?:public|private|internal|protected|abstract|sealed|static|partial)?\s*class\s+(\w+)(?:\s*:\s*[\w,\s<>]+)?\s*\{",
            )?,
            interface_re: Regex::new(
                r"(?:public|private|internal|protected)?\s*interface\s+(\w+)(?:\s*:\s*[\w,\s<>]+)?\s*\{",
            )?,
            method_re: Regex::new(
                r"(?:public|private|internal|protected|static|virtual|override|abstract|async)?\s*(?:[\w<>,\s\[\]]+\s+)?(\w+)\s*\([^)]*\)\s*\{",
            )?,
        })
    }

    fn methods_in(&self, body: &str, type_name: &str) -> Vec<MethodSymbol> {
        let mut methods = Vec::new();
        for caps in self.method_re.captures_iter(body) {
            let name = &caps[1];
            if KEYWORDS.contains(&name) || name == type_name {
                continue;
            }
            methods.push(MethodSymbol::new(name));
        }
        methods
    }

    fn types_for(&self, re: &Regex, text: &str) -> Vec<TypeSymbol> {
        let mut types = Vec::new();
        for caps in re.captures_iter(text) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let name = caps[1].to_string();
            let body = balanced_braces(text, whole.end() - 1);
            let methods = self.methods_in(body, &name);
            types.push(TypeSymbol::with_methods(name, methods));
        }
        types
    }
}

impl SymbolExtractor for CSharpExtractor {
    fn language(&self) -> Language {
        Language::CSharp
    }

    fn extract(&self, text: &str) -> Result<SymbolTable> {
        let namespace = self
            .namespace_re
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        let imports = self
            .using_re
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect();

        Ok(SymbolTable {
            namespace,
            classes: self.types_for(&self.class_re, text),
            interfaces: self.types_for(&self.interface_re, text),
            imports,
        })
    }
}
