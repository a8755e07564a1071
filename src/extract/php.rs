// PHP symbol extraction

use regex::Regex;

use super::text::balanced_braces;
use super::{MethodSymbol, SymbolExtractor, SymbolTable, TypeSymbol};
use crate::error::Result;
use crate::source::Language;

pub struct PhpExtractor {
    namespace_re: Regex,
    use_re: Regex,
    class_re: Regex,
    interface_re: Regex,
    method_re: Regex,
}

impl PhpExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            namespace_re: Regex::new(r"namespace\s+([\w\\]+)\s*;")?,
            use_re: Regex::new(r"use\s+([\w\\]+)(?:\s+as\s+\w+)?\s*;")?,
            class_re: Regex::new(
                r"(?:abstract\s+|final\s+)?class\s+(\w+)(?:\s+extends\s+[\w\\]+)?(?:\s+implements\s+[\w,\s\\]+)?\s*\{",
            )?,
            interface_re: Regex::new(r"interface\s+(\w+)(?:\s+extends\s+[\w,\s\\]+)?\s*\{")?,
            method_re: Regex::new(
                r"(?:public\s+|private\s+|protected\s+|static\s+|final\s+|abstract\s+)*function\s+(\w+)\s*\([^)]*\)",
            )?,
        })
    }

    fn methods_in(&self, body: &str) -> Vec<MethodSymbol> {
        self.method_re
            .captures_iter(body)
            .filter(|c| &c[1] != "__construct")
            .map(|c| MethodSymbol::new(&c[1]))
            .collect()
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
            types.push(TypeSymbol::with_methods(name, self.methods_in(body)));
        }
        types
    }
}

impl SymbolExtractor for PhpExtractor {
    fn language(&self) -> Language {
        Language::Php
    }

    fn extract(&self, text: &str) -> Result<SymbolTable> {
        let namespace = self
            .namespace_re
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        let imports = self
            .use_re
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
