// F# symbol extraction
//
// F# type declarations have no closing token the scanner can anchor on, so
// a type's member span runs until the next `type` declaration or the end of
// the file. Good enough for member attribution at symbol-table granularity.

use regex::Regex;

use super::{MethodSymbol, SymbolExtractor, SymbolTable, TypeSymbol};
use crate::error::Result;
use crate::source::Language;

pub struct FSharpExtractor {
    namespace_re: Regex,
    open_re: Regex,
    class_re: Regex,
    interface_re: Regex,
    member_re: Regex,
    next_type_re: Regex,
}

impl FSharpExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            namespace_re: Regex::new(r"(?im)^\s*(?:namespace|module)\s+([\w.]+)")?,
            open_re: Regex::new(r"(?im)^\s*open\s+([\w.]+)")?,
            class_re: Regex::new(r"(?im)^\s*type\s+(\w+)\s*(?:\([^)]*\))?\s*=(?:\s*class\b)?")?,
            interface_re: Regex::new(r"(?im)^\s*type\s+(\w+)\s*=\s*interface\b")?,
            member_re: Regex::new(r"(?im)^\s*member\s+(?:this\.)?(\w+)")?,
            next_type_re: Regex::new(r"(?im)^\s*type\s+\w+")?,
        })
    }

    fn member_span<'a>(&self, text: &'a str, from: usize) -> &'a str {
        let rest = &text[from..];
        match self.next_type_re.find(rest) {
            Some(next) => &rest[..next.start()],
            None => rest,
        }
    }
}

impl SymbolExtractor for FSharpExtractor {
    fn language(&self) -> Language {
        Language::FSharp
    }

    fn extract(&self, text: &str) -> Result<SymbolTable> {
        let namespace = self
            .namespace_re
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        let imports = self
            .open_re
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect();

        let mut interfaces = Vec::new();
        let mut interface_names = Vec::new();
        for caps in self.interface_re.captures_iter(text) {
            let name = caps[1].to_string();
            interface_names.push(name.clone());
            interfaces.push(TypeSymbol::new(name));
        }

        let mut classes = Vec::new();
        for caps in self.class_re.captures_iter(text) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let name = caps[1].to_string();
            if interface_names.contains(&name) {
                continue;
            }
            let span = self.member_span(text, whole.end());
            let methods = self
                .member_re
                .captures_iter(span)
                .map(|c| MethodSymbol::new(&c[1]))
                .collect();
            classes.push(TypeSymbol::with_methods(name, methods));
        }

        Ok(SymbolTable {
            namespace,
            classes,
            interfaces,
            imports,
        })
    }
}
