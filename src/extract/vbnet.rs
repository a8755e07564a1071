// VB.NET symbol extraction
//
// VB.NET blocks end with `End Class` / `End Interface` rather than braces,
// so type bodies are sliced between the declaration line and the matching
// End marker. Declarations are matched at line starts to keep `End Class`
// lines from being misread as new declarations.

use regex::Regex;

use super::{MethodSymbol, SymbolExtractor, SymbolTable, TypeSymbol};
use crate::error::Result;
use crate::source::Language;

pub struct VbNetExtractor {
    namespace_re: Regex,
    imports_re: Regex,
    class_re: Regex,
    interface_re: Regex,
    method_re: Regex,
    end_class_re: Regex,
    end_interface_re: Regex,
}

impl VbNetExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            namespace_re: Regex::new(r"(?i)Namespace\s+([\w.]+)")?,
            imports_re: Regex::new(r"(?im)^\s*Imports\s+([\w.*=]+)")?,
            class_re: Regex::new(
                r"(?im)^[ \t]*(?:Public\s+|Private\s+|Friend\s+|Protected\s+|MustInherit\s+|NotInheritable\s+|Partial\s+)*Class\s+(\w+)",
            )?,
            interface_re: Regex::new(
                r"(?im)^[ \t]*(?:Public\s+|Private\s+|Friend\s+)*Interface\s+(\w+)",
            )?,
            method_re: Regex::new(
                r"(?im)^[ \t]*(?:Public\s+|Private\s+|Friend\s+|Protected\s+|Shared\s+|Overridable\s+|Overrides\s+|Async\s+)*(?:Function|Sub)\s+(\w+)",
            )?,
            end_class_re: Regex::new(r"(?i)\bEnd\s+Class\b")?,
            end_interface_re: Regex::new(r"(?i)\bEnd\s+Interface\b")?,
        })
    }

    fn types_for(&self, decl_re: &Regex, end_re: &Regex, text: &str) -> Vec<TypeSymbol> {
        let mut types = Vec::new();
        for caps in decl_re.captures_iter(text) {
            let whole = match caps.get(0) {
                Some(m) => m,
                None => continue,
            };
            let name = caps[1].to_string();
            let rest = &text[whole.end()..];
            let body = match end_re.find(rest) {
                Some(end) => &rest[..end.start()],
                None => rest,
            };
            let methods = self.methods_in(body, &name);
            types.push(TypeSymbol::with_methods(name, methods));
        }
        types
    }

    fn methods_in(&self, body: &str, type_name: &str) -> Vec<MethodSymbol> {
        let mut methods = Vec::new();
        for caps in self.method_re.captures_iter(body) {
            let name = &caps[1];
            // `Sub New` is the constructor
            if name.eq_ignore_ascii_case("New") || name == type_name {
                continue;
            }
            methods.push(MethodSymbol::new(name));
        }
        methods
    }
}

impl SymbolExtractor for VbNetExtractor {
    fn language(&self) -> Language {
        Language::VbNet
    }

    fn extract(&self, text: &str) -> Result<SymbolTable> {
        let namespace = self
            .namespace_re
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        let imports = self
            .imports_re
            .captures_iter(text)
            .map(|c| c[1].to_string())
            .collect();

        Ok(SymbolTable {
            namespace,
            classes: self.types_for(&self.class_re, &self.end_class_re, text),
            interfaces: self.types_for(&self.interface_re, &self.end_interface_re, text),
            imports,
        })
    }
}
