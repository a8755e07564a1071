// Java symbol extraction

use regex::Regex;

use super::text::balanced_braces;
use super::{MethodSymbol, SymbolExtractor, SymbolTable, TypeSymbol};
use crate::error::Result;
use crate::source::Language;

/// Control-flow keywords that the method pattern can mistake for names
const KEYWORDS: &[&str] = &["if", "for", "while", "switch", "try", "catch"];

/// Regex-based extractor for Java sources
pub struct JavaExtractor {
    package_re: Regex,
    import_re: Regex,
    class_re: Regex,
    interface_re: Regex,
    method_re: Regex,
}

impl JavaExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            package_re: Regex::new(r"package\s+([\w.]+)\s*;")?,
            import_re: Regex::new(r"import\s+(?:static\s+)?([\w.*]+)\s*;")?,
            class_re: Regex::new(
                r"(?:public|private|protected|abstract|final|static)?\s*class\s+(\w+)(?:\s+extends\s+\w+)?(?:\s+implements\s+[\w,\s]+)?\s*\{",
            )?,
            interface_re: Regex::new(
                r"(?:public|private|protected)?\s*interface\s+(\w+)(?:\s+extends\s+[\w,\s]+)?\s*\{",
            )?,
            method_re: Regex::new(
                r"(?:public|private|protected|static|final|abstract|synchronized)?\s*(?:[\w<>,\s\[\]]+\s+)?(\w+)\s*\([^)]*\)\s*(?:throws\s+[\w,\s]+)?\s*\{",
            )?,
        })
    }

    /// Method names declared inside a type body, skipping keywords and the
    /// constructor (same name as the type).
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

impl SymbolExtractor for JavaExtractor {
    fn language(&self) -> Language {
        Language::Java
    }

    fn extract(&self, text: &str) -> Result<SymbolTable> {
        let namespace = self
            .package_re
            .captures(text)
            .map(|c| c[1].to_string())
            .unwrap_or_default();

        let imports = self
            .import_re
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

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
package com.shop.orders;

import java.util.List;
import com.shop.billing.Invoice;
import com.shop.util.*;

public class OrderService {
    private List<Invoice> invoices;

    public OrderService() {
        this.invoices = null;
    }

    public void placeOrder(String id) {
        validate(id);
    }

    private boolean validate(String id) {
        return id != null;
    }
}

interface OrderRepository {
}
"#;

    #[test]
    fn test_extract_package() {
        let extractor = JavaExtractor::new().unwrap();
        let table = extractor.extract(SAMPLE).unwrap();
        assert_eq!(table.namespace, "com.shop.orders");
    }

    #[test]
    fn test_extract_imports_keeps_wildcards() {
        let extractor = JavaExtractor::new().unwrap();
        let table = extractor.extract(SAMPLE).unwrap();
        assert_eq!(
            table.imports,
            vec![
                "java.util.List".to_string(),
                "com.shop.billing.Invoice".to_string(),
                "com.shop.util.*".to_string(),
            ]
        );
    }

    #[test]
    fn test_extract_classes_and_interfaces() {
        let extractor = JavaExtractor::new().unwrap();
        let table = extractor.extract(SAMPLE).unwrap();
        assert_eq!(table.classes.len(), 1);
        assert_eq!(table.classes[0].name, "OrderService");
        assert_eq!(table.interfaces.len(), 1);
        assert_eq!(table.interfaces[0].name, "OrderRepository");
    }

    #[test]
    fn test_constructor_excluded_from_methods() {
        let extractor = JavaExtractor::new().unwrap();
        let table = extractor.extract(SAMPLE).unwrap();
        let names: Vec<&str> = table.classes[0]
            .methods
            .iter()
            .map(|m| m.name.as_str())
            .collect();
        assert!(names.contains(&"placeOrder"));
        assert!(names.contains(&"validate"));
        assert!(!names.contains(&"OrderService"));
        assert!(!names.contains(&"if"));
    }

    #[test]
    fn test_extract_empty_source() {
        let extractor = JavaExtractor::new().unwrap();
        let table = extractor.extract("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_no_package() {
        let extractor = JavaExtractor::new().unwrap();
        let table = extractor.extract("class Bare {}").unwrap();
        assert_eq!(table.namespace, "");
        assert_eq!(table.classes[0].name, "Bare");
    }
}
