// Import resolution
//
// Maps each declared import to the indexed files it refers to, or marks it
// external. Resolution is a strict ladder; the first rule that yields files
// wins. A package-style import (Java) fans out to the whole package, while
// namespace-style imports (C#, VB.NET, F#, PHP) only scope name lookup, so
// a namespace hit is confirmed per class by re-scanning the importing
// file's text for the class name as a bare token.

use crate::analysis::index::{FileEntry, ProjectIndex};
use crate::extract::contains_token;
use std::collections::BTreeSet;

/// Outcome of resolving one import string
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// Matched one or more indexed files
    Internal(BTreeSet<String>),
    /// Matched nothing in the index; assumed third-party or standard library
    External,
}

/// Resolves raw import strings against a built project index
pub struct ImportResolver<'a> {
    index: &'a ProjectIndex,
}

impl<'a> ImportResolver<'a> {
    pub fn new(index: &'a ProjectIndex) -> Self {
        Self { index }
    }

    /// Resolve one raw import declared by `source`.
    ///
    /// `source_text` is the importing file's raw text, needed for the
    /// namespace-style token scan.
    pub fn resolve(&self, raw_import: &str, source: &FileEntry, source_text: &str) -> Resolution {
        let trimmed = raw_import.trim();
        let import = trimmed.strip_suffix(".*").unwrap_or(trimmed);
        if import.is_empty() {
            return Resolution::External;
        }

        // 1. Exact qualified-name hit
        if let Some(files) = self.index.class_files(import) {
            return Resolution::Internal(files.clone());
        }

        // 2. Last segment as a simple name
        if let Some(segment) = last_segment(import) {
            if let Some(files) = self.index.class_files(segment) {
                return Resolution::Internal(files.clone());
            }
        }

        // 3. Import names a known package/namespace
        if let Some(members) = self.index.packages.get(import) {
            if source.language.is_package_style() {
                // Depending on the package means depending on every file in it
                return Resolution::Internal(members.iter().cloned().collect());
            }
            if source.language.is_namespace_style() {
                let hits = self.scan_namespace_members(members, source, source_text);
                if !hits.is_empty() {
                    return Resolution::Internal(hits);
                }
            }
        }

        // 4. Conservative suffix fallback. Broad substring matching is
        // rejected as too noisy.
        let suffix = format!(".{}", import);
        let mut hits = BTreeSet::new();
        for (name, files) in &self.index.classes {
            if name == import || name.ends_with(&suffix) {
                hits.extend(files.iter().cloned());
            }
        }
        if !hits.is_empty() {
            return Resolution::Internal(hits);
        }

        Resolution::External
    }

    /// Accept a namespace member only when one of its declared class names
    /// actually appears as a token in the importing file. The importer's
    /// own class names are excluded so shared namespaces do not fabricate
    /// edges.
    fn scan_namespace_members(
        &self,
        members: &[String],
        source: &FileEntry,
        source_text: &str,
    ) -> BTreeSet<String> {
        let own: BTreeSet<&str> = source.symbols.type_names().collect();
        let mut hits = BTreeSet::new();

        for path in members {
            if *path == source.relative_path {
                continue;
            }
            let entry = match self.index.files.get(path) {
                Some(entry) => entry,
                None => continue,
            };
            let referenced = entry
                .symbols
                .type_names()
                .filter(|name| !own.contains(name))
                .any(|name| contains_token(source_text, name));
            if referenced {
                hits.insert(path.clone());
            }
        }

        hits
    }
}

/// Last `.`- or `\`-separated segment, when a separator is present
fn last_segment(import: &str) -> Option<&str> {
    if !import.contains('.') && !import.contains('\\') {
        return None;
    }
    import
        .rsplit(|c| c == '.' || c == '\\')
        .next()
        .filter(|s| !s.is_empty())
}
