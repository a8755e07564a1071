// Project indexing
//
// First pass of the analysis: run the per-language extractors over every
// file and fold the results into three indices — file entries, class names
// (simple and qualified, each mapping to the set of declaring files), and
// package/namespace membership. Extraction is per-file read-only and runs
// in parallel; the fold is sequential and preserves input order so package
// membership lists stay deterministic.

use crate::extract::{ExtractorSet, SymbolTable};
use crate::source::{Language, SourceFile};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A declared type name together with its language-qualified form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedType {
    pub name: String,
    pub qualified: String,
}

/// Indexed information for one source file
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub relative_path: String,
    pub language: Language,
    pub symbols: SymbolTable,
    /// Classes and interfaces with qualified names derived from the
    /// file's namespace using the language's joining convention
    pub types: Vec<QualifiedType>,
}

/// The global index built from one batch of files.
///
/// Rebuilt from nothing on every run; nothing is carried over between
/// batches.
#[derive(Debug, Default)]
pub struct ProjectIndex {
    /// Normalized relative path → file entry
    pub files: BTreeMap<String, FileEntry>,
    /// Class or interface name (simple and qualified) → declaring files.
    /// Ambiguity stays a set; callers iterate in sorted order.
    pub classes: BTreeMap<String, BTreeSet<String>>,
    /// Package/namespace → declaring files, input order, duplicates kept
    pub packages: BTreeMap<String, Vec<String>>,
    /// Files whose extractor failed, with the error message
    pub skipped: BTreeMap<String, String>,
}

enum Extracted {
    Entry(FileEntry),
    Failed(String, String),
    NoExtractor,
}

impl ProjectIndex {
    /// Build the index for a batch of files.
    ///
    /// Files with an unrecognized language or no registered extractor are
    /// skipped silently; extractor failures are recorded and the batch
    /// continues.
    pub fn build(files: &[SourceFile], extractors: &ExtractorSet) -> Self {
        let extracted: Vec<Extracted> = files
            .par_iter()
            .map(|file| match extractors.get(file.language) {
                None => Extracted::NoExtractor,
                Some(extractor) => match extractor.extract(&file.content) {
                    Ok(symbols) => Extracted::Entry(FileEntry {
                        relative_path: file.relative_path.clone(),
                        language: file.language,
                        types: qualify_types(&symbols, file.language),
                        symbols,
                    }),
                    Err(err) => {
                        Extracted::Failed(file.relative_path.clone(), err.to_string())
                    }
                },
            })
            .collect();

        let mut index = Self::default();
        for item in extracted {
            match item {
                Extracted::Entry(entry) => index.insert(entry),
                Extracted::Failed(path, message) => {
                    index.skipped.insert(path, message);
                }
                Extracted::NoExtractor => {}
            }
        }
        index
    }

    fn insert(&mut self, entry: FileEntry) {
        let path = entry.relative_path.clone();

        for ty in &entry.types {
            self.classes
                .entry(ty.qualified.clone())
                .or_default()
                .insert(path.clone());
            self.classes
                .entry(ty.name.clone())
                .or_default()
                .insert(path.clone());
        }

        if !entry.symbols.namespace.is_empty() {
            self.packages
                .entry(entry.symbols.namespace.clone())
                .or_default()
                .push(path.clone());
        }

        self.files.insert(path, entry);
    }

    /// Number of indexed files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of distinct class-index keys (simple and qualified names)
    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    /// Files declaring the given class or interface name
    pub fn class_files(&self, name: &str) -> Option<&BTreeSet<String>> {
        self.classes.get(name)
    }
}

fn qualify_types(symbols: &SymbolTable, language: Language) -> Vec<QualifiedType> {
    symbols
        .type_names()
        .map(|name| QualifiedType {
            name: name.to_string(),
            qualified: language.qualify(&symbols.namespace, name),
        })
        .collect()
}
