// Source file records and discovery
//
// Maps files on disk to the closed set of language tags the analyzers
// understand. Reading happens here, at the boundary; the analysis core only
// ever sees already-materialized `SourceFile` records.

use crate::config::AnalysisConfig;
use crate::error::Result;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Language tag for a source file (closed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Java,
    #[serde(rename = "csharp")]
    CSharp,
    #[serde(rename = "vbnet")]
    VbNet,
    #[serde(rename = "fsharp")]
    FSharp,
    Php,
    JavaScript,
    TypeScript,
    Markup,
    Unknown,
}

impl Language {
    /// Detect the language from a file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "java" => Language::Java,
            "cs" => Language::CSharp,
            "vb" => Language::VbNet,
            "fs" | "fsx" | "fsi" => Language::FSharp,
            "php" => Language::Php,
            "js" | "jsx" | "mjs" => Language::JavaScript,
            "ts" | "tsx" => Language::TypeScript,
            "html" | "htm" | "cshtml" | "razor" => Language::Markup,
            _ => Language::Unknown,
        }
    }

    /// Stable lowercase tag used in exports
    pub fn tag(&self) -> &'static str {
        match self {
            Language::Java => "java",
            Language::CSharp => "csharp",
            Language::VbNet => "vbnet",
            Language::FSharp => "fsharp",
            Language::Php => "php",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Markup => "markup",
            Language::Unknown => "unknown",
        }
    }

    /// Join a namespace/package and a simple name into a qualified name
    /// using the language's own convention.
    pub fn qualify(&self, namespace: &str, name: &str) -> String {
        if namespace.is_empty() {
            return name.to_string();
        }
        match self {
            Language::Php => format!("\\{}\\{}", namespace, name),
            _ => format!("{}.{}", namespace, name),
        }
    }

    /// Package-style import semantics: importing the package means
    /// depending on every file declaring it.
    pub fn is_package_style(&self) -> bool {
        matches!(self, Language::Java)
    }

    /// Namespace-style import semantics: the import only brings names into
    /// scope, so a namespace hit must be confirmed per symbol.
    pub fn is_namespace_style(&self) -> bool {
        matches!(
            self,
            Language::CSharp | Language::VbNet | Language::FSharp | Language::Php
        )
    }

    /// Languages whose class bodies the brace-depth scanner can walk.
    pub fn is_brace_delimited(&self) -> bool {
        matches!(self, Language::Java | Language::CSharp | Language::Php)
    }
}

/// A source file handed to the analyzers. Owned by the caller; the
/// analysis core never mutates it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Normalized project-relative path, forward slashes only
    pub relative_path: String,
    /// Language tag
    pub language: Language,
    /// Raw file text
    pub content: String,
}

impl SourceFile {
    pub fn new(
        path: impl Into<PathBuf>,
        relative_path: impl Into<String>,
        language: Language,
        content: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            relative_path: normalize_path(&relative_path.into()),
            language,
            content: content.into(),
        }
    }
}

/// Normalize a relative path to forward slashes
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

/// Discover source files under a root directory.
///
/// Include/exclude patterns from the config are matched against the
/// normalized relative path. Unreadable files are skipped; bytes that are
/// not valid UTF-8 are replaced rather than rejected.
pub fn discover(root: &Path, config: &AnalysisConfig) -> Result<Vec<SourceFile>> {
    let include: Vec<Pattern> = config
        .include
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<std::result::Result<_, _>>()?;
    let exclude: Vec<Pattern> = config
        .exclude
        .iter()
        .map(|p| Pattern::new(p))
        .collect::<std::result::Result<_, _>>()?;

    let mut files = Vec::new();

    for entry in WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_dir() {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative_str = normalize_path(&relative.to_string_lossy());
        let file_name = relative_str.rsplit('/').next().unwrap_or(&relative_str);

        // Top-level files have no directory prefix, so `**/`-style include
        // patterns are also tried against the bare filename
        if !include
            .iter()
            .any(|p| p.matches(&relative_str) || p.matches(file_name))
        {
            continue;
        }
        if exclude.iter().any(|p| p.matches(&relative_str)) {
            continue;
        }

        let language = path
            .extension()
            .and_then(|e| e.to_str())
            .map(Language::from_extension)
            .unwrap_or(Language::Unknown);

        let content = match std::fs::read(path) {
            Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
            Err(_) => continue,
        };

        files.push(SourceFile::new(
            path.to_path_buf(),
            relative_str,
            language,
            content,
        ));
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}
