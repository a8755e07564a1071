use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub analysis: AnalysisConfig,
    pub output: OutputConfig,
    pub diagrams: DiagramConfig,
    pub catalog: CatalogConfig,
}

/// Project metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
}

/// Analysis settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub exclude: Vec<String>,
    pub include: Vec<String>,
    /// Combined in+out degree at which a file counts as highly coupled
    pub coupling_threshold: usize,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub directory: PathBuf,
}

/// Diagram settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagramConfig {
    pub enabled: bool,
    /// Maximum source nodes rendered in the report-embedded diagram
    pub max_sources: usize,
    /// Maximum edges rendered per source node
    pub max_targets_per_source: usize,
}

/// Service catalog settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub enabled: bool,
    pub correlation: bool,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Dot,
    Mermaid,
}

impl OutputFormat {
    /// File extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Markdown => "md",
            OutputFormat::Json => "json",
            OutputFormat::Dot => "dot",
            OutputFormat::Mermaid => "mmd",
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "Untitled Project".to_string(),
            description: None,
            version: None,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            exclude: vec![
                "bin/**".to_string(),
                "obj/**".to_string(),
                "target/**".to_string(),
                "node_modules/**".to_string(),
                "packages/**".to_string(),
                "vendor/**".to_string(),
                ".git/**".to_string(),
            ],
            include: vec![
                "**/*.java".to_string(),
                "**/*.cs".to_string(),
                "**/*.vb".to_string(),
                "**/*.fs".to_string(),
                "**/*.php".to_string(),
                "**/*.js".to_string(),
                "**/*.ts".to_string(),
                "**/*.html".to_string(),
            ],
            coupling_threshold: 5,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            directory: PathBuf::from("./depscribe-docs"),
        }
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_sources: 20,
            max_targets_per_source: 5,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            correlation: true,
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from file or return defaults
    pub fn load_or_default(path: &Path) -> Self {
        Self::load(path).unwrap_or_default()
    }

    /// Merge CLI arguments into config (CLI takes precedence)
    pub fn merge_cli(
        &mut self,
        output: Option<PathBuf>,
        exclude: Vec<String>,
        format: Option<String>,
        coupling_threshold: Option<usize>,
        no_diagrams: bool,
        no_catalog: bool,
    ) {
        if let Some(out) = output {
            self.output.directory = out;
        }

        if !exclude.is_empty() {
            self.analysis.exclude.extend(exclude);
        }

        if let Some(fmt) = format {
            self.output.format = match fmt.as_str() {
                "json" => OutputFormat::Json,
                "dot" => OutputFormat::Dot,
                "mermaid" | "mmd" => OutputFormat::Mermaid,
                _ => OutputFormat::Markdown,
            };
        }

        if let Some(t) = coupling_threshold {
            self.analysis.coupling_threshold = t;
        }

        if no_diagrams {
            self.diagrams.enabled = false;
        }

        if no_catalog {
            self.catalog.enabled = false;
            self.catalog.correlation = false;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.analysis.coupling_threshold == 0 {
            return Err(Error::config_validation(
                "coupling_threshold must be at least 1",
            ));
        }

        if self.diagrams.max_sources == 0 {
            return Err(Error::config_validation(
                "diagram max_sources must be at least 1",
            ));
        }

        if self.diagrams.max_targets_per_source == 0 {
            return Err(Error::config_validation(
                "diagram max_targets_per_source must be at least 1",
            ));
        }

        if self.analysis.include.is_empty() {
            return Err(Error::config_validation(
                "at least one include pattern required",
            ));
        }

        Ok(())
    }
}
