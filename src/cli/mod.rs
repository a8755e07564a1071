//! CLI module for depscribe

mod args;

pub use args::{Args, Command};

use crate::analysis::{Analyzer, CallGraphExtractor, ClassCallGraph};
use crate::catalog::CatalogBuilder;
use crate::config::{Config, OutputFormat};
use crate::correlation::CorrelationAnalyzer;
use crate::error::Result;
use crate::extract::ExtractorSet;
use crate::output::{self, MermaidGenerator, ReportGenerator, ReportInputs};
use crate::source::{self, SourceFile};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

/// Run the CLI application
pub fn run() -> ExitCode {
    let args = Args::parse_args();

    match execute(args) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn execute(args: Args) -> Result<()> {
    match args.command {
        Command::Analyze {
            path,
            output,
            exclude,
            include,
            config,
            format,
            coupling_threshold,
            no_diagrams,
            no_catalog,
            verbose,
        } => {
            let mut cfg = if let Some(config_path) = &config {
                Config::load_or_default(config_path)
            } else {
                Config::load_or_default(Path::new("depscribe.toml"))
            };

            cfg.merge_cli(
                Some(output),
                exclude,
                Some(format),
                coupling_threshold,
                no_diagrams,
                no_catalog,
            );
            if !include.is_empty() {
                cfg.analysis.include = include;
            }
            cfg.validate()?;

            if verbose {
                println!("Analyzing: {}", path.display());
                println!("Output: {}", cfg.output.directory.display());
                println!("Format: {:?}", cfg.output.format);
                println!("Coupling threshold: {}", cfg.analysis.coupling_threshold);
                println!("Diagrams: {}", cfg.diagrams.enabled);
                println!("Catalog: {}", cfg.catalog.enabled);
                println!("Include: {:?}", cfg.analysis.include);
                println!("Exclude: {:?}", cfg.analysis.exclude);
            }

            if !path.exists() {
                return Err(crate::error::Error::PathNotFound(path));
            }

            println!("Discovering files...");
            let files = source::discover(&path, &cfg.analysis)?;
            print_language_breakdown(&files);

            let spinner = if verbose {
                let pb = ProgressBar::new_spinner();
                pb.set_style(
                    ProgressStyle::default_spinner()
                        .template("{spinner:.green} {msg}")
                        .unwrap_or_else(|_| ProgressStyle::default_spinner()),
                );
                pb.set_message("Analyzing codebase...");
                pb.enable_steady_tick(Duration::from_millis(100));
                Some(pb)
            } else {
                println!("Analyzing codebase...");
                None
            };

            let extractors = ExtractorSet::with_defaults()?;
            let analyzer = Analyzer::new(cfg.analysis.clone());
            let analysis = analyzer.analyze(&files, &extractors);

            if let Some(pb) = spinner {
                pb.finish_with_message("Analysis complete");
            }

            println!(
                "Analysis complete: {} files, {} classes, {} internal, {} external dependencies",
                analysis.index.file_count(),
                analysis.index.class_count(),
                analysis.dependency_count(),
                analysis.external_dependency_count()
            );

            if !analysis.index.skipped.is_empty() {
                println!("\nSkipped files ({}):", analysis.index.skipped.len());
                for (path, err) in analysis.index.skipped.iter().take(5) {
                    println!("  {}: {}", path, err);
                }
                if analysis.index.skipped.len() > 5 {
                    println!("  ... and {} more", analysis.index.skipped.len() - 5);
                }
            }

            let project_name = if cfg.project.name == "Untitled Project" || cfg.project.name.is_empty()
            {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("Project")
                    .to_string()
            } else {
                cfg.project.name.clone()
            };

            let out_file = cfg
                .output
                .directory
                .join(format!("dependency_map.{}", cfg.output.format.extension()));

            match cfg.output.format {
                OutputFormat::Json => {
                    let json = output::render_json(&analysis.report())?;
                    output::write_export(&out_file, &json)?;
                }
                OutputFormat::Dot => {
                    output::write_export(&out_file, &output::render_dot(&analysis))?;
                }
                OutputFormat::Mermaid => {
                    let diagram = MermaidGenerator::new().dependency_graph(&analysis);
                    output::write_export(&out_file, &diagram)?;
                }
                OutputFormat::Markdown => {
                    let catalog = if cfg.catalog.enabled {
                        Some(CatalogBuilder::new()?.build(&files, Some(&analysis)))
                    } else {
                        None
                    };

                    let correlation = if cfg.catalog.correlation {
                        Some(CorrelationAnalyzer::new()?
                            .analyze(&files, &analysis.external_dependencies))
                    } else {
                        None
                    };

                    let call_graphs = if cfg.diagrams.enabled {
                        extract_call_graphs(&files)?
                    } else {
                        Vec::new()
                    };

                    let generator = ReportGenerator::new()?;
                    let report = generator.render(
                        &ReportInputs {
                            analysis: &analysis,
                            catalog: catalog.as_ref(),
                            correlation: correlation.as_ref(),
                            call_graphs: &call_graphs,
                            project_name: &project_name,
                        },
                        &cfg.diagrams,
                    )?;
                    output::write_export(&out_file, &report)?;
                }
            }

            println!("Output written to: {}", out_file.display());
            Ok(())
        }

        Command::Version => {
            println!("depscribe {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

/// Print discovered file counts grouped by language
fn print_language_breakdown(files: &[SourceFile]) {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for file in files {
        *counts.entry(file.language.tag()).or_default() += 1;
    }

    if counts.is_empty() {
        println!("Found 0 source files");
        return;
    }

    let breakdown: Vec<String> = counts
        .iter()
        .map(|(lang, count)| format!("{} {}", count, lang))
        .collect();
    println!(
        "Found {} source files ({})",
        files.len(),
        breakdown.join(", ")
    );
}

/// Intra-class call graphs for every brace-delimited file in the batch
fn extract_call_graphs(files: &[SourceFile]) -> Result<Vec<ClassCallGraph>> {
    let extractor = CallGraphExtractor::new()?;
    let mut graphs = Vec::new();
    for file in files {
        graphs.extend(extractor.extract(file));
    }
    Ok(graphs)
}
