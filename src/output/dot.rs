// Graphviz DOT export

use crate::analysis::Analysis;

/// Render the dependency graph in DOT format.
///
/// Node ids are the path with separators and dots replaced by
/// underscores; labels show the filename plus the package when present.
pub fn render_dot(analysis: &Analysis) -> String {
    let mut lines = vec![
        "digraph Dependencies {".to_string(),
        "  rankdir=LR;".to_string(),
        "  node [shape=box, style=rounded];".to_string(),
        String::new(),
    ];

    for (path, entry) in &analysis.index.files {
        let mut label = file_name(path).to_string();
        if !entry.symbols.namespace.is_empty() {
            label = format!("{}\\n({})", label, entry.symbols.namespace);
        }
        lines.push(format!("  \"{}\" [label=\"{}\"];", dot_id(path), label));
    }

    lines.push(String::new());

    for (source, targets) in &analysis.dependencies {
        let source_id = dot_id(source);
        for target in targets {
            lines.push(format!("  \"{}\" -> \"{}\";", source_id, dot_id(target)));
        }
    }

    lines.push("}".to_string());
    lines.join("\n")
}

fn dot_id(path: &str) -> String {
    path.chars()
        .map(|c| match c {
            '/' | '\\' | '.' => '_',
            other => other,
        })
        .collect()
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
