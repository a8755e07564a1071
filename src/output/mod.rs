// Export layer
//
// Pure renderers over analysis state plus one file writer. Writers create
// parent directories on demand and propagate I/O failures; an export
// either fully succeeds or fails.

pub mod dot;
pub mod json;
pub mod mermaid;
pub mod report;
pub mod sequence;

pub use dot::render_dot;
pub use json::render_json;
pub use mermaid::{path_node_id, safe_id, MermaidGenerator};
pub use report::{ReportGenerator, ReportInputs};
pub use sequence::{endpoint_diagrams, render_endpoint_sequence, EndpointDiagram};

use crate::error::Result;
use std::path::{Path, PathBuf};

/// Write rendered export content to a file, creating parent directories
/// as needed
pub fn write_export(path: &Path, contents: &str) -> Result<PathBuf> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, contents)?;
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_export_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deep/out.json");

        let written = write_export(&path, "{}").unwrap();

        assert_eq!(written, path);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
    }

    #[test]
    fn test_write_export_overwrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("out.md");

        write_export(&path, "first").unwrap();
        write_export(&path, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_write_export_propagates_failure() {
        // A path under a file (not a directory) cannot be created
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file").unwrap();

        let result = write_export(&blocker.join("out.md"), "content");
        assert!(result.is_err());
    }
}
