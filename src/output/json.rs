// JSON export

use crate::analysis::AnalysisReport;
use crate::error::Result;

/// Render the analysis report as pretty-printed JSON
pub fn render_json(report: &AnalysisReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
