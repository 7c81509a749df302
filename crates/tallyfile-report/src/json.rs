//! JSON report output.

use std::io::Write;
use std::path::Path;

use tallyfile_core::ProgressReport;

use crate::Renderer;
use crate::error::RenderError;

/// Renders the report as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl JsonRenderer {
    /// Create a new JSON renderer.
    pub fn new() -> Self {
        Self
    }

    /// Write the report to any writer, followed by a newline.
    pub fn write_to<W: Write>(&self, report: &ProgressReport, out: &mut W) -> Result<(), RenderError> {
        serde_json::to_writer_pretty(&mut *out, report)?;
        out.write_all(b"\n").map_err(serde_json::Error::io)?;
        Ok(())
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, report: &ProgressReport, output: &Path) -> Result<(), RenderError> {
        let mut bytes = serde_json::to_vec_pretty(report)?;
        bytes.push(b'\n');
        std::fs::write(output, bytes).map_err(|e| RenderError::io(output, e))?;
        tracing::info!(path = %output.display(), "wrote JSON report");
        Ok(())
    }
}
