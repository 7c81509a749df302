//! Report renderers for tallyfile.
//!
//! Every renderer consumes a [`ProgressReport`] assembled by
//! `tallyfile-core` and owns all presentation concerns: layout, number
//! formats and the red-yellow-green completion scale.
//!
//! - [`XlsxRenderer`] writes a spreadsheet with conditional color scales.
//! - [`TextRenderer`] prints a terminal table with colored percentages.
//! - [`JsonRenderer`] emits the report as pretty JSON.

mod error;
mod gradient;
mod json;
mod text;
mod xlsx;

use std::path::Path;

pub use error::RenderError;
pub use gradient::{COMPLETION_SCALE, ColorScale, Rgb};
pub use json::JsonRenderer;
pub use text::TextRenderer;
pub use xlsx::{DEFAULT_REPORT_FILE, XlsxRenderer};

pub use tallyfile_core::{ProgressReport, RowView};

/// Writes a report to a file.
pub trait Renderer {
    /// Render `report` to `output`, replacing any existing file.
    fn render(&self, report: &ProgressReport, output: &Path) -> Result<(), RenderError>;
}
