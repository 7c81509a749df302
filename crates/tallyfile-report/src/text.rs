//! Terminal table output.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crossterm::style::Stylize;

use tallyfile_core::ProgressReport;

use crate::Renderer;
use crate::error::RenderError;
use crate::gradient::ColorScale;

const NAME_WIDTH: usize = 40;

/// Renders the report as a plain-text table.
#[derive(Debug, Clone)]
pub struct TextRenderer {
    color: bool,
    bar_width: usize,
    scale: ColorScale,
}

impl TextRenderer {
    /// Create a renderer without color.
    pub fn new() -> Self {
        Self {
            color: false,
            bar_width: 10,
            scale: ColorScale::default(),
        }
    }

    /// Enable or disable truecolor output.
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    /// Set the width of the per-row progress bar (0 hides it).
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Write the table to any writer.
    pub fn write_to<W: Write>(&self, report: &ProgressReport, out: &mut W) -> io::Result<()> {
        let rule = "─".repeat(NAME_WIDTH + 32);

        writeln!(out, "{rule}")?;
        writeln!(
            out,
            " {:<NAME_WIDTH$} {:>8} {:>8}  {}",
            "File", "Complete", "Share", "Modified"
        )?;
        writeln!(out, "{rule}")?;

        for row in &report.rows {
            let percent = format!("{:>7.0}%", row.completed_fraction * 100.0);
            let bar = if self.bar_width > 0 {
                format!(" {}", make_bar(row.completed_fraction, self.bar_width))
            } else {
                String::new()
            };
            writeln!(
                out,
                " {:<NAME_WIDTH$} {} {:>7.2}%  {:<8}{}",
                truncate(&row.identifier, NAME_WIDTH),
                self.paint(percent, row.completed_fraction),
                row.size_fraction_of_total,
                if row.modified { "yes" } else { "" },
                bar,
            )?;
        }

        let totals = &report.aggregate;
        writeln!(out, "{rule}")?;
        let overall = format!("{:>7.2}%", report.overall_fraction * 100.0);
        writeln!(
            out,
            " {:<NAME_WIDTH$} {}",
            "Total",
            self.paint(overall, report.overall_fraction)
        )?;
        writeln!(
            out,
            " {} of {} lines across {} files (mean {:.1} per file)",
            format_lines(totals.completed_size),
            totals.total_size,
            totals.record_count,
            totals.mean_size(),
        )?;
        Ok(())
    }

    fn paint(&self, text: String, fraction: f64) -> String {
        if self.color {
            text.with(self.scale.color_at(fraction).into()).to_string()
        } else {
            text
        }
    }
}

impl Default for TextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for TextRenderer {
    fn render(&self, report: &ProgressReport, output: &Path) -> Result<(), RenderError> {
        let file = File::create(output).map_err(|e| RenderError::io(output, e))?;
        let mut out = BufWriter::new(file);
        self.write_to(report, &mut out)
            .and_then(|()| out.flush())
            .map_err(|e| RenderError::io(output, e))?;
        tracing::info!(path = %output.display(), "wrote text report");
        Ok(())
    }
}

/// Create a simple progress bar.
fn make_bar(ratio: f64, width: usize) -> String {
    let filled = (ratio.clamp(0.0, 1.0) * width as f64).round() as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Truncate a string to at most `max_chars` characters.
fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars - 1).collect();
        format!("{kept}…")
    }
}

/// Weighted line counts are fractional; show whole lines unless they are not.
fn format_lines(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.1}")
    }
}
