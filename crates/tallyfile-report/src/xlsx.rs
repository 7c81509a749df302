//! Spreadsheet report output.

use std::path::Path;

use rust_xlsxwriter::{
    Color, ConditionalFormat3ColorScale, ConditionalFormatType, Format, FormatAlign, FormatBorder,
    Workbook, Worksheet, XlsxError,
};

use tallyfile_core::ProgressReport;

use crate::Renderer;
use crate::error::RenderError;
use crate::gradient::{ColorScale, Rgb};

/// Default report file name, relative to the working directory.
pub const DEFAULT_REPORT_FILE: &str = "percent_complete.xlsx";

const HEADER_ROW: u32 = 1;
const FIRST_DATA_ROW: u32 = 2;

const FILE_COL: u16 = 1;
const COMPLETE_COL: u16 = 2;
const SHARE_COL: u16 = 3;
const MODIFIED_COL: u16 = 4;
const TOTAL_COL: u16 = 6;

const HEADER_FILL: u32 = 0xBFBFBF;
const CELL_FILL: u32 = 0xF2F2F2;

impl From<Rgb> for Color {
    fn from(c: Rgb) -> Self {
        Color::RGB((u32::from(c.r) << 16) | (u32::from(c.g) << 8) | u32::from(c.b))
    }
}

/// Cell formats shared by every row.
struct Styles {
    header: Format,
    header_centered: Format,
    file: Format,
    completed: Format,
    share: Format,
    modified: Format,
    modified_set: Format,
    total: Format,
}

impl Styles {
    fn new(scale: &ColorScale) -> Self {
        let header = Format::new()
            .set_background_color(Color::RGB(HEADER_FILL))
            .set_border(FormatBorder::Thin);
        let file = Format::new()
            .set_background_color(Color::RGB(CELL_FILL))
            .set_border(FormatBorder::Thin);
        let centered = file.clone().set_align(FormatAlign::Center);

        Self {
            header_centered: header.clone().set_align(FormatAlign::Center),
            header,
            completed: centered.clone().set_num_format("0%"),
            share: centered.clone().set_num_format("0.00"),
            modified_set: centered.clone().set_background_color(Color::from(scale.max)),
            total: centered.clone().set_num_format("0.00%"),
            modified: centered,
            file,
        }
    }
}

/// Renders the report as an `.xlsx` workbook.
///
/// Layout: a header row, one row per record with completion (0 decimals),
/// share of total size and the modified flag, plus a single "Total" cell
/// with the overall completion (2 decimals). Completion cells use a
/// three-color scale over [0, 1].
#[derive(Debug, Clone, Default)]
pub struct XlsxRenderer {
    scale: ColorScale,
}

impl XlsxRenderer {
    /// Create a renderer with the default completion scale.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the workbook in memory.
    pub fn build(&self, report: &ProgressReport) -> Result<Workbook, XlsxError> {
        let mut workbook = Workbook::new();
        let styles = Styles::new(&self.scale);

        let worksheet = workbook.add_worksheet();
        worksheet.set_name("Progress")?;
        worksheet.set_column_width(FILE_COL, 30)?;
        worksheet.set_column_width(COMPLETE_COL, 15)?;
        worksheet.set_column_width(SHARE_COL, 14)?;
        worksheet.set_column_width(MODIFIED_COL, 12)?;

        worksheet.write_string_with_format(HEADER_ROW, FILE_COL, "File", &styles.header)?;
        worksheet.write_string_with_format(
            HEADER_ROW,
            COMPLETE_COL,
            "Percent Complete",
            &styles.header_centered,
        )?;
        worksheet.write_string_with_format(
            HEADER_ROW,
            SHARE_COL,
            "Share of Total",
            &styles.header_centered,
        )?;
        worksheet.write_string_with_format(
            HEADER_ROW,
            MODIFIED_COL,
            "Modified",
            &styles.header_centered,
        )?;

        let mut row_num = FIRST_DATA_ROW;
        for row in &report.rows {
            worksheet.write_string_with_format(
                row_num,
                FILE_COL,
                row.identifier.as_str(),
                &styles.file,
            )?;
            worksheet.write_number_with_format(
                row_num,
                COMPLETE_COL,
                row.completed_fraction,
                &styles.completed,
            )?;
            worksheet.write_number_with_format(
                row_num,
                SHARE_COL,
                row.size_fraction_of_total,
                &styles.share,
            )?;
            let (flag, style) = if row.modified {
                ("Yes", &styles.modified_set)
            } else {
                ("No", &styles.modified)
            };
            worksheet.write_string_with_format(row_num, MODIFIED_COL, flag, style)?;
            row_num += 1;
        }

        if row_num > FIRST_DATA_ROW {
            self.add_scale(worksheet, FIRST_DATA_ROW, row_num - 1, COMPLETE_COL)?;
        }

        worksheet.write_string_with_format(
            HEADER_ROW,
            TOTAL_COL,
            "Total",
            &styles.header_centered,
        )?;
        worksheet.write_number_with_format(
            FIRST_DATA_ROW,
            TOTAL_COL,
            report.overall_fraction,
            &styles.total,
        )?;
        self.add_scale(worksheet, FIRST_DATA_ROW, FIRST_DATA_ROW, TOTAL_COL)?;

        Ok(workbook)
    }

    fn add_scale(
        &self,
        worksheet: &mut Worksheet,
        first_row: u32,
        last_row: u32,
        col: u16,
    ) -> Result<(), XlsxError> {
        let scale = ConditionalFormat3ColorScale::new()
            .set_minimum(ConditionalFormatType::Number, 0.0)
            .set_midpoint(ConditionalFormatType::Number, ColorScale::MIDPOINT)
            .set_maximum(ConditionalFormatType::Number, 1.0)
            .set_minimum_color(Color::from(self.scale.min))
            .set_midpoint_color(Color::from(self.scale.mid))
            .set_maximum_color(Color::from(self.scale.max));
        worksheet.add_conditional_format(first_row, col, last_row, col, &scale)?;
        Ok(())
    }
}

impl Renderer for XlsxRenderer {
    fn render(&self, report: &ProgressReport, output: &Path) -> Result<(), RenderError> {
        let mut workbook = self.build(report)?;
        workbook.save(output)?;
        tracing::info!(
            path = %output.display(),
            rows = report.rows.len(),
            "wrote spreadsheet report"
        );
        Ok(())
    }
}
