//! `.xlsx` encoding of export sheets.

use querydesk_core::error::{QueryDeskError, Result};
use querydesk_core::export::{Cell, EXPORT_FILE_NAME, Sheet, SpreadsheetWriter};
use rust_xlsxwriter::{Workbook, Worksheet, XlsxError};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes a [`Sheet`] as a single-sheet Excel workbook.
#[derive(Debug, Default, Clone, Copy)]
pub struct XlsxSpreadsheetWriter;

impl XlsxSpreadsheetWriter {
    pub fn new() -> Self {
        Self
    }

    fn fill(worksheet: &mut Worksheet, sheet: &Sheet) -> std::result::Result<(), XlsxError> {
        worksheet.set_name(&sheet.name)?;
        for (row_index, row) in sheet.rows.iter().enumerate() {
            let row_num = u32::try_from(row_index).map_err(|_| XlsxError::RowColumnLimitError)?;
            for (col_index, cell) in row.iter().enumerate() {
                let col_num =
                    u16::try_from(col_index).map_err(|_| XlsxError::RowColumnLimitError)?;
                match cell {
                    Cell::Empty => {}
                    Cell::Text(text) => {
                        worksheet.write_string(row_num, col_num, text)?;
                    }
                    Cell::Number(number) => {
                        worksheet.write_number(row_num, col_num, *number)?;
                    }
                    Cell::Bool(value) => {
                        worksheet.write_boolean(row_num, col_num, *value)?;
                    }
                }
            }
        }
        Ok(())
    }
}

impl SpreadsheetWriter for XlsxSpreadsheetWriter {
    fn write(&self, sheet: &Sheet, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = dir.join(EXPORT_FILE_NAME);

        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        Self::fill(worksheet, sheet).map_err(|e| QueryDeskError::export(e.to_string()))?;
        workbook
            .save(&path)
            .map_err(|e| QueryDeskError::export(format!("Failed to write {}: {}", path.display(), e)))?;

        tracing::info!(
            "Exported {} row(s) to {}",
            sheet.rows.len().saturating_sub(1),
            path.display()
        );
        Ok(path)
    }
}
