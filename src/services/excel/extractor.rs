use super::types::*;
use super::utils::cell_ref;
use bytes::Bytes;
use calamine::{open_workbook_from_rs, Reader, Xlsx};
use std::io::Cursor;
use crate::error::AppError;

/// Reads the sheets of one uploaded workbook into [`RawSheet`] grids.
pub struct SheetExtractor {
    workbook: Xlsx<Cursor<Bytes>>,
    sheet_names: Vec<String>,
}

impl SheetExtractor {
    pub fn from_bytes(file_data: Bytes) -> Result<Self, AppError> {
        let start = std::time::Instant::now();
        let cursor = Cursor::new(file_data);

        let workbook: Xlsx<_> = open_workbook_from_rs(cursor)
            .map_err(|e| {
                tracing::error!("Failed to open Excel file: {}", e);
                AppError::FileProcessing(format!("Failed to open Excel file: {}", e))
            })?;

        let sheet_names = workbook.sheet_names().to_vec();
        tracing::info!(
            "Workbook opened in {:?}, {} sheets: {:?}",
            start.elapsed(),
            sheet_names.len(),
            sheet_names
        );

        Ok(Self { workbook, sheet_names })
    }

    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheet_names.iter().any(|s| s == name)
    }

    /// Mode B: the whole sheet, no header, addressed purely by offsets.
    pub fn read_sheet(&mut self, name: &str) -> Result<RawSheet, AppError> {
        if !self.has_sheet(name) {
            return Err(AppError::MissingSheet {
                sheet: name.to_string(),
                available: self.sheet_names.clone(),
            });
        }

        let range = self.workbook.worksheet_range(name).map_err(|e| {
            tracing::error!("Failed to read worksheet {}: {}", name, e);
            AppError::FileProcessing(format!("Failed to read worksheet {}: {}", name, e))
        })?;

        let sheet = RawSheet::from_range(name, range);
        tracing::info!(
            "Read sheet {}: {} rows x {} columns",
            name,
            sheet.height(),
            sheet.width()
        );
        Ok(sheet)
    }

    /// Mode A: drops `skip_rows` leading rows plus the header row after them,
    /// and names the remaining cells by position.
    pub fn read_receivable_rows(
        &mut self,
        name: &str,
        skip_rows: usize,
    ) -> Result<Vec<ReceivableRow>, AppError> {
        let sheet = self.read_sheet(name)?;
        receivable_rows(&sheet, skip_rows)
    }

    /// Reads one numeric cell straight from the sheet's range. Every failure
    /// is reported as a [`CellLookupError`] so callers can decide whether it
    /// is fatal.
    pub fn read_number_cell(
        &mut self,
        sheet: &str,
        row: usize,
        col: usize,
    ) -> Result<f64, CellLookupError> {
        if !self.has_sheet(sheet) {
            return Err(CellLookupError::MissingSheet(sheet.to_string()));
        }
        let raw = self
            .read_sheet(sheet)
            .map_err(|e| CellLookupError::Unreadable {
                sheet: sheet.to_string(),
                message: e.to_string(),
            })?;
        number_at(&raw, row, col)
    }
}

pub fn receivable_rows(
    sheet: &RawSheet,
    skip_rows: usize,
) -> Result<Vec<ReceivableRow>, AppError> {
    if sheet.height() <= skip_rows {
        return Err(AppError::SheetLayout {
            sheet: sheet.name.clone(),
            message: format!(
                "expected a header row after {} skipped rows, found {} rows",
                skip_rows,
                sheet.height()
            ),
        });
    }
    if sheet.width() < RECEIVABLE_COLUMNS.len() {
        return Err(AppError::SheetLayout {
            sheet: sheet.name.clone(),
            message: format!(
                "expected {} columns ({}), found {}",
                RECEIVABLE_COLUMNS.len(),
                RECEIVABLE_COLUMNS.join(", "),
                sheet.width()
            ),
        });
    }

    if sheet.width() > RECEIVABLE_COLUMNS.len() {
        tracing::warn!(
            "Sheet {} has {} columns, expected {}; columns after {} are ignored",
            sheet.name,
            sheet.width(),
            RECEIVABLE_COLUMNS.len(),
            RECEIVABLE_COLUMNS[RECEIVABLE_COLUMNS.len() - 1]
        );
    }

    Ok(sheet
        .rows()
        .skip(skip_rows + 1)
        .map(|row| ReceivableRow::from_row(&row))
        .collect())
}

/// Bounds-checked numeric lookup at a fixed coordinate.
pub fn number_at(sheet: &RawSheet, row: usize, col: usize) -> Result<f64, CellLookupError> {
    let cell = cell_ref(row, col);
    match sheet.cell(row, col) {
        None => Err(CellLookupError::OutOfBounds {
            sheet: sheet.name.clone(),
            cell,
        }),
        Some(CellValue::Empty) => Err(CellLookupError::Empty {
            sheet: sheet.name.clone(),
            cell,
        }),
        Some(CellValue::Number(n)) if n.is_finite() => Ok(n),
        Some(CellValue::Number(n)) => Err(CellLookupError::NotNumeric {
            sheet: sheet.name.clone(),
            cell,
            found: n.to_string(),
        }),
        Some(CellValue::Text(found)) => Err(CellLookupError::NotNumeric {
            sheet: sheet.name.clone(),
            cell,
            found,
        }),
    }
}
