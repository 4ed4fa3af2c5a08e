use calamine::{Data, Range};
use thiserror::Error;

/// A loosely typed spreadsheet cell, reduced to what the pipeline cares about.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => CellValue::Empty,
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Float(f) => CellValue::Number(*f),
            Data::String(s) => CellValue::Text(s.clone()),
            // Serial date numbers, same as the cell stores them
            Data::DateTime(d) => CellValue::Number(d.as_f64()),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            other => CellValue::Text(other.to_string()),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum CellLookupError {
    #[error("sheet '{0}' not found")]
    MissingSheet(String),
    #[error("sheet '{sheet}' could not be read: {message}")]
    Unreadable { sheet: String, message: String },
    #[error("cell {cell} is outside the used range of sheet '{sheet}'")]
    OutOfBounds { sheet: String, cell: String },
    #[error("cell {cell} of sheet '{sheet}' is empty")]
    Empty { sheet: String, cell: String },
    #[error("cell {cell} of sheet '{sheet}' is not numeric: {found:?}")]
    NotNumeric {
        sheet: String,
        cell: String,
        found: String,
    },
}

/// A sheet addressed in spreadsheet coordinates anchored at A1, so (row,
/// column) offsets stay valid when leading rows or columns are blank. Wraps
/// the calamine range as read; nothing is copied out up front.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    range: Range<Data>,
}

/// One row of a [`RawSheet`]. Cells left of the used range, or past its
/// right edge, read as `None`.
#[derive(Debug, Clone, Copy)]
pub struct SheetRow<'a> {
    cells: &'a [Data],
    start_col: usize,
}

impl<'a> SheetRow<'a> {
    pub fn get(&self, col: usize) -> Option<CellValue> {
        col.checked_sub(self.start_col)
            .and_then(|idx| self.cells.get(idx))
            .map(CellValue::from)
    }
}

impl RawSheet {
    pub fn from_range(name: impl Into<String>, range: Range<Data>) -> Self {
        Self {
            name: name.into(),
            range,
        }
    }

    #[cfg(test)]
    pub fn from_rows(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = rows.iter().map(|row| row.len()).max().unwrap_or(0);
        if rows.is_empty() || width == 0 {
            return Self::from_range(name, Range::empty());
        }

        let mut range = Range::new((0, 0), (rows.len() as u32 - 1, width as u32 - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                let value = match cell {
                    CellValue::Text(s) => Data::String(s),
                    CellValue::Number(n) => Data::Float(n),
                    CellValue::Empty => continue,
                };
                range.set_value((r as u32, c as u32), value);
            }
        }
        Self::from_range(name, range)
    }

    pub fn height(&self) -> usize {
        self.range.end().map_or(0, |(row, _)| row as usize + 1)
    }

    pub fn width(&self) -> usize {
        self.range.end().map_or(0, |(_, col)| col as usize + 1)
    }

    /// Every row from row 1 of the sheet down to the last used row.
    pub fn rows(&self) -> impl Iterator<Item = SheetRow<'_>> {
        let (start_row, start_col) = self
            .range
            .start()
            .map_or((0, 0), |(row, col)| (row as usize, col as usize));

        std::iter::repeat(SheetRow { cells: &[], start_col })
            .take(start_row)
            .chain(self.range.rows().map(move |cells| SheetRow { cells, start_col }))
    }

    /// Bounds-checked positional lookup. `None` means the coordinate lies
    /// outside the sheet; an in-range blank cell is `Some(CellValue::Empty)`.
    pub fn cell(&self, row: usize, col: usize) -> Option<CellValue> {
        if row >= self.height() || col >= self.width() {
            return None;
        }
        Some(
            self.range
                .get_value((row as u32, col as u32))
                .map(CellValue::from)
                .unwrap_or(CellValue::Empty),
        )
    }
}

/// Fixed positional column names of the receivable sheet. The source header
/// row is discarded, so the column order in the sheet is the contract.
pub const RECEIVABLE_COLUMNS: [&str; 6] =
    ["序號", "客戶名稱", "金額", "營業稅", "本月應收款", "備註"];

/// A data row of the receivable sheet, named by position.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceivableRow {
    pub index: CellValue,
    pub customer_name: CellValue,
    pub amount: CellValue,
    pub tax: CellValue,
    pub net_receivable: CellValue,
    pub note: CellValue,
}

impl ReceivableRow {
    pub fn from_row(row: &SheetRow<'_>) -> Self {
        let at = |idx: usize| row.get(idx).unwrap_or(CellValue::Empty);
        Self {
            index: at(0),
            customer_name: at(1),
            amount: at(2),
            tax: at(3),
            net_receivable: at(4),
            note: at(5),
        }
    }
}
