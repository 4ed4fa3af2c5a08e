use std::collections::BTreeMap;
use crate::models::ShipmentRecord;
use crate::services::excel::types::RawSheet;
use crate::services::excel::utils::{cell_text, coerce_number};

/// Per-customer shipped quantity from the daily log, keyed by trimmed name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShipmentTotals {
    pub totals: BTreeMap<String, f64>,
    pub entries: usize,
}

impl ShipmentTotals {
    pub fn get(&self, name: &str) -> Option<f64> {
        self.totals.get(name).copied()
    }

    pub fn records(&self) -> Vec<ShipmentRecord> {
        self.totals
            .iter()
            .map(|(name, total)| ShipmentRecord {
                name: name.clone(),
                total_shipped: *total,
            })
            .collect()
    }
}

#[derive(Default)]
struct ScanState {
    current: Option<String>,
    totals: ShipmentTotals,
}

/// Walks the daily log top to bottom. A name in `name_col` opens a block
/// that every following row inherits until the next name appears; a numeric
/// value in the last column is booked against the open block. A name cell
/// holding only whitespace closes the block. Values seen while no block is
/// open are ignored.
pub fn aggregate_shipments(sheet: &RawSheet, name_col: usize) -> ShipmentTotals {
    let Some(value_col) = sheet.width().checked_sub(1) else {
        tracing::warn!("Shipment sheet {} is empty", sheet.name);
        return ShipmentTotals::default();
    };

    let state = sheet.rows().fold(ScanState::default(), |mut state, row| {
        if let Some(name) = row.get(name_col).as_ref().and_then(cell_text) {
            state.current = Some(name).filter(|name| !name.is_empty());
        }

        let value = row.get(value_col).as_ref().and_then(coerce_number);
        if let (Some(customer), Some(value)) = (state.current.as_ref(), value) {
            *state.totals.totals.entry(customer.clone()).or_insert(0.0) += value;
            state.totals.entries += 1;
        }
        state
    });

    tracing::info!(
        "Aggregated {} shipment entries into {} customers",
        state.totals.entries,
        state.totals.totals.len()
    );
    state.totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::excel::types::CellValue;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn log_row(name: CellValue, quantity: CellValue) -> Vec<CellValue> {
        vec![CellValue::Empty, name, CellValue::Empty, quantity]
    }

    #[test]
    fn sums_carry_forward_blocks() {
        let sheet = RawSheet::from_rows(
            "銷售日報輸入",
            vec![
                log_row(text("張三"), CellValue::Empty),
                log_row(CellValue::Empty, CellValue::Number(5.0)),
                log_row(CellValue::Empty, CellValue::Number(3.0)),
                log_row(text("李四"), CellValue::Empty),
                log_row(CellValue::Empty, CellValue::Number(10.0)),
            ],
        );

        let totals = aggregate_shipments(&sheet, 1);
        assert_eq!(totals.get("張三"), Some(8.0));
        assert_eq!(totals.get("李四"), Some(10.0));
        assert_eq!(totals.entries, 3);
        assert_eq!(
            totals.records(),
            vec![
                ShipmentRecord {
                    name: "張三".to_string(),
                    total_shipped: 8.0,
                },
                ShipmentRecord {
                    name: "李四".to_string(),
                    total_shipped: 10.0,
                },
            ]
        );
    }

    #[test]
    fn ignores_values_before_first_customer() {
        let sheet = RawSheet::from_rows(
            "銷售日報輸入",
            vec![
                log_row(CellValue::Empty, CellValue::Number(99.0)),
                log_row(CellValue::Empty, text("出貨量")),
                log_row(text("張三"), CellValue::Empty),
                log_row(CellValue::Empty, CellValue::Number(7.0)),
            ],
        );

        let totals = aggregate_shipments(&sheet, 1);
        assert_eq!(totals.entries, 1);
        assert_eq!(totals.get("張三"), Some(7.0));
        assert_eq!(totals.totals.len(), 1);
    }

    #[test]
    fn trims_names_and_merges_repeated_blocks() {
        let sheet = RawSheet::from_rows(
            "銷售日報輸入",
            vec![
                log_row(text("  張三"), CellValue::Number(2.0)),
                log_row(text("李四"), CellValue::Number(1.5)),
                log_row(text("張三  "), CellValue::Empty),
                log_row(CellValue::Empty, text("4")),
            ],
        );

        let totals = aggregate_shipments(&sheet, 1);
        assert_eq!(totals.get("張三"), Some(6.0));
        assert_eq!(totals.get("李四"), Some(1.5));
    }

    #[test]
    fn whitespace_name_closes_the_open_block() {
        let sheet = RawSheet::from_rows(
            "銷售日報輸入",
            vec![
                log_row(text("張三"), CellValue::Empty),
                log_row(CellValue::Empty, CellValue::Number(5.0)),
                log_row(text("   "), CellValue::Empty),
                log_row(CellValue::Empty, CellValue::Number(100.0)),
                log_row(text("李四"), CellValue::Empty),
                log_row(CellValue::Empty, CellValue::Number(10.0)),
            ],
        );

        let totals = aggregate_shipments(&sheet, 1);
        assert_eq!(totals.get("張三"), Some(5.0));
        assert_eq!(totals.get("李四"), Some(10.0));
        assert_eq!(totals.entries, 2);
        assert_eq!(totals.totals.len(), 2);
    }

    #[test]
    fn value_column_is_the_widest_column_of_the_sheet() {
        let sheet = RawSheet::from_rows(
            "銷售日報輸入",
            vec![
                vec![CellValue::Empty, text("王五"), CellValue::Number(500.0)],
                vec![
                    CellValue::Empty,
                    CellValue::Empty,
                    CellValue::Number(999.0),
                    CellValue::Empty,
                    CellValue::Number(6.0),
                ],
            ],
        );

        let totals = aggregate_shipments(&sheet, 1);
        assert_eq!(totals.get("王五"), Some(6.0));
    }

    #[test]
    fn empty_sheet_yields_no_totals() {
        let sheet = RawSheet::from_rows("銷售日報輸入", Vec::new());
        assert_eq!(aggregate_shipments(&sheet, 1), ShipmentTotals::default());
    }
}
