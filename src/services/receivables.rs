use crate::models::CustomerRecord;
use crate::services::excel::types::{CellValue, ReceivableRow};
use crate::services::excel::utils::{cell_text, coerce_number};

/// A numeric zero in the name column marks a total/placeholder line.
fn is_placeholder_name(cell: &CellValue) -> bool {
    matches!(cell, CellValue::Number(n) if *n == 0.0)
}

/// Cleans receivable rows into customer records, preserving sheet order.
///
/// Rows are silently dropped when the name is missing, blank, or the numeric
/// placeholder `0`, and when the amount column does not parse as a number.
/// Tax and net receivable that fail to parse are kept as absent values.
pub fn normalize_receivables(rows: &[ReceivableRow]) -> Vec<CustomerRecord> {
    let records: Vec<CustomerRecord> = rows
        .iter()
        .filter_map(|row| {
            if is_placeholder_name(&row.customer_name) {
                tracing::debug!("Dropping placeholder row (index {:?})", row.index);
                return None;
            }
            let name = cell_text(&row.customer_name).filter(|name| !name.is_empty())?;
            let Some(gross_amount) = coerce_number(&row.amount) else {
                tracing::debug!(
                    "Dropping row for {} without numeric amount (note {:?})",
                    name,
                    row.note
                );
                return None;
            };

            Some(CustomerRecord {
                name,
                gross_amount,
                tax: coerce_number(&row.tax),
                net_receivable: coerce_number(&row.net_receivable),
            })
        })
        .collect();

    tracing::info!(
        "Normalized receivables: {} of {} rows kept",
        records.len(),
        rows.len()
    );
    records
}
