use bytes::Bytes;
use crate::config::WorkbookLayout;
use crate::error::AppError;
use crate::models::{DataQuality, ReconciliationReport};
use crate::services::excel::utils::cell_ref;
use crate::services::excel::SheetExtractor;
use crate::services::{presenter, receivables, reconciliation, shipments};

/// Runs the whole reconciliation for one uploaded workbook.
///
/// A missing or malformed receivable sheet (or daily shipment log) aborts
/// the run. An unreadable monthly dispatch quantity only adds a warning and
/// leaves the average price at 0.
pub fn process_workbook(
    file_data: Bytes,
    layout: &WorkbookLayout,
) -> Result<ReconciliationReport, AppError> {
    let start = std::time::Instant::now();
    tracing::info!("Processing workbook ({}KB)", file_data.len() / 1024);

    let mut extractor = SheetExtractor::from_bytes(file_data)?;
    let mut warnings = Vec::new();

    let (row, col) = layout.summary_cell;
    let summary = extractor.read_number_cell(&layout.monthly_summary_sheet, row, col);
    let shipment_quantity = match summary {
        Ok(quantity) => quantity,
        Err(e) => {
            tracing::warn!("Monthly dispatch quantity unavailable, using 0: {}", e);
            warnings.push(format!(
                "Cannot read dispatch quantity from {}!{}: {}",
                layout.monthly_summary_sheet,
                cell_ref(row, col),
                e
            ));
            0.0
        }
    };

    let receivable_rows = extractor
        .read_receivable_rows(&layout.receivable_sheet, layout.receivable_skip_rows)
        .map_err(|e| {
            tracing::error!("Receivable sheet unusable: {}", e);
            e
        })?;
    let customers = receivables::normalize_receivables(&receivable_rows);

    let daily_log = extractor.read_sheet(&layout.daily_shipment_sheet)?;
    let shipment_totals = shipments::aggregate_shipments(&daily_log, layout.shipment_name_column);

    let rows = reconciliation::merge_receivables(&customers, &shipment_totals);
    let totals = reconciliation::compute_totals(&rows, shipment_quantity);

    let quality = DataQuality {
        receivable_rows_read: receivable_rows.len(),
        customers_kept: customers.len(),
        shipment_entries: shipment_totals.entries,
        shipment_customers: shipment_totals.totals.len(),
        unmatched_customers: reconciliation::count_unmatched(&customers, &shipment_totals),
    };

    tracing::info!(
        "Reconciled {} customers in {:?}: total receivable {}, average price {:.2}",
        rows.len(),
        start.elapsed(),
        totals.total_receivable,
        totals.average_price
    );

    Ok(ReconciliationReport {
        metrics: presenter::display_metrics(&totals),
        table: presenter::display_table(&rows),
        buckets: presenter::chart_buckets(&customers, layout),
        shipments: shipment_totals.records(),
        totals,
        rows,
        quality,
        warnings,
    })
}
