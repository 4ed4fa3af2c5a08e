use serde::Serialize;

/// One customer line of the receivable sheet after cleaning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerRecord {
    pub name: String,
    pub gross_amount: f64,
    pub tax: Option<f64>,
    pub net_receivable: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRecord {
    pub name: String,
    pub total_shipped: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRow {
    pub name: String,
    pub net_receivable: Option<f64>,
    pub total_shipped: f64,
    /// Absent when nothing was shipped; never zero-filled.
    pub unit_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceivableTotals {
    pub total_receivable: f64,
    pub shipment_quantity: f64,
    pub average_price: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DataQuality {
    pub receivable_rows_read: usize,
    pub customers_kept: usize,
    pub shipment_entries: usize,
    pub shipment_customers: usize,
    pub unmatched_customers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricDisplay {
    pub shipment_quantity: String,
    pub total_receivable: String,
    pub average_price: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedRowDisplay {
    pub name: String,
    pub net_receivable: String,
    pub total_shipped: String,
    pub unit_price: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartBucket {
    pub title: String,
    pub customers: Vec<CustomerRecord>,
    /// Bar labels, parallel to `customers`.
    pub value_labels: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartBuckets {
    pub top: ChartBucket,
    pub above_threshold: ChartBucket,
    pub below_threshold: ChartBucket,
}

/// Everything the presentation layer needs from one uploaded workbook.
#[derive(Debug, Clone, Serialize)]
pub struct ReconciliationReport {
    pub totals: ReceivableTotals,
    pub metrics: MetricDisplay,
    pub rows: Vec<MergedRow>,
    pub shipments: Vec<ShipmentRecord>,
    pub table: Vec<MergedRowDisplay>,
    pub buckets: ChartBuckets,
    pub quality: DataQuality,
    pub warnings: Vec<String>,
}
