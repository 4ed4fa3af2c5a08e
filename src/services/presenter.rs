use crate::config::WorkbookLayout;
use crate::models::{
    ChartBucket, ChartBuckets, CustomerRecord, MergedRow, MergedRowDisplay, MetricDisplay,
    ReceivableTotals,
};
use crate::services::excel::utils::format_thousands;
use crate::services::reconciliation::compare_receivable_desc;

pub fn display_row(row: &MergedRow) -> MergedRowDisplay {
    MergedRowDisplay {
        name: row.name.clone(),
        net_receivable: row
            .net_receivable
            .map(|v| format_thousands(v, 0))
            .unwrap_or_default(),
        total_shipped: format_thousands(row.total_shipped, 1),
        // blank, never "0.00"
        unit_price: row
            .unit_price
            .map(|v| format_thousands(v, 2))
            .unwrap_or_default(),
    }
}

pub fn display_table(rows: &[MergedRow]) -> Vec<MergedRowDisplay> {
    rows.iter().map(display_row).collect()
}

pub fn display_metrics(totals: &ReceivableTotals) -> MetricDisplay {
    MetricDisplay {
        shipment_quantity: format_thousands(totals.shipment_quantity, 0),
        total_receivable: format!("{} 元", format_thousands(totals.total_receivable, 0)),
        average_price: format!("{} 元/單位", format_thousands(totals.average_price, 2)),
    }
}

fn bucket(title: String, mut customers: Vec<CustomerRecord>) -> ChartBucket {
    customers.sort_by(|a, b| compare_receivable_desc(a.net_receivable, b.net_receivable));
    let value_labels = customers
        .iter()
        .map(|c| c.net_receivable.map(|v| format_thousands(v, 0)).unwrap_or_default())
        .collect();
    ChartBucket {
        title,
        customers,
        value_labels,
    }
}

/// `200000.0` reads as `20`, the unit the chart titles use.
fn in_wan(amount: f64) -> String {
    let wan = amount / 10_000.0;
    if wan == wan.floor() {
        format!("{}", wan as i64)
    } else {
        format!("{}", wan)
    }
}

/// Splits customers into the three chart subsets: the top N by net
/// receivable, and those at or above / below the threshold. Customers with
/// no net receivable are ranked last and belong to neither threshold side.
pub fn chart_buckets(customers: &[CustomerRecord], layout: &WorkbookLayout) -> ChartBuckets {
    let threshold = layout.bucket_threshold;

    let mut ranked = customers.to_vec();
    ranked.sort_by(|a, b| compare_receivable_desc(a.net_receivable, b.net_receivable));
    ranked.truncate(layout.top_customers);

    let above = customers
        .iter()
        .filter(|c| c.net_receivable.map_or(false, |v| v >= threshold))
        .cloned()
        .collect();
    let below = customers
        .iter()
        .filter(|c| c.net_receivable.map_or(false, |v| v < threshold))
        .cloned()
        .collect();

    let wan = in_wan(threshold);
    let top_title = format!("前{}大客戶 - 本月應收帳款", chinese_count(layout.top_customers));
    ChartBuckets {
        top: bucket(top_title, ranked),
        above_threshold: bucket(format!("應收帳款 >= {} 萬 - 客戶", wan), above),
        below_threshold: bucket(format!("應收帳款 < {} 萬 - 客戶", wan), below),
    }
}

fn chinese_count(n: usize) -> String {
    const DIGITS: [&str; 11] = ["零", "一", "二", "三", "四", "五", "六", "七", "八", "九", "十"];
    DIGITS
        .get(n)
        .map(|d| d.to_string())
        .unwrap_or_else(|| n.to_string())
}
