use std::cmp::Ordering;
use crate::models::{CustomerRecord, MergedRow, ReceivableTotals};
use crate::services::shipments::ShipmentTotals;

/// Descending order with absent values last.
pub fn compare_receivable_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Left-joins receivables with shipment totals on the trimmed customer name.
///
/// Names must match exactly; no case or width folding is applied, so a
/// spelling mismatch surfaces as a zero-shipment row. The result is sorted
/// by net receivable, descending, keeping sheet order among ties.
pub fn merge_receivables(
    customers: &[CustomerRecord],
    shipments: &ShipmentTotals,
) -> Vec<MergedRow> {
    let mut rows: Vec<MergedRow> = customers
        .iter()
        .map(|customer| {
            let name = customer.name.trim().to_string();
            let total_shipped = shipments.get(&name).unwrap_or(0.0);
            let unit_price = match customer.net_receivable {
                Some(net) if total_shipped > 0.0 => Some(net / total_shipped),
                _ => None,
            };
            MergedRow {
                name,
                net_receivable: customer.net_receivable,
                total_shipped,
                unit_price,
            }
        })
        .collect();

    // stable
    rows.sort_by(|a, b| compare_receivable_desc(a.net_receivable, b.net_receivable));

    let unmatched = count_unmatched(customers, shipments);
    if unmatched > 0 {
        tracing::info!(
            "{} of {} customers have no shipment entries",
            unmatched,
            customers.len()
        );
    }
    rows
}

pub fn count_unmatched(customers: &[CustomerRecord], shipments: &ShipmentTotals) -> usize {
    customers
        .iter()
        .filter(|c| shipments.get(c.name.trim()).is_none())
        .count()
}

/// Total receivable over all rows, and the average post-tax price against
/// the month's dispatch quantity. A non-positive quantity yields price 0.
pub fn compute_totals(rows: &[MergedRow], shipment_quantity: f64) -> ReceivableTotals {
    let total_receivable: f64 = rows.iter().filter_map(|row| row.net_receivable).sum();
    let average_price = if shipment_quantity > 0.0 {
        total_receivable / shipment_quantity
    } else {
        0.0
    };

    ReceivableTotals {
        total_receivable,
        shipment_quantity,
        average_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn customer(name: &str, net: Option<f64>) -> CustomerRecord {
        CustomerRecord {
            name: name.to_string(),
            gross_amount: net.unwrap_or(0.0),
            tax: None,
            net_receivable: net,
        }
    }

    fn shipments(entries: &[(&str, f64)]) -> ShipmentTotals {
        ShipmentTotals {
            totals: entries
                .iter()
                .map(|(name, qty)| (name.to_string(), *qty))
                .collect::<BTreeMap<_, _>>(),
            entries: entries.len(),
        }
    }

    #[test]
    fn unmatched_customer_gets_zero_shipment_and_no_price() {
        let customers = vec![customer("王五", Some(150000.0))];
        let rows = merge_receivables(&customers, &shipments(&[("張三", 8.0)]));

        assert_eq!(
            rows,
            vec![MergedRow {
                name: "王五".to_string(),
                net_receivable: Some(150000.0),
                total_shipped: 0.0,
                unit_price: None,
            }]
        );
    }

    #[test]
    fn unit_price_divides_net_by_shipped() {
        let customers = vec![customer("張三", Some(800.0)), customer("李四", Some(1000.0))];
        let rows = merge_receivables(&customers, &shipments(&[("張三", 8.0), ("李四", 10.0)]));

        assert_eq!(rows[0].name, "李四");
        assert_eq!(rows[0].unit_price, Some(100.0));
        assert_eq!(rows[1].name, "張三");
        assert_eq!(rows[1].unit_price, Some(100.0));
    }

    #[test]
    fn zero_or_negative_shipments_leave_price_absent() {
        let customers = vec![customer("張三", Some(500.0)), customer("李四", Some(400.0))];
        let rows = merge_receivables(&customers, &shipments(&[("張三", 0.0), ("李四", -3.0)]));

        assert!(rows.iter().all(|row| row.unit_price.is_none()));
        assert_eq!(rows[1].total_shipped, -3.0);
    }

    #[test]
    fn join_is_exact_after_trimming() {
        let customers = vec![customer("ＡＢＣ公司", Some(10.0)), customer("abc", Some(5.0))];
        let rows = merge_receivables(&customers, &shipments(&[("ABC公司", 1.0), ("ABC", 1.0)]));

        assert!(rows.iter().all(|row| row.total_shipped == 0.0));
        assert_eq!(count_unmatched(&customers, &shipments(&[("ABC", 1.0)])), 2);
    }

    #[test]
    fn sort_is_descending_and_stable_with_absent_last() {
        let customers = vec![
            customer("甲", Some(100.0)),
            customer("乙", None),
            customer("丙", Some(300.0)),
            customer("丁", Some(100.0)),
            customer("戊", Some(-50.0)),
        ];
        let rows = merge_receivables(&customers, &ShipmentTotals::default());

        let names: Vec<&str> = rows.iter().map(|row| row.name.as_str()).collect();
        assert_eq!(names, vec!["丙", "甲", "丁", "戊", "乙"]);
        for pair in rows.windows(2) {
            if let (Some(a), Some(b)) = (pair[0].net_receivable, pair[1].net_receivable) {
                assert!(a >= b);
            }
        }
    }

    #[test]
    fn totals_match_row_sum_and_guard_zero_quantity() {
        let customers = vec![
            customer("甲", Some(120000.0)),
            customer("乙", Some(80000.0)),
            customer("丙", None),
        ];
        let rows = merge_receivables(&customers, &ShipmentTotals::default());

        let totals = compute_totals(&rows, 400.0);
        assert_eq!(totals.total_receivable, 200000.0);
        assert_eq!(totals.average_price, 500.0);

        let totals = compute_totals(&rows, 0.0);
        assert_eq!(totals.average_price, 0.0);
        let totals = compute_totals(&rows, -10.0);
        assert_eq!(totals.average_price, 0.0);
    }

    #[test]
    fn merging_twice_gives_identical_rows() {
        let customers = vec![customer("張三", Some(800.0)), customer("王五", Some(150000.0))];
        let shipped = shipments(&[("張三", 8.0)]);
        assert_eq!(
            merge_receivables(&customers, &shipped),
            merge_receivables(&customers, &shipped)
        );
    }
}
