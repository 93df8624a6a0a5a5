//! JSON boundary: everything upstream keeps money in `Decimal`; the mirror
//! types here carry `f64` and exist only to be handed to the HTTP layer for
//! serialization.

use crate::money::money_to_f64;
use crate::schema::{DailyMovementBucket, LedgerEntry, MovementKind, NodeLevel};
use crate::totals::MonthlyTotal;
use crate::tree::{AccountCatalog, AccountNode};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize)]
pub struct EntryReport {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: MovementKind,
    pub amount: f64,
    pub description: String,
}

impl From<&LedgerEntry> for EntryReport {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            id: entry.id,
            date: entry.date,
            kind: entry.kind,
            amount: money_to_f64(entry.amount),
            description: entry.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BucketReport {
    pub date: NaiveDate,
    pub inflow: f64,
    pub outflow: f64,
    pub closing_balance: f64,
    pub entries: Vec<EntryReport>,
}

impl From<&DailyMovementBucket> for BucketReport {
    fn from(bucket: &DailyMovementBucket) -> Self {
        Self {
            date: bucket.date,
            inflow: money_to_f64(bucket.inflow),
            outflow: money_to_f64(bucket.outflow),
            closing_balance: money_to_f64(bucket.closing_balance),
            entries: bucket.entries.iter().map(EntryReport::from).collect(),
        }
    }
}

pub fn statement_report(buckets: &[DailyMovementBucket]) -> Vec<BucketReport> {
    buckets.iter().map(BucketReport::from).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthFiguresReport {
    pub forecast: f64,
    pub realized: f64,
    pub horizontal_ratio: f64,
    pub vertical_ratio: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountNodeReport {
    pub id: i64,
    pub display_name: String,
    pub level: NodeLevel,
    pub months: BTreeMap<String, MonthFiguresReport>,
    pub children: Vec<AccountNodeReport>,
}

fn node_report(catalog: &AccountCatalog, node: &AccountNode) -> AccountNodeReport {
    AccountNodeReport {
        id: node.id,
        display_name: node.display_name.clone(),
        level: node.level,
        months: node
            .months
            .iter()
            .map(|(label, f)| {
                (
                    label.clone(),
                    MonthFiguresReport {
                        forecast: money_to_f64(f.forecast),
                        realized: money_to_f64(f.realized),
                        horizontal_ratio: f.horizontal_ratio,
                        vertical_ratio: f.vertical_ratio,
                    },
                )
            })
            .collect(),
        children: catalog
            .children_of(node)
            .into_iter()
            .map(|child| node_report(catalog, child))
            .collect(),
    }
}

/// Nested group → subgroup → account forest, ready for serialization.
pub fn tree_report(catalog: &AccountCatalog) -> Vec<AccountNodeReport> {
    catalog
        .groups
        .values()
        .map(|group| node_report(catalog, group))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTotalReport {
    pub month: u32,
    pub inflow: f64,
    pub outflow: f64,
    pub closing_balance_cumulative: f64,
    pub movement_count: usize,
}

pub fn totals_report(totals: &[MonthlyTotal]) -> Vec<MonthlyTotalReport> {
    totals
        .iter()
        .map(|t| MonthlyTotalReport {
            month: t.month,
            inflow: money_to_f64(t.inflow),
            outflow: money_to_f64(t.outflow),
            closing_balance_cumulative: money_to_f64(t.closing_balance_cumulative),
            movement_count: t.movement_count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AccountRow, FigureKind, GroupRow, SubgroupRow, TransactionRecord};
    use rust_decimal_macros::dec;

    #[test]
    fn test_statement_report_converts_to_float() {
        let bucket = DailyMovementBucket {
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            inflow: dec!(200.00),
            outflow: dec!(0.00),
            closing_balance: dec!(1200.00),
            entries: vec![LedgerEntry {
                id: 1,
                date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
                kind: MovementKind::Inflow,
                amount: dec!(200.00),
                description: "Depósito".to_string(),
            }],
        };

        let report = statement_report(&[bucket]);
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json[0]["inflow"], 200.0);
        assert_eq!(json[0]["closing_balance"], 1200.0);
        assert_eq!(json[0]["entries"][0]["kind"], "inflow");
    }

    #[test]
    fn test_tree_report_nests_three_levels() {
        let groups = vec![GroupRow { id: 1, name: "Receitas".to_string() }];
        let subgroups = vec![SubgroupRow { id: 10, name: "Vendas".to_string(), group_id: 1 }];
        let accounts = vec![AccountRow { id: 100, name: "Loja".to_string(), subgroup_id: 10 }];
        let mut catalog = AccountCatalog::build(&groups, &subgroups, &accounts).unwrap();

        let txns = vec![TransactionRecord {
            group_id: 1,
            subgroup_id: 10,
            account_id: 100,
            amount: dec!(42.50),
            date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
        }];
        catalog.accumulate(&txns, FigureKind::Realized).unwrap();

        let report = tree_report(&catalog);
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].children.len(), 1);
        assert_eq!(report[0].children[0].children.len(), 1);

        let leaf = &report[0].children[0].children[0];
        assert_eq!(leaf.display_name, "Loja");
        assert_eq!(leaf.months["2024-07"].realized, 42.5);
    }
}
