use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an individually recorded ledger movement.
///
/// `Transfer` entries move value between two entities owned by the same
/// tenant; they are carried in statements for traceability but are
/// balance-neutral for the owning entity (they count toward neither inflow
/// nor outflow totals).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Inflow,
    Outflow,
    Transfer,
}

/// One append-only movement record owned by a cash box, bank account or
/// investment. Amounts are always non-negative; direction lives in `kind`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: i64,
    pub date: NaiveDate,
    pub kind: MovementKind,
    pub amount: Decimal,
    pub description: String,
}

/// A cumulative balance read from one spreadsheet cell for one calendar day.
/// Ephemeral: constructed per request, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyBalanceSample {
    pub date: NaiveDate,
    pub balance: Decimal,
}

/// One day of reconciled movement for an entity.
///
/// Invariant: `closing_balance(day) = closing_balance(prev day) + inflow -
/// outflow`. Spreadsheet-derived buckets carry no `entries` payload because
/// the cumulative-balance signal has no itemized movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMovementBucket {
    pub date: NaiveDate,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub closing_balance: Decimal,
    pub entries: Vec<LedgerEntry>,
}

impl DailyMovementBucket {
    /// Net signed movement for the day.
    pub fn net(&self) -> Decimal {
        self.inflow - self.outflow
    }

    pub fn has_movement(&self) -> bool {
        !self.inflow.is_zero() || !self.outflow.is_zero()
    }
}

/// Level of a chart-of-accounts node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeLevel {
    Group,
    Subgroup,
    Account,
}

impl fmt::Display for NodeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeLevel::Group => write!(f, "group"),
            NodeLevel::Subgroup => write!(f, "subgroup"),
            NodeLevel::Account => write!(f, "account"),
        }
    }
}

/// Chart-of-accounts rows as the persistence collaborator hands them over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupRow {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubgroupRow {
    pub id: i64,
    pub name: String,
    pub group_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub subgroup_id: i64,
}

/// Whether an aggregated figure is a planned or an actual amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FigureKind {
    Forecast,
    Realized,
}

/// One transaction row fed into the tree aggregation.
///
/// The row carries denormalized references to all three hierarchy levels so
/// that accumulation needs no tree walk per transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub group_id: i64,
    pub subgroup_id: i64,
    pub account_id: i64,
    pub amount: Decimal,
    pub date: NaiveDate,
}
