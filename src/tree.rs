use crate::error::{ReconcileError, Result};
use crate::schema::{
    AccountRow, FigureKind, GroupRow, NodeLevel, SubgroupRow, TransactionRecord,
};
use crate::utils::month_label;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Figures aggregated at one node for one month. Ratios start at zero and
/// are filled in by the variance pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthFigures {
    pub forecast: Decimal,
    pub realized: Decimal,
    pub horizontal_ratio: f64,
    pub vertical_ratio: f64,
}

/// One node of the Group → Subgroup → Account hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountNode {
    pub id: i64,
    pub display_name: String,
    pub level: NodeLevel,
    pub parent_id: Option<i64>,
    pub months: BTreeMap<String, MonthFigures>,
}

impl AccountNode {
    fn new(id: i64, display_name: &str, level: NodeLevel, parent_id: Option<i64>) -> Self {
        Self {
            id,
            display_name: display_name.to_string(),
            level,
            parent_id,
            months: BTreeMap::new(),
        }
    }

    fn add(&mut self, month: &str, kind: FigureKind, amount: Decimal) {
        let figures = self.months.entry(month.to_string()).or_default();
        match kind {
            FigureKind::Forecast => figures.forecast += amount,
            FigureKind::Realized => figures.realized += amount,
        }
    }
}

/// The three-level chart-of-accounts hierarchy with its aggregated figures.
///
/// Every transaction amount is added to its group, subgroup and account
/// nodes independently from the same record, so for any month a parent's
/// figure equals the sum of its direct children's figures by construction —
/// no separate roll-up pass exists to get out of sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountCatalog {
    pub groups: BTreeMap<i64, AccountNode>,
    pub subgroups: BTreeMap<i64, AccountNode>,
    pub accounts: BTreeMap<i64, AccountNode>,
}

impl AccountCatalog {
    /// Links the hierarchy by foreign-key id.
    ///
    /// A subgroup or account whose parent id is missing is a
    /// chart-of-accounts integrity defect upstream and is surfaced as
    /// [`ReconcileError::OrphanNode`], never silently dropped: dropping it
    /// would let the additive invariant fail quietly.
    pub fn build(
        groups: &[GroupRow],
        subgroups: &[SubgroupRow],
        accounts: &[AccountRow],
    ) -> Result<Self> {
        let mut catalog = Self {
            groups: BTreeMap::new(),
            subgroups: BTreeMap::new(),
            accounts: BTreeMap::new(),
        };

        for row in groups {
            catalog.groups.insert(
                row.id,
                AccountNode::new(row.id, &row.name, NodeLevel::Group, None),
            );
        }

        for row in subgroups {
            if !catalog.groups.contains_key(&row.group_id) {
                return Err(ReconcileError::OrphanNode {
                    level: NodeLevel::Subgroup,
                    id: row.id,
                    name: row.name.clone(),
                    parent_id: row.group_id,
                });
            }
            catalog.subgroups.insert(
                row.id,
                AccountNode::new(row.id, &row.name, NodeLevel::Subgroup, Some(row.group_id)),
            );
        }

        for row in accounts {
            if !catalog.subgroups.contains_key(&row.subgroup_id) {
                return Err(ReconcileError::OrphanNode {
                    level: NodeLevel::Account,
                    id: row.id,
                    name: row.name.clone(),
                    parent_id: row.subgroup_id,
                });
            }
            catalog.accounts.insert(
                row.id,
                AccountNode::new(
                    row.id,
                    &row.name,
                    NodeLevel::Account,
                    Some(row.subgroup_id),
                ),
            );
        }

        Ok(catalog)
    }

    fn verify_refs(&self, txn: &TransactionRecord) -> Result<()> {
        if !self.groups.contains_key(&txn.group_id) {
            return Err(ReconcileError::UnknownNodeRef {
                level: NodeLevel::Group,
                id: txn.group_id,
                date: txn.date,
            });
        }
        if !self.subgroups.contains_key(&txn.subgroup_id) {
            return Err(ReconcileError::UnknownNodeRef {
                level: NodeLevel::Subgroup,
                id: txn.subgroup_id,
                date: txn.date,
            });
        }
        if !self.accounts.contains_key(&txn.account_id) {
            return Err(ReconcileError::UnknownNodeRef {
                level: NodeLevel::Account,
                id: txn.account_id,
                date: txn.date,
            });
        }
        Ok(())
    }

    /// Adds every transaction's amount into the `kind` month-bucket of its
    /// group, subgroup and account nodes. A transaction naming an id that
    /// is not in the catalog is the same class of integrity defect as an
    /// orphan node and fails the whole accumulation. The whole batch is
    /// verified before any figure changes, so an `Err` leaves the catalog
    /// exactly as it was: a partial add would break the additive invariant
    /// across levels.
    pub fn accumulate(
        &mut self,
        transactions: &[TransactionRecord],
        kind: FigureKind,
    ) -> Result<()> {
        for txn in transactions {
            self.verify_refs(txn)?;
        }

        for txn in transactions {
            let month = month_label(txn.date);

            self.groups
                .get_mut(&txn.group_id)
                .expect("group id verified above")
                .add(&month, kind, txn.amount);
            self.subgroups
                .get_mut(&txn.subgroup_id)
                .expect("subgroup id verified above")
                .add(&month, kind, txn.amount);
            self.accounts
                .get_mut(&txn.account_id)
                .expect("account id verified above")
                .add(&month, kind, txn.amount);
        }

        Ok(())
    }

    /// Direct children of a node, for report nesting.
    pub fn children_of(&self, node: &AccountNode) -> Vec<&AccountNode> {
        let pool = match node.level {
            NodeLevel::Group => &self.subgroups,
            NodeLevel::Subgroup => &self.accounts,
            NodeLevel::Account => return Vec::new(),
        };
        pool.values()
            .filter(|n| n.parent_id == Some(node.id))
            .collect()
    }

    /// Every month label that appears anywhere in the catalog, sorted.
    pub fn month_labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self
            .groups
            .values()
            .chain(self.subgroups.values())
            .chain(self.accounts.values())
            .flat_map(|n| n.months.keys().cloned())
            .collect();
        labels.sort();
        labels.dedup();
        labels
    }
}
