//! # Ledger Reconciler
//!
//! A library for reconciling an entity's recorded ledger movements with the
//! cumulative balance snapshots kept in an external spreadsheet, and for
//! aggregating forecast/realized figures over a three-level chart of
//! accounts.
//!
//! ## Core Concepts
//!
//! - **Ledger**: individually recorded movement entries owned by an entity
//!   (cash box, bank account, investment). When any exist for a window,
//!   they are authoritative.
//! - **Spreadsheet fallback**: when the ledger is empty for the window, a
//!   per-day statement is derived by diffing cumulative balance snapshots —
//!   a day nets to a single inflow *or* outflow, because the cumulative
//!   signal carries no itemized movements.
//! - **Hierarchy**: Group → Subgroup → Account; each transaction carries
//!   denormalized references to all three levels, so parent figures equal
//!   the sum of their children by construction.
//! - **Variance**: horizontal ratio (realized vs forecast) and vertical
//!   ratio (share of the month's top-level realized total) per node.
//!
//! All components are pure and synchronous: no I/O, no shared state, same
//! inputs in, same outputs out. Collaborators (ORM, spreadsheet client)
//! live behind plain data records and the [`MonthlySampleSource`] trait.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ledger_reconciler::*;
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
//!
//! let resolved = StatementResolver::resolve(
//!     "Banco do Brasil",
//!     &ledger_entries,
//!     opening_balance,
//!     start,
//!     end,
//!     &sheet_source,
//! )?;
//!
//! let json_ready = report::statement_report(&resolved.buckets);
//! ```

pub mod error;
pub mod ingestion;
pub mod labels;
pub mod money;
pub mod reconstruct;
pub mod report;
pub mod schema;
pub mod statement;
pub mod totals;
pub mod tree;
pub mod utils;
pub mod variance;

pub use error::{ReconcileError, Result};
pub use ingestion::{ingest_month_grid, EntitySeries};
pub use labels::{
    dedupe_display_name, normalize_label, Category, ClassifierRule, ClassifierRules, EntityAlias,
};
pub use money::{money_to_f64, parse_amount};
pub use reconstruct::reconstruct_movements;
pub use schema::*;
pub use statement::{
    build_ledger_statement, build_ledger_statement_filled, build_spreadsheet_statement,
    MonthlySampleSource,
};
pub use totals::{totalize_year, MonthlyTotal};
pub use tree::{AccountCatalog, AccountNode, MonthFigures};
pub use variance::{analyze, analyze_all_months};

use chrono::NaiveDate;
use log::{debug, info};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Where a resolved statement's buckets came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementOrigin {
    /// Built from recorded ledger entries.
    Ledger,
    /// Derived from spreadsheet balance diffs (no itemized entries).
    Spreadsheet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedStatement {
    pub origin: StatementOrigin,
    pub buckets: Vec<DailyMovementBucket>,
}

pub struct StatementResolver;

impl StatementResolver {
    /// Builds the per-day statement for one entity and window.
    ///
    /// Ledger entries, when any fall inside the window, are always
    /// authoritative; the spreadsheet fallback is consulted only when the
    /// ledger statement comes back empty, and the two are never blended
    /// for the same window.
    pub fn resolve(
        label: &str,
        entries: &[LedgerEntry],
        opening_balance: Decimal,
        window_start: NaiveDate,
        window_end: NaiveDate,
        source: &dyn MonthlySampleSource,
    ) -> Result<ResolvedStatement> {
        info!(
            "resolving statement for '{}' over {} to {}",
            label, window_start, window_end
        );

        let ledger = build_ledger_statement(entries, opening_balance, window_start, window_end)?;
        if !ledger.is_empty() {
            debug!("'{}': {} ledger day(s), ledger is authoritative", label, ledger.len());
            return Ok(ResolvedStatement {
                origin: StatementOrigin::Ledger,
                buckets: ledger,
            });
        }

        debug!("'{}': empty ledger window, falling back to spreadsheet", label);
        let buckets = build_spreadsheet_statement(label, window_start, window_end, source)?;
        Ok(ResolvedStatement {
            origin: StatementOrigin::Spreadsheet,
            buckets,
        })
    }
}
