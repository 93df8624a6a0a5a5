use crate::error::Result;
use crate::reconstruct::reconstruct_movements;
use crate::schema::{DailyBalanceSample, DailyMovementBucket, LedgerEntry, MovementKind};
use crate::utils::{months_in_window, validate_window};
use chrono::{Days, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Boundary to the spreadsheet-reading collaborator.
///
/// `None` means the month tab was unreadable or the label was not found on
/// it that month; both degrade to a skipped month, never an error. The
/// caller has already matched `label` against row headers via
/// [`crate::labels::normalize_label`].
pub trait MonthlySampleSource {
    fn daily_balances(&self, label: &str, year: i32, month: u32)
        -> Option<Vec<DailyBalanceSample>>;
}

fn signed(entry: &LedgerEntry) -> Decimal {
    match entry.kind {
        MovementKind::Inflow => entry.amount,
        MovementKind::Outflow => -entry.amount,
        // Transfers are balance-neutral for the owning entity.
        MovementKind::Transfer => Decimal::ZERO,
    }
}

fn day_totals(entries: &[LedgerEntry]) -> (Decimal, Decimal) {
    let mut inflow = Decimal::ZERO;
    let mut outflow = Decimal::ZERO;
    for entry in entries {
        match entry.kind {
            MovementKind::Inflow => inflow += entry.amount,
            MovementKind::Outflow => outflow += entry.amount,
            MovementKind::Transfer => {}
        }
    }
    (inflow, outflow)
}

/// Seed balance at `window_start`: the entity's persisted opening balance
/// plus the net of every entry strictly before the window.
pub fn seed_balance(
    entries: &[LedgerEntry],
    opening_balance: Decimal,
    window_start: NaiveDate,
) -> Decimal {
    entries
        .iter()
        .filter(|e| e.date < window_start)
        .fold(opening_balance, |acc, e| acc + signed(e))
}

fn group_in_window(
    entries: &[LedgerEntry],
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> BTreeMap<NaiveDate, Vec<LedgerEntry>> {
    let mut by_day: BTreeMap<NaiveDate, Vec<LedgerEntry>> = BTreeMap::new();
    for entry in entries {
        if entry.date >= window_start && entry.date <= window_end {
            // Input order within a day is preserved.
            by_day.entry(entry.date).or_default().push(entry.clone());
        }
    }
    by_day
}

/// Builds a per-day statement from ledger entries, emitting only the days
/// that have at least one entry. Running balance carries forward day to day
/// from the pre-window seed.
pub fn build_ledger_statement(
    entries: &[LedgerEntry],
    opening_balance: Decimal,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Result<Vec<DailyMovementBucket>> {
    validate_window(window_start, window_end)?;

    let mut running = seed_balance(entries, opening_balance, window_start);
    let mut buckets = Vec::new();

    for (date, day_entries) in group_in_window(entries, window_start, window_end) {
        let (inflow, outflow) = day_totals(&day_entries);
        running = running + inflow - outflow;

        buckets.push(DailyMovementBucket {
            date,
            inflow,
            outflow,
            closing_balance: running,
            entries: day_entries,
        });
    }

    Ok(buckets)
}

/// Like [`build_ledger_statement`] but emits one bucket for every calendar
/// day in the window; days without entries carry the unchanged prior
/// closing balance with zero movement.
pub fn build_ledger_statement_filled(
    entries: &[LedgerEntry],
    opening_balance: Decimal,
    window_start: NaiveDate,
    window_end: NaiveDate,
) -> Result<Vec<DailyMovementBucket>> {
    validate_window(window_start, window_end)?;

    let mut by_day = group_in_window(entries, window_start, window_end);
    let mut running = seed_balance(entries, opening_balance, window_start);
    let mut buckets = Vec::new();

    let mut date = window_start;
    while date <= window_end {
        let day_entries = by_day.remove(&date).unwrap_or_default();
        let (inflow, outflow) = day_totals(&day_entries);
        running = running + inflow - outflow;

        buckets.push(DailyMovementBucket {
            date,
            inflow,
            outflow,
            closing_balance: running,
            entries: day_entries,
        });

        date = match date.checked_add_days(Days::new(1)) {
            Some(next) => next,
            None => break,
        };
    }

    Ok(buckets)
}

/// Builds a per-day statement from spreadsheet balance snapshots.
///
/// Callers invoke this only when the ledger statement over the same window
/// has no entries; ledger data, when present, is always authoritative. For
/// every month intersecting the window the source is asked for that month's
/// samples; unreadable months are skipped, so the result degrades to an
/// empty sequence rather than failing. Spreadsheet-origin buckets carry no
/// `entries` payload — the cumulative signal has no itemized movements.
pub fn build_spreadsheet_statement(
    label: &str,
    window_start: NaiveDate,
    window_end: NaiveDate,
    source: &dyn MonthlySampleSource,
) -> Result<Vec<DailyMovementBucket>> {
    validate_window(window_start, window_end)?;

    let mut samples = Vec::new();
    for (year, month) in months_in_window(window_start, window_end) {
        match source.daily_balances(label, year, month) {
            Some(month_samples) => samples.extend(month_samples),
            None => {
                debug!("no sheet data for '{}' in {:04}-{:02}, skipping", label, year, month);
            }
        }
    }

    Ok(reconstruct_movements(&samples, window_start, window_end))
}
