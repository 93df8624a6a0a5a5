use crate::error::Result;
use crate::reconstruct::reconstruct_movements;
use crate::statement::MonthlySampleSource;
use crate::utils::last_day_of_month;
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Net movement for one calendar month of the aggregation year.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub inflow: Decimal,
    pub outflow: Decimal,
    pub closing_balance_cumulative: Decimal,
    pub movement_count: usize,
}

/// Aggregates spreadsheet-derived movements for a set of aliased labels
/// (e.g. several name variants of the same bank account) into one
/// calendar-month series for `year`.
///
/// A movement lands in the month of its own date, not of the sheet tab
/// that produced it; the two coincide in the source format today, but the
/// date keeps this correct if that ever breaks. Each month tab is diffed
/// independently, with its first sample as that month's baseline, so an
/// absent tab contributes nothing: the drift since the last sampled month
/// never collapses into one bucket on the next tab's first day.
/// The cumulative column is computed in a single forward pass after all
/// aliases are folded in, so several entities sharing a month still yield
/// one coherent series. It starts from zero: the diff signal carries net
/// movement only, so this is net-movement-cumulative for the year, not an
/// absolute balance.
pub fn totalize_year(
    alias_labels: &[String],
    year: i32,
    source: &dyn MonthlySampleSource,
) -> Result<Vec<MonthlyTotal>> {
    let mut totals: Vec<MonthlyTotal> = (1..=12)
        .map(|month| MonthlyTotal { month, ..MonthlyTotal::default() })
        .collect();

    for label in alias_labels {
        for month in 1..=12u32 {
            let Some(samples) = source.daily_balances(label, year, month) else {
                continue;
            };
            let month_start =
                NaiveDate::from_ymd_opt(year, month, 1).expect("first of month always exists");
            let month_end = last_day_of_month(year, month);

            for bucket in reconstruct_movements(&samples, month_start, month_end) {
                let slot = &mut totals[bucket.date.month0() as usize];
                slot.inflow += bucket.inflow;
                slot.outflow += bucket.outflow;
                if bucket.has_movement() {
                    slot.movement_count += 1;
                }
            }
        }
    }

    let mut carried = Decimal::ZERO;
    for slot in &mut totals {
        carried = carried + slot.inflow - slot.outflow;
        slot.closing_balance_cumulative = carried;
    }

    Ok(totals)
}
