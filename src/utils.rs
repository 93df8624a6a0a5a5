use crate::error::{ReconcileError, Result};
use chrono::{Datelike, Days, NaiveDate};

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    last_day_of_month(year, month).day()
}

/// Month bucket label in the `"YYYY-MM"` form used across the aggregation.
pub fn month_label(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

pub fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(ReconcileError::InvalidMonth(month));
    }
    Ok(())
}

pub fn validate_window(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start > end {
        return Err(ReconcileError::WindowOrder { start, end });
    }
    Ok(())
}

/// Every (year, month) pair whose calendar month intersects `[start, end]`.
pub fn months_in_window(start: NaiveDate, end: NaiveDate) -> Vec<(i32, u32)> {
    let mut months = Vec::new();

    let mut year = start.year();
    let mut month = start.month();

    while (year, month) <= (end.year(), end.month()) {
        months.push((year, month));
        if month == 12 {
            year += 1;
            month = 1;
        } else {
            month += 1;
        }
    }

    months
}
