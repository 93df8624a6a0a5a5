use crate::error::Result;
use crate::labels::{dedupe_display_name, normalize_label, ClassifierRules, EntityAlias};
use crate::money::parse_amount;
use crate::schema::DailyBalanceSample;
use crate::utils::{days_in_month, validate_month};
use chrono::NaiveDate;
use log::debug;
use std::collections::HashMap;

/// One classified row of a month sheet with its daily balance samples.
#[derive(Debug, Clone)]
pub struct EntitySeries {
    pub alias: EntityAlias,
    pub samples: Vec<DailyBalanceSample>,
}

/// Converts one month tab's raw cell grid into classified balance series.
///
/// Each row's first cell is the entity label; the following cells hold one
/// cumulative balance per day of the month (cell N = day N). Rows whose
/// label an ignore rule matches, or that no rule matches, are filtered out.
/// A blank cell is a gap, not a zero balance — a zero would fabricate a
/// full-balance outflow on diffing. Non-blank malformed cells parse to
/// zero per the amount parser's contract.
pub fn ingest_month_grid(
    rows: &[Vec<String>],
    year: i32,
    month: u32,
    rules: &ClassifierRules,
) -> Result<Vec<EntitySeries>> {
    validate_month(month)?;

    let day_count = days_in_month(year, month);
    let mut counters: HashMap<String, u32> = HashMap::new();
    let mut series = Vec::new();

    for row in rows {
        let Some(raw_label) = row.first() else {
            continue;
        };
        if raw_label.trim().is_empty() {
            continue;
        }

        let normalized_key = normalize_label(raw_label);
        let Some(category) = rules.classify(&normalized_key) else {
            debug!("discarding unclassifiable sheet row '{}'", raw_label);
            continue;
        };

        let display_name = dedupe_display_name(raw_label, &mut counters);

        let mut samples = Vec::new();
        for day in 1..=day_count {
            let Some(cell) = row.get(day as usize) else {
                break;
            };
            if cell.trim().is_empty() {
                continue;
            }
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .expect("day is within the month by construction");
            samples.push(DailyBalanceSample {
                date,
                balance: parse_amount(cell),
            });
        }

        series.push(EntitySeries {
            alias: EntityAlias {
                raw_label: raw_label.clone(),
                normalized_key,
                category,
                display_name,
            },
            samples,
        });
    }

    Ok(series)
}
