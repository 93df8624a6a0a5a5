use crate::money::money_to_f64;
use crate::tree::AccountCatalog;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Realized as a percentage of forecast for one node and month.
///
/// Policy carried over from the product: a positive realized figure against
/// a zero forecast reads as exactly 100% ("fully realized against a zero
/// baseline"), not infinite or undefined; both zero reads as 0%.
fn horizontal_ratio(forecast: Decimal, realized: Decimal) -> f64 {
    if !forecast.is_zero() {
        money_to_f64(realized / forecast * HUNDRED)
    } else if !realized.is_zero() {
        100.0
    } else {
        0.0
    }
}

fn vertical_ratio(realized: Decimal, month_total: Decimal) -> f64 {
    if month_total.is_zero() {
        0.0
    } else {
        money_to_f64(realized / month_total * HUNDRED)
    }
}

/// Fills in horizontal and vertical ratios for every node and month.
///
/// Two passes: first the per-month vertical denominators are computed once
/// across all top-level (group) nodes, then every node's ratios are set.
/// Division happens in decimal space; only the final percentage is a float.
pub fn analyze(catalog: &mut AccountCatalog, month_labels: &[String]) {
    let mut month_totals: BTreeMap<&str, Decimal> = BTreeMap::new();
    for month in month_labels {
        let total = catalog
            .groups
            .values()
            .filter_map(|g| g.months.get(month))
            .map(|f| f.realized)
            .sum();
        month_totals.insert(month.as_str(), total);
    }

    let nodes = catalog
        .groups
        .values_mut()
        .chain(catalog.subgroups.values_mut())
        .chain(catalog.accounts.values_mut());

    for node in nodes {
        for month in month_labels {
            let total = month_totals.get(month.as_str()).copied().unwrap_or_default();
            let figures = node.months.entry(month.clone()).or_default();
            figures.horizontal_ratio = horizontal_ratio(figures.forecast, figures.realized);
            figures.vertical_ratio = vertical_ratio(figures.realized, total);
        }
    }
}

/// Convenience wrapper that analyzes every month present in the catalog.
pub fn analyze_all_months(catalog: &mut AccountCatalog) {
    let months = catalog.month_labels();
    analyze(catalog, &months);
}
