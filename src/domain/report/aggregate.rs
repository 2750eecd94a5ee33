use std::collections::{BTreeMap, BTreeSet};

use crate::domain::entities::criteria::normalize_category;
use crate::domain::entities::record::ReportRecord;
use crate::domain::entities::view_config::AggregateDef;
use crate::domain::entities::view_model::AggregateResult;

pub const UNKNOWN_GROUP: &str = "unknown";

/// Computes the summary metrics over the whole filtered set, never just the
/// visible page. Empty input yields zeros.
pub fn aggregate<R: ReportRecord>(records: &[&R], defs: &[AggregateDef]) -> AggregateResult {
    let mut result = AggregateResult::default();
    let total = records.len();

    for def in defs {
        match def {
            AggregateDef::Count { name } => {
                result.metrics.insert(name.clone(), total as f64);
            }
            AggregateDef::CountBy { name, field } => {
                result.groups.insert(name.clone(), count_by(records, field));
            }
            AggregateDef::Sum { name, field } => {
                result.metrics.insert(name.clone(), sum(records, field));
            }
            AggregateDef::Average {
                name,
                field,
                precision,
            } => {
                let average = safe_div(sum(records, field), total as f64);
                result
                    .metrics
                    .insert(name.clone(), round_to(average, *precision));
            }
            AggregateDef::Rate {
                name,
                field,
                values,
                precision,
            } => {
                let wanted = values
                    .iter()
                    .map(|value| normalize_category(value))
                    .collect::<BTreeSet<_>>();
                let hits = records
                    .iter()
                    .filter(|record| {
                        record
                            .text(field)
                            .is_some_and(|value| wanted.contains(&normalize_category(&value)))
                    })
                    .count();
                let rate = safe_div(hits as f64 * 100.0, total as f64);
                result.metrics.insert(name.clone(), round_to(rate, *precision));
            }
        }
    }

    result
}

fn count_by<R: ReportRecord>(records: &[&R], field: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        let key = record
            .text(field)
            .map(|value| normalize_category(&value))
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| UNKNOWN_GROUP.to_string());
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

fn sum<R: ReportRecord>(records: &[&R], field: &str) -> f64 {
    records
        .iter()
        .filter_map(|record| record.number(field))
        .sum()
}

pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    if denominator.abs() < f64::EPSILON {
        0.0
    } else {
        numerator / denominator
    }
}

/// Half away from zero, as displayed on the stat cards.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision.min(12) as i32);
    (value * factor).round() / factor
}
