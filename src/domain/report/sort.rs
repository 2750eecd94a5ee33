use std::cmp::Ordering;

use crate::domain::entities::criteria::{SortDirection, SortSpec};
use crate::domain::entities::record::{parse_number, ReportRecord};
use crate::domain::entities::view_config::{FieldKind, ViewConfig};

/// Orders two records by the sort field, then by id ascending.
///
/// Missing values come first in ascending order. The direction only applies
/// to the sort field; the id tie-break is always ascending so pages do not
/// reshuffle between renders.
pub fn compare<R: ReportRecord>(a: &R, b: &R, sort: &SortSpec, config: &ViewConfig) -> Ordering {
    let primary = compare_field(a, b, &sort.field, config.field_kind(&sort.field));
    let primary = match sort.direction {
        SortDirection::Asc => primary,
        SortDirection::Desc => primary.reverse(),
    };
    primary.then_with(|| compare_ids(a.record_id(), b.record_id()))
}

/// Stable sort of record references. `None` keeps fetch order.
pub fn sort_records<R: ReportRecord>(records: &mut [&R], sort: Option<&SortSpec>, config: &ViewConfig) {
    if let Some(sort) = sort {
        records.sort_by(|a, b| compare(*a, *b, sort, config));
    }
}

fn compare_field<R: ReportRecord>(a: &R, b: &R, field: &str, kind: FieldKind) -> Ordering {
    match kind {
        FieldKind::Number => compare_options(a.number(field), b.number(field), f64::total_cmp),
        FieldKind::Date => compare_options(a.timestamp(field), b.timestamp(field), Ord::cmp),
        FieldKind::Text | FieldKind::Category => compare_options(
            a.text(field).map(|value| value.to_lowercase()),
            b.text(field).map(|value| value.to_lowercase()),
            Ord::cmp,
        ),
    }
}

fn compare_options<T, F>(a: Option<T>, b: Option<T>, cmp: F) -> Ordering
where
    F: Fn(&T, &T) -> Ordering,
{
    match (a, b) {
        (Some(a), Some(b)) => cmp(&a, &b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_ids(a: Option<String>, b: Option<String>) -> Ordering {
    compare_options(a, b, |a, b| match (parse_number(a), parse_number(b)) {
        (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::record::JsonRecord;
    use proptest::prelude::*;
    use serde_json::json;

    fn config() -> ViewConfig {
        ViewConfig::builder("t", "Test", "/t")
            .field("v", "Value", FieldKind::Number)
            .field("name", "Name", FieldKind::Text)
            .field("created_at", "Date", FieldKind::Date)
            .build()
    }

    fn record(value: serde_json::Value) -> JsonRecord {
        JsonRecord::from_value(value).expect("fixture should be an object")
    }

    fn ids(records: &[&JsonRecord]) -> Vec<String> {
        records
            .iter()
            .map(|record| record.record_id().unwrap_or_default())
            .collect()
    }

    #[test]
    fn equal_values_fall_back_to_id_ascending() {
        let rows = [record(json!({"id": 2, "v": 5})), record(json!({"id": 1, "v": 5}))];
        let mut refs = rows.iter().collect::<Vec<_>>();
        sort_records(&mut refs, Some(&SortSpec::asc("v")), &config());
        assert_eq!(ids(&refs), vec!["1", "2"]);
    }

    #[test]
    fn descending_keeps_id_tie_break_ascending() {
        let rows = [
            record(json!({"id": "b", "v": 1})),
            record(json!({"id": "c", "v": 9})),
            record(json!({"id": "a", "v": 1})),
        ];
        let mut refs = rows.iter().collect::<Vec<_>>();
        sort_records(&mut refs, Some(&SortSpec::desc("v")), &config());
        assert_eq!(ids(&refs), vec!["c", "a", "b"]);
    }

    #[test]
    fn numbers_compare_numerically_not_lexically() {
        let rows = [
            record(json!({"id": 1, "v": "10"})),
            record(json!({"id": 2, "v": 9})),
            record(json!({"id": 3, "v": "1,000"})),
        ];
        let mut refs = rows.iter().collect::<Vec<_>>();
        sort_records(&mut refs, Some(&SortSpec::asc("v")), &config());
        assert_eq!(ids(&refs), vec!["2", "1", "3"]);
    }

    #[test]
    fn numeric_ids_compare_numerically() {
        let rows = [record(json!({"id": 10})), record(json!({"id": 9}))];
        let mut refs = rows.iter().collect::<Vec<_>>();
        sort_records(&mut refs, Some(&SortSpec::asc("v")), &config());
        assert_eq!(ids(&refs), vec!["9", "10"]);
    }

    #[test]
    fn dates_compare_chronologically_across_formats() {
        let rows = [
            record(json!({"id": 1, "created_at": "2024-02-01T08:00:00"})),
            record(json!({"id": 2, "created_at": "2024-01-15"})),
            record(json!({"id": 3, "created_at": "2024-01-20T00:00:00Z"})),
        ];
        let mut refs = rows.iter().collect::<Vec<_>>();
        sort_records(&mut refs, Some(&SortSpec::asc("created_at")), &config());
        assert_eq!(ids(&refs), vec!["2", "3", "1"]);
    }

    #[test]
    fn text_ignores_case_and_missing_sorts_first() {
        let rows = [
            record(json!({"id": 1, "name": "beta"})),
            record(json!({"id": 2, "name": "Alpha"})),
            record(json!({"id": 3})),
        ];
        let mut refs = rows.iter().collect::<Vec<_>>();
        sort_records(&mut refs, Some(&SortSpec::asc("name")), &config());
        assert_eq!(ids(&refs), vec!["3", "2", "1"]);
    }

    #[test]
    fn no_sort_keeps_fetch_order() {
        let rows = [record(json!({"id": 3})), record(json!({"id": 1})), record(json!({"id": 2}))];
        let mut refs = rows.iter().collect::<Vec<_>>();
        sort_records(&mut refs, None, &config());
        assert_eq!(ids(&refs), vec!["3", "1", "2"]);
    }

    proptest! {
        #[test]
        fn output_order_ignores_input_order(
            values in prop::collection::vec(0u8..4, 1..30),
            seed in any::<u64>(),
        ) {
            let rows = values
                .iter()
                .enumerate()
                .map(|(idx, v)| record(json!({"id": idx, "v": v})))
                .collect::<Vec<_>>();
            let cfg = config();
            let sort = SortSpec::asc("v");

            let mut forward = rows.iter().collect::<Vec<_>>();
            sort_records(&mut forward, Some(&sort), &cfg);

            let mut shuffled = rows.iter().collect::<Vec<_>>();
            let len = shuffled.len();
            shuffled.rotate_left((seed as usize) % len);
            shuffled.reverse();
            sort_records(&mut shuffled, Some(&sort), &cfg);

            prop_assert_eq!(ids(&forward), ids(&shuffled));
        }
    }
}
