use chrono::NaiveDateTime;

use crate::domain::entities::criteria::{normalize_category, DateRange, FilterCriteria};
use crate::domain::entities::record::ReportRecord;
use crate::domain::entities::view_config::ViewConfig;

/// Decides whether `record` passes every active dimension of `criteria`.
///
/// A field referenced by an active dimension that the record lacks fails
/// that dimension. Search is the exception: it only needs one of the
/// configured text fields to match.
pub fn matches<R: ReportRecord>(record: &R, criteria: &FilterCriteria, config: &ViewConfig) -> bool {
    matches_date_range(record, criteria, config)
        && matches_categories(record, criteria)
        && matches_status(record, criteria, config)
        && matches_search(record, criteria, config)
}

pub fn filter_records<'a, R: ReportRecord>(
    records: &'a [R],
    criteria: &FilterCriteria,
    config: &ViewConfig,
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|record| matches(*record, criteria, config))
        .collect()
}

/// First configured date field that is present and parseable.
pub fn record_date<R: ReportRecord>(record: &R, config: &ViewConfig) -> Option<NaiveDateTime> {
    config
        .date_fields
        .iter()
        .find_map(|field| record.timestamp(field))
}

fn matches_date_range<R: ReportRecord>(
    record: &R,
    criteria: &FilterCriteria,
    config: &ViewConfig,
) -> bool {
    let Some(range) = criteria.active_date_range() else {
        return true;
    };
    in_range(record_date(record, config), range)
}

fn in_range(date: Option<NaiveDateTime>, range: &DateRange) -> bool {
    date.is_some_and(|date| range.contains(date.date()))
}

fn matches_categories<R: ReportRecord>(record: &R, criteria: &FilterCriteria) -> bool {
    criteria
        .category_filters
        .iter()
        .filter(|(_, allowed)| !allowed.is_empty())
        .all(|(field, allowed)| {
            record
                .text(field)
                .is_some_and(|value| allowed.contains(&normalize_category(&value)))
        })
}

fn matches_status<R: ReportRecord>(record: &R, criteria: &FilterCriteria, config: &ViewConfig) -> bool {
    let Some(status) = criteria.active_status() else {
        return true;
    };
    let Some(field) = config.status_field.as_deref() else {
        return false;
    };
    record.text(field).is_some_and(|value| value == status)
}

fn matches_search<R: ReportRecord>(record: &R, criteria: &FilterCriteria, config: &ViewConfig) -> bool {
    let Some(needle) = criteria.active_search() else {
        return true;
    };
    config.search_fields.iter().any(|field| {
        record
            .text(field)
            .is_some_and(|value| value.to_lowercase().contains(&needle))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::record::JsonRecord;
    use crate::domain::entities::view_config::FieldKind;
    use chrono::NaiveDate;
    use proptest::prelude::*;
    use serde_json::json;

    fn config() -> ViewConfig {
        ViewConfig::builder("t", "Test", "/t")
            .field("created_at", "Date", FieldKind::Date)
            .field("warehouse", "Warehouse", FieldKind::Category)
            .field("status", "Status", FieldKind::Category)
            .date_fields(["created_at", "transfer_date"])
            .status_field("status")
            .search_fields(["product", "notes"])
            .build()
    }

    fn record(value: serde_json::Value) -> JsonRecord {
        JsonRecord::from_value(value).expect("fixture should be an object")
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).expect("valid day")
    }

    #[test]
    fn empty_criteria_matches_everything() {
        let criteria = FilterCriteria::default();
        assert!(matches(&record(json!({})), &criteria, &config()));
        assert!(matches(&record(json!({"status": "x"})), &criteria, &config()));
    }

    #[test]
    fn date_range_is_inclusive_and_fails_closed() {
        let criteria = FilterCriteria::default()
            .with_date_range(DateRange::new(Some(day(2)), Some(day(4))));
        let cfg = config();
        assert!(matches(&record(json!({"created_at": "2024-05-02T00:00:00"})), &criteria, &cfg));
        assert!(matches(&record(json!({"created_at": "2024-05-04T23:59:59"})), &criteria, &cfg));
        assert!(!matches(&record(json!({"created_at": "2024-05-05T00:00:00"})), &criteria, &cfg));
        assert!(!matches(&record(json!({"created_at": "soon"})), &criteria, &cfg));
        assert!(!matches(&record(json!({})), &criteria, &cfg));
    }

    #[test]
    fn date_range_falls_back_to_later_date_fields() {
        let criteria = FilterCriteria::default().with_date_range(DateRange::new(Some(day(3)), None));
        let row = record(json!({"transfer_date": "2024-05-09"}));
        assert!(matches(&row, &criteria, &config()));
    }

    #[test]
    fn inactive_date_range_ignores_missing_dates() {
        let criteria = FilterCriteria::default().with_date_range(DateRange::default());
        assert!(matches(&record(json!({})), &criteria, &config()));
    }

    #[test]
    fn category_membership_is_trimmed_and_case_insensitive() {
        let criteria = FilterCriteria::default().with_category("warehouse", ["Main"]);
        let cfg = config();
        assert!(matches(&record(json!({"warehouse": "  MAIN "})), &criteria, &cfg));
        assert!(!matches(&record(json!({"warehouse": "east"})), &criteria, &cfg));
        assert!(!matches(&record(json!({})), &criteria, &cfg));

        let empty = FilterCriteria::default().with_category("warehouse", Vec::<String>::new());
        assert!(matches(&record(json!({})), &empty, &cfg));
    }

    #[test]
    fn status_all_is_a_wildcard_and_others_match_exactly() {
        let cfg = config();
        let all = FilterCriteria::default().with_status("all");
        assert!(matches(&record(json!({"status": "pending"})), &all, &cfg));

        let completed = FilterCriteria::default().with_status("completed");
        assert!(matches(&record(json!({"status": "completed"})), &completed, &cfg));
        assert!(!matches(&record(json!({"status": "Completed"})), &completed, &cfg));
        assert!(!matches(&record(json!({})), &completed, &cfg));
    }

    #[test]
    fn search_needs_only_one_field_to_match() {
        let cfg = config();
        let criteria = FilterCriteria::default().with_search("  BOLT ");
        assert!(matches(&record(json!({"notes": "hex bolts"})), &criteria, &cfg));
        assert!(matches(&record(json!({"product": "Bolt M6", "notes": null})), &criteria, &cfg));
        assert!(!matches(&record(json!({"product": "nut"})), &criteria, &cfg));
        assert!(!matches(&record(json!({})), &criteria, &cfg));
    }

    #[test]
    fn dimensions_combine_with_and() {
        let cfg = config();
        let criteria = FilterCriteria::default()
            .with_status("completed")
            .with_search("bolt");
        assert!(matches(&record(json!({"status": "completed", "product": "bolt"})), &criteria, &cfg));
        assert!(!matches(&record(json!({"status": "pending", "product": "bolt"})), &criteria, &cfg));
        assert!(!matches(&record(json!({"status": "completed", "product": "nut"})), &criteria, &cfg));
    }

    fn arb_record() -> impl Strategy<Value = JsonRecord> {
        (
            prop::sample::select(vec!["main", "east", "west"]),
            prop::sample::select(vec!["completed", "pending", "cancelled"]),
            1u32..28,
            prop::sample::select(vec!["bolt", "nut", "washer"]),
        )
            .prop_map(|(warehouse, status, d, product)| {
                record(json!({
                    "warehouse": warehouse,
                    "status": status,
                    "created_at": format!("2024-05-{d:02}"),
                    "product": product,
                }))
            })
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(records in prop::collection::vec(arb_record(), 0..40)) {
            let cfg = config();
            let criteria = FilterCriteria::default().with_category("warehouse", ["main", "east"]);
            let once: Vec<JsonRecord> = filter_records(&records, &criteria, &cfg).into_iter().cloned().collect();
            let twice: Vec<JsonRecord> = filter_records(&once, &criteria, &cfg).into_iter().cloned().collect();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn adding_restrictions_never_grows_the_result(
            records in prop::collection::vec(arb_record(), 0..40),
            from in 1u32..14,
            to in 14u32..28,
        ) {
            let cfg = config();
            let base = FilterCriteria::default().with_search("o");
            let narrowed = base
                .clone()
                .with_status("completed")
                .with_category("warehouse", ["main"])
                .with_date_range(DateRange::new(Some(day(from)), Some(day(to))));
            let wide = filter_records(&records, &base, &cfg).len();
            let narrow = filter_records(&records, &narrowed, &cfg).len();
            prop_assert!(narrow <= wide);
        }
    }
}
