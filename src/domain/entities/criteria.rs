use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const STATUS_ALL: &str = "all";

/// Inclusive calendar-day bounds. A missing side is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self { from, to }
    }

    pub fn is_active(&self) -> bool {
        self.from.is_some() || self.to.is_some()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| from <= date) && self.to.map_or(true, |to| date <= to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_range: Option<DateRange>,
    pub category_filters: BTreeMap<String, BTreeSet<String>>,
    pub status_filter: Option<String>,
    pub search_text: Option<String>,
}

impl FilterCriteria {
    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    /// Values are stored trimmed and lower-cased, the form records are
    /// compared in.
    pub fn with_category<I, S>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let set = values
            .into_iter()
            .map(|value| normalize_category(value.as_ref()))
            .filter(|value| !value.is_empty())
            .collect::<BTreeSet<_>>();
        self.category_filters.insert(field.into(), set);
        self
    }

    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status_filter = Some(status.into());
        self
    }

    pub fn with_search(mut self, text: impl Into<String>) -> Self {
        self.search_text = Some(text.into());
        self
    }

    /// Adds the value when absent, removes it when present.
    pub fn toggled_category(mut self, field: &str, value: &str) -> Self {
        let normalized = normalize_category(value);
        if normalized.is_empty() {
            return self;
        }
        let set = self.category_filters.entry(field.to_string()).or_default();
        if !set.remove(&normalized) {
            set.insert(normalized);
        }
        self
    }

    pub fn active_status(&self) -> Option<&str> {
        self.status_filter
            .as_deref()
            .filter(|status| !status.is_empty() && *status != STATUS_ALL)
    }

    pub fn active_search(&self) -> Option<String> {
        self.search_text
            .as_deref()
            .map(|text| text.trim().to_lowercase())
            .filter(|text| !text.is_empty())
    }

    pub fn active_date_range(&self) -> Option<&DateRange> {
        self.date_range.as_ref().filter(|range| range.is_active())
    }

    pub fn is_empty(&self) -> bool {
        self.active_date_range().is_none()
            && self.category_filters.values().all(BTreeSet::is_empty)
            && self.active_status().is_none()
            && self.active_search().is_none()
    }
}

pub fn normalize_category(value: &str) -> String {
    value.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// 1-based page position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: usize,
    pub items_per_page: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            current_page: 1,
            items_per_page: 10,
        }
    }
}

impl PageState {
    pub fn new(current_page: usize, items_per_page: usize) -> Self {
        Self {
            current_page,
            items_per_page,
        }
    }

    pub fn total_pages(&self, item_count: usize) -> usize {
        let per_page = self.items_per_page.max(1);
        item_count.div_ceil(per_page).max(1)
    }

    pub fn clamped(&self, item_count: usize) -> Self {
        let items_per_page = self.items_per_page.max(1);
        let total_pages = self.total_pages(item_count);
        Self {
            current_page: self.current_page.clamp(1, total_pages),
            items_per_page,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_criteria_is_empty() {
        assert!(FilterCriteria::default().is_empty());
        assert!(FilterCriteria::default().with_status("all").is_empty());
        assert!(FilterCriteria::default().with_search("   ").is_empty());
        assert!(FilterCriteria::default()
            .with_date_range(DateRange::default())
            .is_empty());
        assert!(!FilterCriteria::default().with_status("completed").is_empty());
    }

    #[test]
    fn category_values_are_normalized() {
        let criteria =
            FilterCriteria::default().with_category("warehouse", [" Main ", "EAST", ""]);
        let set = criteria
            .category_filters
            .get("warehouse")
            .expect("filter should exist");
        assert_eq!(
            set.iter().cloned().collect::<Vec<_>>(),
            vec!["east".to_string(), "main".to_string()]
        );
    }

    #[test]
    fn toggled_category_adds_then_removes() {
        let criteria = FilterCriteria::default().toggled_category("status", "Completed");
        assert!(criteria.category_filters["status"].contains("completed"));
        let criteria = criteria.toggled_category("status", "completed ");
        assert!(criteria.category_filters["status"].is_empty());
    }

    #[test]
    fn date_range_bounds_are_inclusive() {
        let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).expect("valid day");
        let range = DateRange::new(Some(day(5)), Some(day(10)));
        assert!(range.contains(day(5)));
        assert!(range.contains(day(10)));
        assert!(!range.contains(day(4)));
        assert!(!range.contains(day(11)));
        assert!(DateRange::new(None, Some(day(10))).contains(day(1)));
    }

    #[test]
    fn page_state_clamps_into_range() {
        assert_eq!(PageState::new(4, 5).clamped(12), PageState::new(3, 5));
        assert_eq!(PageState::new(0, 5).clamped(12), PageState::new(1, 5));
        assert_eq!(PageState::new(2, 5).clamped(0), PageState::new(1, 5));
        assert_eq!(PageState::new(2, 0).clamped(3), PageState::new(2, 1));
        assert_eq!(PageState::new(1, 5).total_pages(0), 1);
        assert_eq!(PageState::new(1, 5).total_pages(10), 2);
        assert_eq!(PageState::new(1, 5).total_pages(11), 3);
    }
}
