use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::entities::criteria::PageState;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub metrics: BTreeMap<String, f64>,
    pub groups: BTreeMap<String, BTreeMap<String, usize>>,
}

impl AggregateResult {
    pub fn metric(&self, name: &str) -> f64 {
        self.metrics.get(name).copied().unwrap_or(0.0)
    }

    pub fn group(&self, name: &str) -> Option<&BTreeMap<String, usize>> {
        self.groups.get(name)
    }
}

/// Render-ready snapshot of one report screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportViewModel<R> {
    pub visible_records: Vec<R>,
    pub total_filtered: usize,
    pub total_unfiltered: usize,
    pub page: PageState,
    pub total_pages: usize,
    pub summary: AggregateResult,
}

impl<R> ReportViewModel<R> {
    pub fn is_empty(&self) -> bool {
        self.total_filtered == 0
    }

    pub fn has_previous_page(&self) -> bool {
        self.page.current_page > 1
    }

    pub fn has_next_page(&self) -> bool {
        self.page.current_page < self.total_pages
    }

    /// 1-based inclusive row numbers shown on the current page, `None` when
    /// nothing is visible.
    pub fn visible_range(&self) -> Option<(usize, usize)> {
        if self.visible_records.is_empty() {
            return None;
        }
        let start = (self.page.current_page - 1) * self.page.items_per_page + 1;
        Some((start, start + self.visible_records.len() - 1))
    }
}
