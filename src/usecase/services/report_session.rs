use chrono::NaiveDate;

use crate::domain::entities::criteria::{DateRange, FilterCriteria, PageState, SortSpec};
use crate::domain::entities::record::{JsonRecord, ReportRecord};
use crate::domain::entities::view_config::ViewConfig;
use crate::domain::entities::view_model::ReportViewModel;
use crate::domain::report::assemble::{assemble, ordered_records};
use crate::domain::report::filter::filter_records;
use crate::usecase::ports::fetcher::{FetchError, RecordSource};
use crate::usecase::services::request_guard::{FetchTicket, RequestGuard};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

impl LoadState {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// State owned by one open report screen.
///
/// Created when the screen mounts and closed when it unmounts. Fetched
/// records, filters, sort and page live here and nowhere else.
#[derive(Debug, Clone)]
pub struct ReportSession<R> {
    config: ViewConfig,
    records: Vec<R>,
    criteria: FilterCriteria,
    sort: Option<SortSpec>,
    page: PageState,
    load_state: LoadState,
    guard: RequestGuard,
}

impl<R: ReportRecord + Clone> ReportSession<R> {
    pub fn new(config: ViewConfig) -> Self {
        let page = PageState::new(1, config.items_per_page);
        let sort = config.default_sort.clone();
        Self {
            config,
            records: Vec::new(),
            criteria: FilterCriteria::default(),
            sort,
            page,
            load_state: LoadState::Idle,
            guard: RequestGuard::new(),
        }
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> PageState {
        self.page
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// Shared handle for workers that want to drop stale work early.
    pub fn guard(&self) -> RequestGuard {
        self.guard.clone()
    }

    pub fn is_open(&self) -> bool {
        self.guard.is_alive()
    }

    pub fn begin_fetch(&mut self) -> FetchTicket {
        let ticket = self.guard.issue();
        if self.is_open() {
            self.load_state = LoadState::Loading;
        }
        log::debug!(
            "report {}: fetch #{} started",
            self.config.key,
            ticket.generation()
        );
        ticket
    }

    /// Applies a fetch result if `ticket` is still the latest request and the
    /// session is open. Returns whether the result was applied.
    ///
    /// A failed fetch keeps the previously loaded records on screen.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: Result<Vec<R>, FetchError>) -> bool {
        if !self.guard.is_current(ticket) {
            log::debug!(
                "report {}: discarding stale response #{}",
                self.config.key,
                ticket.generation()
            );
            return false;
        }

        match result {
            Ok(records) => {
                log::info!(
                    "report {}: loaded {} records",
                    self.config.key,
                    records.len()
                );
                self.records = records;
                self.load_state = LoadState::Loaded;
                self.reclamp();
            }
            Err(err) => {
                log::warn!("report {}: fetch failed: {err}", self.config.key);
                self.load_state = LoadState::Failed(err.user_message());
            }
        }
        true
    }

    pub fn close(&mut self) {
        self.guard.close();
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.reclamp();
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.criteria.search_text = Some(text.into());
        self.reclamp();
    }

    pub fn set_status_filter(&mut self, status: impl Into<String>) {
        self.criteria.status_filter = Some(status.into());
        self.reclamp();
    }

    pub fn set_date_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.criteria.date_range = Some(DateRange::new(from, to));
        self.reclamp();
    }

    pub fn toggle_category(&mut self, field: &str, value: &str) {
        self.criteria = std::mem::take(&mut self.criteria).toggled_category(field, value);
        self.reclamp();
    }

    pub fn clear_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.reclamp();
    }

    /// Same field flips direction; a new field starts ascending.
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = match self.sort.take() {
            Some(current) if current.field == field => Some(SortSpec {
                field: current.field,
                direction: current.direction.flipped(),
            }),
            _ => Some(SortSpec::asc(field)),
        };
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn set_page(&mut self, current_page: usize) {
        self.page.current_page = current_page;
        self.reclamp();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.page.current_page.saturating_add(1));
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.page.current_page.saturating_sub(1));
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.page.items_per_page = items_per_page;
        self.reclamp();
    }

    pub fn view_model(&self) -> ReportViewModel<R> {
        assemble(
            &self.records,
            &self.criteria,
            self.sort.as_ref(),
            self.page,
            &self.config,
        )
    }

    /// Filtered and sorted records across all pages.
    pub fn export_rows(&self) -> Vec<&R> {
        ordered_records(&self.records, &self.criteria, self.sort.as_ref(), &self.config)
    }

    fn reclamp(&mut self) {
        let filtered = filter_records(&self.records, &self.criteria, &self.config).len();
        self.page = self.page.clamped(filtered);
    }
}

impl ReportSession<JsonRecord> {
    /// Fetches this view's endpoint and applies the result.
    pub fn load(&mut self, source: &dyn RecordSource, auth_token: Option<&str>) -> bool {
        let ticket = self.begin_fetch();
        let endpoint = self.config.endpoint.clone();
        let result = source.fetch(&endpoint, auth_token);
        self.complete_fetch(ticket, result)
    }
}
