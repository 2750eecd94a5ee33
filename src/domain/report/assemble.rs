use crate::domain::entities::criteria::{FilterCriteria, PageState, SortSpec};
use crate::domain::entities::record::ReportRecord;
use crate::domain::entities::view_config::ViewConfig;
use crate::domain::entities::view_model::ReportViewModel;
use crate::domain::report::aggregate::aggregate;
use crate::domain::report::filter::filter_records;
use crate::domain::report::paginate::paginate;
use crate::domain::report::sort::sort_records;

/// Filter, sort, paginate and summarise `raw` into one snapshot.
///
/// Pure: identical inputs always produce an identical view model.
pub fn assemble<R: ReportRecord + Clone>(
    raw: &[R],
    criteria: &FilterCriteria,
    sort: Option<&SortSpec>,
    page: PageState,
    config: &ViewConfig,
) -> ReportViewModel<R> {
    let mut ordered = filter_records(raw, criteria, config);
    sort_records(&mut ordered, sort, config);

    let summary = aggregate(&ordered, &config.aggregates);
    let paged = paginate(&ordered, page);

    ReportViewModel {
        visible_records: paged.visible.iter().map(|record| (*record).clone()).collect(),
        total_filtered: ordered.len(),
        total_unfiltered: raw.len(),
        page: paged.page,
        total_pages: paged.total_pages,
        summary,
    }
}

/// The filtered and sorted set without pagination, as exported to CSV.
pub fn ordered_records<'a, R: ReportRecord>(
    raw: &'a [R],
    criteria: &FilterCriteria,
    sort: Option<&SortSpec>,
    config: &ViewConfig,
) -> Vec<&'a R> {
    let mut ordered = filter_records(raw, criteria, config);
    sort_records(&mut ordered, sort, config);
    ordered
}
