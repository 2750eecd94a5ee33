use crate::domain::entities::criteria::PageState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginated<'a, T> {
    pub visible: &'a [T],
    pub total_pages: usize,
    pub page: PageState,
}

/// Slices out the requested page, clamping the page number into
/// `[1, total_pages]` first so a shrinking result set never leaves the view
/// on a page that no longer exists.
pub fn paginate<T>(records: &[T], page: PageState) -> Paginated<'_, T> {
    let page = page.clamped(records.len());
    let total_pages = page.total_pages(records.len());
    let start = (page.current_page - 1) * page.items_per_page;
    let end = (start + page.items_per_page).min(records.len());
    Paginated {
        visible: &records[start.min(end)..end],
        total_pages,
        page,
    }
}
