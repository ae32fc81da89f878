/// Cuts the 1-based `page` of size `limit` out of `items`.
///
/// Returns the page and whether anything is left after it.
pub fn paginate<T>(mut items: Vec<T>, page: usize, limit: usize) -> (Vec<T>, bool) {
    let start = page.saturating_sub(1).saturating_mul(limit);
    let end = start.saturating_add(limit);
    let has_more = end < items.len();

    if start >= items.len() {
        return (Vec::new(), false);
    }

    items.truncate(end);
    (items.split_off(start), has_more)
}
