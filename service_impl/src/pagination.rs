use service::booking::PageRequest;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page_count: usize,
    pub has_next: bool,
}

/// Slices `items` into the requested page.
///
/// * Without page size or page number (or with either being zero) all items
///   are returned with a page count of zero.
/// * A negative page size, or one larger than the number of items, yields no
///   items and a page count of zero.
/// * A page number outside of `1..=page_count` yields no items, but the page
///   count and `has_next` are still derived from the full list.
pub fn paginate<T: Clone>(items: &[T], page: PageRequest) -> Paginated<T> {
    let (page_size, page_number) = match (page.page_size, page.page_number) {
        (Some(page_size), Some(page_number)) if page_size != 0 && page_number != 0 => {
            (page_size, page_number)
        }
        _ => {
            return Paginated {
                items: items.to_vec(),
                page_count: 0,
                has_next: false,
            }
        }
    };
    let page_size = match usize::try_from(page_size) {
        Ok(page_size) if page_size <= items.len() => page_size,
        _ => {
            return Paginated {
                items: Vec::new(),
                page_count: 0,
                has_next: false,
            }
        }
    };

    let page_count = items.len().div_ceil(page_size);
    let page_number = usize::try_from(page_number).ok();
    let has_next = page_number != Some(page_count);
    let items = match page_number {
        Some(page_number) if page_number <= page_count => {
            let start = (page_number - 1) * page_size;
            let end = (page_number * page_size).min(items.len());
            items[start..end].to_vec()
        }
        _ => Vec::new(),
    };
    Paginated {
        items,
        page_count,
        has_next,
    }
}
