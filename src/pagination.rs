//! Page math shared by the browse listing and the caught collection

/// Pokemon per page of the remote listing.
pub const ITEMS_PER_PAGE: u32 = 20;

/// Pokemon per page of the caught collection.
pub const CAUGHT_ITEMS_PER_PAGE: u32 = 10;

/// One slot in the pagination bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageItem {
    Prev { enabled: bool },
    Ellipsis,
    Page { number: u32, active: bool },
    Next { enabled: bool },
}

/// `ceil(count / per_page)`, zero when there is nothing to show.
pub fn total_pages(count: u32, per_page: u32) -> u32 {
    if per_page == 0 {
        return 0;
    }
    count.div_ceil(per_page)
}

/// Listing offset for a 1-based page number. Saturates instead of wrapping.
pub fn page_offset(page: u32, per_page: u32) -> u32 {
    page.saturating_sub(1).saturating_mul(per_page)
}

/// The items that fall on a 1-based page. Out-of-range pages are empty.
pub fn page_slice<T>(items: &[T], page: u32, per_page: u32) -> &[T] {
    let start = page_offset(page, per_page) as usize;
    if page == 0 || start >= items.len() {
        return &[];
    }
    let end = (start + per_page as usize).min(items.len());
    &items[start..end]
}

/// Clamp a cursor into `[1, max(total, 1)]`.
pub fn clamp_page(page: u32, total: u32) -> u32 {
    page.clamp(1, total.max(1))
}

/// Pagination window: neighbours of the current page, collapsing the rest
/// into an ellipsis on either side.
pub fn page_window(current: u32, total: u32) -> Vec<PageItem> {
    let mut items = vec![PageItem::Prev {
        enabled: current > 1,
    }];
    if current > 2 {
        items.push(PageItem::Ellipsis);
    }
    if current > 1 {
        items.push(PageItem::Page {
            number: current - 1,
            active: false,
        });
    }
    items.push(PageItem::Page {
        number: current,
        active: true,
    });
    if current < total {
        items.push(PageItem::Page {
            number: current + 1,
            active: false,
        });
    }
    if current + 1 < total {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Next {
        enabled: current < total,
    });
    items
}
