// Page bookkeeping for the list view
//
// Two flavours: client-side, where we hold the whole result set and cut it
// into fixed-size buckets ourselves, and server-side, where the backend owns
// the pages and we only track which one is showing.
use quotescope_api::{PageInfo, Quote};

pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Buttons shown at once in the page bar before ellipses kick in
pub const VISIBLE_PAGES: usize = 4;

/// Contiguous fixed-size split of a quote list, with `"min - max"` id labels
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Buckets {
    pages: Vec<Vec<Quote>>,
    labels: Vec<String>,
}

impl Buckets {
    pub fn new(items: Vec<Quote>, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let mut pages = Vec::with_capacity(items.len().div_ceil(page_size));
        let mut labels = Vec::with_capacity(pages.capacity());

        let mut items = items.into_iter().peekable();
        while items.peek().is_some() {
            let page: Vec<Quote> = items.by_ref().take(page_size).collect();
            labels.push(id_range_label(&page));
            pages.push(page);
        }

        Self { pages, labels }
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn item_count(&self) -> usize {
        self.pages.iter().map(Vec::len).sum()
    }

    /// 1-based page lookup
    pub fn page(&self, page: usize) -> &[Quote] {
        page.checked_sub(1)
            .and_then(|i| self.pages.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

/// `"{min id} - {max id}"` for a page, whatever order the ids come in
pub fn id_range_label(page: &[Quote]) -> String {
    let min = page.iter().map(|q| q.id).min();
    let max = page.iter().map(|q| q.id).max();
    match (min, max) {
        (Some(min), Some(max)) => format!("{} - {}", min, max),
        _ => String::new(),
    }
}

/// Which side owns the pages
#[derive(Debug, Clone, PartialEq)]
pub enum Pagination {
    Client { buckets: Buckets, current: usize },
    Server { current: u32, total_pages: u32 },
}

impl Pagination {
    pub fn client(items: Vec<Quote>, page_size: usize) -> Self {
        Pagination::Client {
            buckets: Buckets::new(items, page_size),
            current: 1,
        }
    }

    pub fn server(current: u32, total_pages: u32) -> Self {
        Pagination::Server {
            current: reconcile_page(current, total_pages),
            total_pages,
        }
    }

    pub fn current_page(&self) -> usize {
        match self {
            Pagination::Client { current, .. } => *current,
            Pagination::Server { current, .. } => (*current).max(1) as usize,
        }
    }

    /// Never less than one, even for an empty source
    pub fn total_pages(&self) -> usize {
        match self {
            Pagination::Client { buckets, .. } => buckets.len().max(1),
            Pagination::Server { total_pages, .. } => (*total_pages).max(1) as usize,
        }
    }

    pub fn can_go_next(&self) -> bool {
        self.current_page() < self.total_pages()
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page() > 1
    }

    /// Clamp to `1..=total_pages` and move there. Returns the page the owner
    /// has to fetch in server mode; client mode has everything already.
    pub fn go_to_page(&mut self, page: usize) -> Option<u32> {
        let target = page.clamp(1, self.total_pages());
        match self {
            Pagination::Client { current, .. } => {
                *current = target;
                None
            }
            Pagination::Server { current, .. } => {
                if *current as usize == target {
                    return None;
                }
                *current = target as u32;
                Some(*current)
            }
        }
    }

    pub fn go_next(&mut self) -> Option<u32> {
        if !self.can_go_next() {
            return None;
        }
        self.go_to_page(self.current_page() + 1)
    }

    pub fn go_previous(&mut self) -> Option<u32> {
        if !self.can_go_previous() {
            return None;
        }
        self.go_to_page(self.current_page() - 1)
    }

    /// Quotes of the current page (client mode only)
    pub fn current_items(&self) -> &[Quote] {
        match self {
            Pagination::Client { buckets, current } => buckets.page(*current),
            Pagination::Server { .. } => &[],
        }
    }

    pub fn labels(&self) -> &[String] {
        match self {
            Pagination::Client { buckets, .. } => buckets.labels(),
            Pagination::Server { .. } => &[],
        }
    }

    /// New source for client mode. The page stays put if it still exists,
    /// otherwise clamps to the last one.
    pub fn replace_items(&mut self, items: Vec<Quote>, page_size: usize) {
        match self {
            Pagination::Client { buckets, current } => {
                *buckets = Buckets::new(items, page_size);
                *current = (*current).clamp(1, buckets.len().max(1));
            }
            Pagination::Server { .. } => {
                *self = Pagination::client(items, page_size);
            }
        }
    }
}

/// Pages past the end fall back to the first one
pub fn reconcile_page(requested: u32, total_pages: u32) -> u32 {
    if requested == 0 || requested > total_pages {
        1
    } else {
        requested
    }
}

/// One slot in the page bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSlot<'a> {
    Page(&'a PageInfo),
    EllipsisStart,
    EllipsisEnd,
}

/// Page buttons to draw around `current`: all of them when there are at most
/// four, otherwise a window of four with ellipses. `reversed` walks the pages
/// in display order last-to-first.
pub fn visible_pages(pages: &[PageInfo], current: u32, reversed: bool) -> Vec<PageSlot<'_>> {
    let display: Vec<&PageInfo> = if reversed {
        pages.iter().rev().collect()
    } else {
        pages.iter().collect()
    };
    let total = display.len();

    if total <= VISIBLE_PAGES {
        return display.into_iter().map(PageSlot::Page).collect();
    }

    let index = display.iter().position(|p| p.page == current).unwrap_or(0);
    let mut slots = Vec::with_capacity(VISIBLE_PAGES + 2);

    if index < VISIBLE_PAGES {
        slots.extend(display[..VISIBLE_PAGES].iter().copied().map(PageSlot::Page));
        slots.push(PageSlot::EllipsisEnd);
    } else if index > total - VISIBLE_PAGES {
        slots.push(PageSlot::EllipsisStart);
        slots.extend(display[total - VISIBLE_PAGES..].iter().copied().map(PageSlot::Page));
    } else {
        let start = index.saturating_sub(1).min(total - VISIBLE_PAGES);
        slots.push(PageSlot::EllipsisStart);
        slots.extend(display[start..start + VISIBLE_PAGES].iter().copied().map(PageSlot::Page));
        slots.push(PageSlot::EllipsisEnd);
    }

    slots
}
