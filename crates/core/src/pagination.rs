//! # Pagination
//!
//! Admin tables page through bookings, parishioners and payments. Query
//! strings carry `page` and `limit`; both are optional and normalised here so
//! handlers only ever see a valid [`Page`].
//!
//! [`page_items`] produces the compact page list rendered under each table:
//! the first and last page, a window of siblings around the current page and
//! ellipsis markers where pages are skipped.

use serde::{Deserialize, Serialize};

pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_SIBLINGS: u32 = 1;

/// Raw `?page=&limit=` query parameters.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// A normalised page: `page >= 1` and `1 <= limit <= MAX_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub page: u32,
    pub limit: u32,
}

impl Page {
    pub fn new(request: PageRequest, default_limit: u32) -> Self {
        let page = request.page.unwrap_or(1).max(1);
        let limit = request.limit.unwrap_or(default_limit).clamp(1, MAX_LIMIT);
        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.limit)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.limit)
    }
}

pub fn total_pages(total: u64, limit: u32) -> u32 {
    if limit == 0 {
        return 0;
    }
    let pages = total.div_ceil(u64::from(limit));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "page", rename_all = "snake_case")]
pub enum PageItem {
    Page(u32),
    LeftEllipsis,
    RightEllipsis,
}

pub fn page_items(current: u32, total_pages: u32, siblings: u32) -> Vec<PageItem> {
    if total_pages == 0 {
        return Vec::new();
    }

    if total_pages <= siblings * 2 + 5 {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total_pages);
    let left_sibling = current.saturating_sub(siblings).max(1);
    let right_sibling = (current + siblings).min(total_pages);

    let show_left_dots = left_sibling > 2;
    let show_right_dots = right_sibling < total_pages - 2;

    let mut items = Vec::new();
    match (show_left_dots, show_right_dots) {
        (true, true) => {
            items.push(PageItem::Page(1));
            items.push(PageItem::LeftEllipsis);
            items.extend((left_sibling..=right_sibling).map(PageItem::Page));
            items.push(PageItem::RightEllipsis);
            items.push(PageItem::Page(total_pages));
        }
        (true, false) => {
            items.push(PageItem::Page(1));
            items.push(PageItem::LeftEllipsis);
            items.extend((total_pages - 4..=total_pages).map(PageItem::Page));
        }
        (false, true) => {
            items.extend((1..=5).map(PageItem::Page));
            items.push(PageItem::RightEllipsis);
            items.push(PageItem::Page(total_pages));
        }
        (false, false) => items.extend((1..=total_pages).map(PageItem::Page)),
    }
    items
}

/// One page of results plus everything a table footer needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub pages: Vec<PageItem>,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, page: Page, total: u64) -> Self {
        let pages_total = total_pages(total, page.limit);
        Self {
            items,
            page: page.page,
            limit: page.limit,
            total,
            total_pages: pages_total,
            pages: page_items(page.page, pages_total, DEFAULT_SIBLINGS),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            limit: self.limit,
            total: self.total,
            total_pages: self.total_pages,
            pages: self.pages,
        }
    }
}
