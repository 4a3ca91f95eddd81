//! Paginated results
//!
//! `paginate` returns a [`Page`]: the rows of one page paired with its
//! [`PageMeta`]. The metadata serializes to the shape API clients already
//! consume:
//!
//! ```json
//! {
//!   "current_page": 2,
//!   "per_page": 5,
//!   "total": 12,
//!   "last_page": 3,
//!   "links": { "prev": "/posts?page=1", "next": "/posts?page=3" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Window requested from the store for one page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number (1-indexed)
    pub page: u32,
    /// Rows per page (never zero)
    pub per_page: u32,
}

impl PageRequest {
    /// Create a page request; page 0 is treated as page 1 and a zero page size as 1
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }

    /// Rows to skip before this page
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.per_page)
    }
}

/// Previous / next page URLs, `None` at either end
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLinks {
    pub prev: Option<String>,
    pub next: Option<String>,
}

/// Pagination metadata for one page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageMeta {
    /// Current page number (1-indexed)
    pub current_page: u32,
    /// Rows per page
    pub per_page: u32,
    /// Rows across all pages
    pub total: u64,
    /// Number of the last page, at least 1
    pub last_page: u32,
    /// Neighbouring page URLs
    pub links: PageLinks,
    #[serde(skip)]
    path: String,
    #[serde(skip)]
    page_name: String,
}

impl PageMeta {
    /// Build metadata for `request` over `total` rows
    ///
    /// Links take the form `{path}?{page_name}={n}`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ship_core::repository::{PageMeta, PageRequest};
    ///
    /// let meta = PageMeta::new(PageRequest::new(2, 5), 12, "/posts", "page");
    /// assert_eq!(meta.last_page, 3);
    /// assert_eq!(meta.links.prev.as_deref(), Some("/posts?page=1"));
    /// assert_eq!(meta.links.next.as_deref(), Some("/posts?page=3"));
    /// ```
    #[must_use]
    pub fn new(request: PageRequest, total: u64, path: &str, page_name: &str) -> Self {
        let last_page = calculate_last_page(total, request.per_page);
        let current_page = request.page;
        let mut meta = Self {
            current_page,
            per_page: request.per_page,
            total,
            last_page,
            links: PageLinks {
                prev: None,
                next: None,
            },
            path: path.to_string(),
            page_name: page_name.to_string(),
        };
        if current_page > 1 {
            meta.links.prev = Some(meta.url(current_page - 1));
        }
        if current_page < last_page {
            meta.links.next = Some(meta.url(current_page + 1));
        }
        meta
    }

    /// URL of page `page`
    #[must_use]
    pub fn url(&self, page: u32) -> String {
        let separator = if self.path.contains('?') { '&' } else { '?' };
        format!("{}{}{}={}", self.path, separator, self.page_name, page.max(1))
    }

    /// Whether a page exists after this one
    #[must_use]
    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// `max(ceil(total / per_page), 1)`
fn calculate_last_page(total: u64, per_page: u32) -> u32 {
    let per_page = u64::from(per_page.max(1));
    let pages = total.div_ceil(per_page).max(1);
    pages.min(u64::from(u32::MAX)) as u32
}

/// Pages listed on each side of the current page
const ON_EACH_SIDE: u32 = 3;

/// Page numbers to list, `None` marking a `...` gap
///
/// Short ranges are listed in full. Longer ones keep the first two and last
/// two pages plus a slider around `current`, widened to ten pages when the
/// slider would touch either end.
fn page_window(current: u32, last: u32) -> Vec<Option<u32>> {
    if last < ON_EACH_SIDE * 2 + 8 {
        return (1..=last).map(Some).collect();
    }

    let window = ON_EACH_SIDE + 4;
    let mut pages = Vec::with_capacity(13);
    if current <= window {
        pages.extend((1..=window + ON_EACH_SIDE).map(Some));
        pages.push(None);
        pages.extend((last - 1..=last).map(Some));
    } else if current > last - window {
        pages.extend([Some(1), Some(2), None]);
        pages.extend((last - (window + ON_EACH_SIDE - 1)..=last).map(Some));
    } else {
        pages.extend([Some(1), Some(2), None]);
        pages.extend((current - ON_EACH_SIDE..=current + ON_EACH_SIDE).map(Some));
        pages.push(None);
        pages.extend((last - 1..=last).map(Some));
    }
    pages
}

/// One entry of the human-readable link list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

/// The rows of one page together with its metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PageMeta,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, meta: PageMeta) -> Self {
        Self { items, meta }
    }

    /// Navigation links for rendering: previous, a window of page numbers, next
    ///
    /// Long page ranges are shortened around the current page with `...`
    /// entries, so the list stays small however many pages there are.
    /// Previous/next and `...` entries carry no URL at the ends; the current
    /// page is marked active.
    pub fn links(&self) -> Vec<PageLink> {
        let meta = &self.meta;
        let window = page_window(meta.current_page, meta.last_page);
        let mut links = Vec::with_capacity(window.len() + 2);
        links.push(PageLink {
            url: meta.links.prev.clone(),
            label: "« Previous".to_string(),
            active: false,
        });
        for entry in window {
            links.push(match entry {
                Some(page) => PageLink {
                    url: Some(meta.url(page)),
                    label: page.to_string(),
                    active: page == meta.current_page,
                },
                None => PageLink {
                    url: None,
                    label: "...".to_string(),
                    active: false,
                },
            });
        }
        links.push(PageLink {
            url: meta.links.next.clone(),
            label: "Next »".to_string(),
            active: false,
        });
        links
    }

    /// The metadata as a JSON object
    pub fn links_to_json(&self) -> Value {
        serde_json::json!({
            "current_page": self.meta.current_page,
            "per_page": self.meta.per_page,
            "total": self.meta.total,
            "last_page": self.meta.last_page,
            "links": {
                "prev": self.meta.links.prev,
                "next": self.meta.links.next,
            },
        })
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Map each row to a new type, keeping the metadata
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(page: u32, per_page: u32, total: u64) -> PageMeta {
        PageMeta::new(PageRequest::new(page, per_page), total, "/posts", "page")
    }

    #[test]
    fn test_page_request_clamps() {
        let request = PageRequest::new(0, 0);
        assert_eq!(request.page, 1);
        assert_eq!(request.per_page, 1);
        assert_eq!(PageRequest::new(3, 20).offset(), 40);
    }

    #[test]
    fn test_middle_page() {
        let meta = meta(2, 5, 12);
        assert_eq!(meta.current_page, 2);
        assert_eq!(meta.per_page, 5);
        assert_eq!(meta.total, 12);
        assert_eq!(meta.last_page, 3);
        assert!(meta.has_more_pages());
    }

    #[test]
    fn test_first_page_has_no_prev() {
        let meta = meta(1, 10, 25);
        assert!(meta.links.prev.is_none());
        assert_eq!(meta.links.next.as_deref(), Some("/posts?page=2"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let meta = meta(3, 10, 25);
        assert_eq!(meta.links.prev.as_deref(), Some("/posts?page=2"));
        assert!(meta.links.next.is_none());
        assert!(!meta.has_more_pages());
    }

    #[test]
    fn test_empty_result_has_one_page() {
        let meta = meta(1, 10, 0);
        assert_eq!(meta.last_page, 1);
        assert!(meta.links.prev.is_none());
        assert!(meta.links.next.is_none());
    }

    #[test]
    fn test_url_with_existing_query_string() {
        let meta = PageMeta::new(PageRequest::new(1, 10), 30, "/posts?sort=new", "p");
        assert_eq!(meta.url(2), "/posts?sort=new&p=2");
    }

    #[test]
    fn test_meta_serializes_without_internal_fields() {
        let value = serde_json::to_value(meta(2, 5, 12)).unwrap();
        assert_eq!(
            value,
            json!({
                "current_page": 2,
                "per_page": 5,
                "total": 12,
                "last_page": 3,
                "links": { "prev": "/posts?page=1", "next": "/posts?page=3" }
            })
        );
    }

    #[test]
    fn test_links_to_json_matches_meta() {
        let page = Page::new(vec![1, 2], meta(1, 2, 2));
        let json = page.links_to_json();
        assert_eq!(json["last_page"], json!(1));
        assert_eq!(json["links"]["prev"], Value::Null);
        assert_eq!(json["links"]["next"], Value::Null);
    }

    #[test]
    fn test_human_readable_links() {
        let page = Page::new(vec!["a"], meta(2, 1, 3));
        let links = page.links();
        let labels: Vec<&str> = links.iter().map(|l| l.label.as_str()).collect();
        assert_eq!(labels, vec!["« Previous", "1", "2", "3", "Next »"]);
        assert!(links[2].active);
        assert!(!links[1].active);
        assert_eq!(links[0].url.as_deref(), Some("/posts?page=1"));
        assert_eq!(links[4].url.as_deref(), Some("/posts?page=3"));
    }

    fn labels(page: &Page<u8>) -> Vec<String> {
        page.links().into_iter().map(|l| l.label).collect()
    }

    fn expected(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_links_near_start_of_long_range() {
        let page = Page::<u8>::new(vec![], meta(1, 1, 2_000_000));
        let links = page.links();
        assert_eq!(links.len(), 15);
        assert_eq!(
            labels(&page),
            expected(&[
                "« Previous", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "...",
                "1999999", "2000000", "Next »",
            ])
        );
        assert!(links[1].active);
        assert!(links[11].url.is_none());
        assert_eq!(links[13].url.as_deref(), Some("/posts?page=2000000"));
    }

    #[test]
    fn test_links_in_middle_of_long_range() {
        let page = Page::<u8>::new(vec![], meta(1_000, 1, 2_000_000));
        assert_eq!(
            labels(&page),
            expected(&[
                "« Previous", "1", "2", "...", "997", "998", "999", "1000", "1001", "1002",
                "1003", "...", "1999999", "2000000", "Next »",
            ])
        );
        let links = page.links();
        assert!(links[7].active);
        assert!(links[3].url.is_none() && links[11].url.is_none());
    }

    #[test]
    fn test_links_near_end_of_long_range() {
        let page = Page::<u8>::new(vec![], meta(2_000_000, 1, 2_000_000));
        assert_eq!(
            labels(&page),
            expected(&[
                "« Previous", "1", "2", "...", "1999991", "1999992", "1999993", "1999994",
                "1999995", "1999996", "1999997", "1999998", "1999999", "2000000", "Next »",
            ])
        );
        assert!(page.links()[14].url.is_none());
    }

    #[test]
    fn test_short_range_lists_every_page() {
        let page = Page::<u8>::new(vec![], meta(7, 1, 13));
        let links = page.links();
        assert_eq!(links.len(), 15);
        assert!(links.iter().all(|l| l.label != "..."));
    }

    #[test]
    fn test_map_keeps_meta() {
        let page = Page::new(vec![1, 2, 3], meta(1, 3, 3)).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20, 30]);
        assert_eq!(page.meta.total, 3);
        assert_eq!(page.len(), 3);
        assert!(!page.is_empty());
    }
}
