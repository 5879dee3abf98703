use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use super::filter::Filter;

pub const DEFAULT_PER_PAGE: u32 = 12;
pub const DEFAULT_PATH: &str = "/recherche";

/// Pages shown on each side of the current one before links collapse into
/// "..." separators.
const ON_EACH_SIDE: u32 = 3;

const PREVIOUS_LABEL: &str = "« Previous";
const NEXT_LABEL: &str = "Next »";
const SEPARATOR_LABEL: &str = "...";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    per_page: u32,
    path: String,
}

impl PageRequest {
    /// Page numbers are 1-based; page 0 is read as the first page and a zero
    /// page size as one item per page.
    pub fn new(page: u32, per_page: u32) -> PageRequest {
        PageRequest {
            page: page.max(1),
            per_page: per_page.max(1),
            path: DEFAULT_PATH.to_string(),
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> PageRequest {
        self.path = path.into();
        self
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.per_page)
    }
}

impl Default for PageRequest {
    fn default() -> PageRequest {
        PageRequest::new(1, DEFAULT_PER_PAGE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub url: Option<String>,
    pub label: String,
    pub active: bool,
}

/// One page of results plus the link metadata the search bar renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub links: Vec<PageLink>,
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub next_page_url: Option<String>,
    pub prev_page_url: Option<String>,
}

impl<T> Page<T> {
    pub fn new(data: Vec<T>, total: u64, request: &PageRequest, filter: &Filter) -> Page<T> {
        let per_page = request.per_page();
        let current_page = request.page();
        let last_page = last_page(total, per_page);
        let urls = UrlBuilder::new(request.path(), filter);

        let (from, to) = if data.is_empty() {
            (None, None)
        } else {
            let from = request.offset() + 1;
            (Some(from), Some(from + data.len() as u64 - 1))
        };

        let prev_page_url = (current_page > 1).then(|| urls.page(current_page - 1));
        let next_page_url = (current_page < last_page).then(|| urls.page(current_page + 1));

        let mut links = Vec::new();
        links.push(PageLink {
            url: prev_page_url.clone(),
            label: PREVIOUS_LABEL.to_string(),
            active: false,
        });
        for element in window(current_page, last_page) {
            links.push(match element {
                WindowElement::Page(page) => PageLink {
                    url: Some(urls.page(page)),
                    label: page.to_string(),
                    active: page == current_page,
                },
                WindowElement::Separator => PageLink {
                    url: None,
                    label: SEPARATOR_LABEL.to_string(),
                    active: false,
                },
            });
        }
        links.push(PageLink {
            url: next_page_url.clone(),
            label: NEXT_LABEL.to_string(),
            active: false,
        });

        Page {
            data,
            links,
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
            next_page_url,
            prev_page_url,
        }
    }

    /// Slices one page out of an already filtered sequence.
    pub fn from_vec(items: Vec<T>, request: &PageRequest, filter: &Filter) -> Page<T> {
        let total = items.len() as u64;
        let data = items
            .into_iter()
            .skip(request.offset() as usize)
            .take(request.per_page() as usize)
            .collect();
        Page::new(data, total, request, filter)
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page
    }
}

pub fn last_page(total: u64, per_page: u32) -> u32 {
    let pages = total.div_ceil(u64::from(per_page.max(1)));
    pages.clamp(1, u64::from(u32::MAX)) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowElement {
    Page(u32),
    Separator,
}

/// Page numbers to link, with separators where ranges are skipped.
///
/// Short result sets list every page. Longer ones keep the first two and last
/// two pages and a slider of `ON_EACH_SIDE` pages around the current one.
fn window(current: u32, last: u32) -> Vec<WindowElement> {
    if last < ON_EACH_SIDE * 2 + 8 {
        return pages(1, last);
    }

    let slider = ON_EACH_SIDE + 4;
    let mut elements;
    if current <= slider {
        elements = pages(1, slider + ON_EACH_SIDE);
        elements.push(WindowElement::Separator);
        elements.extend(pages(last - 1, last));
    } else if current > last - slider {
        elements = pages(1, 2);
        elements.push(WindowElement::Separator);
        elements.extend(pages(last - (slider + ON_EACH_SIDE - 1), last));
    } else {
        elements = pages(1, 2);
        elements.push(WindowElement::Separator);
        elements.extend(pages(current - ON_EACH_SIDE, current + ON_EACH_SIDE));
        elements.push(WindowElement::Separator);
        elements.extend(pages(last - 1, last));
    }
    elements
}

fn pages(start: u32, end: u32) -> Vec<WindowElement> {
    (start..=end).map(WindowElement::Page).collect()
}

struct UrlBuilder<'a> {
    path: &'a str,
    pairs: Vec<(&'static str, String)>,
}

impl<'a> UrlBuilder<'a> {
    fn new(path: &'a str, filter: &Filter) -> UrlBuilder<'a> {
        UrlBuilder {
            path,
            pairs: filter.query_pairs(),
        }
    }

    fn page(&self, page: u32) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        serializer.append_pair("page", &page.to_string());
        format!("{}?{}", self.path, serializer.finish())
    }
}
