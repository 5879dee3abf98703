use log::{debug, warn};

use super::{
    executor::QueryExecutor,
    filter::{Category, Filter},
    pagination::{Page, PageRequest},
    SearchError,
};
use crate::models::post::Post;

const SUBMIT_KEY: &str = "Enter";

/// State of the search bar between submits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchForm {
    query: String,
    category: Category,
    city: String,
}

impl SearchForm {
    pub fn new(initial: &Filter) -> SearchForm {
        SearchForm {
            query: initial.query().unwrap_or_default().to_string(),
            category: initial.category().unwrap_or(Category::All),
            city: initial.city().unwrap_or_default().to_string(),
        }
    }

    pub fn input(&mut self, text: &str) {
        self.query = text.to_string();
    }

    pub fn clear_query(&mut self) {
        self.query.clear();
    }

    /// Slugs outside the category list select "all categories".
    pub fn select_category(&mut self, slug: &str) {
        self.category = Category::from_slug(slug).unwrap_or(Category::All);
    }

    /// `None` selects every city.
    pub fn select_city(&mut self, slug: Option<&str>) {
        self.city = slug.unwrap_or_default().to_string();
    }

    /// Enter submits, like pressing the search button.
    pub fn key_press(&self, key: &str) -> Option<Filter> {
        (key == SUBMIT_KEY).then(|| self.submit())
    }

    pub fn submit(&self) -> Filter {
        Filter::normalize(
            Some(self.query.as_str()),
            Some(self.category.slug()),
            Some(self.city.as_str()),
        )
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn city(&self) -> Option<&str> {
        (!self.city.is_empty()).then_some(self.city.as_str())
    }
}

/// Handed out for every submitted search and given back with its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTicket {
    sequence: u64,
    filter: Filter,
}

impl RequestTicket {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }
}

#[derive(Debug)]
pub enum Resolution {
    /// The response belonged to the latest request and is now the result set.
    Applied,
    /// A newer request was issued since; the response was dropped.
    Stale,
    /// The latest request failed. The previous result set is kept.
    Failed(SearchError),
}

/// Current filter and result set of one search bar.
///
/// Responses may come back in any order. Only the response to the most
/// recently issued request is applied, so a slow older search can never
/// overwrite a newer one.
#[derive(Debug, Default)]
pub struct SearchSession {
    issued: u64,
    resolved: u64,
    filter: Filter,
    results: Option<Page<Post>>,
}

impl SearchSession {
    pub fn new() -> SearchSession {
        SearchSession::default()
    }

    pub fn issue(&mut self, filter: Filter) -> RequestTicket {
        self.issued += 1;
        self.filter = filter.clone();
        RequestTicket {
            sequence: self.issued,
            filter,
        }
    }

    pub fn resolve(
        &mut self,
        ticket: RequestTicket,
        result: Result<Page<Post>, SearchError>,
    ) -> Resolution {
        if ticket.sequence != self.issued {
            debug!(
                "Dropping stale search response {} (latest is {})",
                ticket.sequence, self.issued
            );
            return Resolution::Stale;
        }

        self.resolved = ticket.sequence;
        match result {
            Ok(page) => {
                self.results = Some(page);
                Resolution::Applied
            }
            Err(e) => {
                warn!("Search {} failed: {}", ticket.sequence, e);
                Resolution::Failed(e)
            }
        }
    }

    /// Issues, executes and resolves in one go.
    pub fn run(
        &mut self,
        executor: &dyn QueryExecutor,
        filter: Filter,
        page: &PageRequest,
    ) -> Resolution {
        let ticket = self.issue(filter);
        let result = executor.execute(ticket.filter(), page);
        self.resolve(ticket, result)
    }

    pub fn filter(&self) -> &Filter {
        &self.filter
    }

    pub fn results(&self) -> Option<&Page<Post>> {
        self.results.as_ref()
    }

    /// True while the latest issued request has not come back.
    pub fn is_pending(&self) -> bool {
        self.resolved != self.issued
    }
}
