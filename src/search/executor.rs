use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;

use super::{
    filter::Filter,
    pagination::{Page, PageRequest},
    SearchError,
};
use crate::{models::post::Post, store::ListingStore};

/// Runs a [`Filter`] against some source of posts.
///
/// Implementations must agree: for the same filter and the same posts every
/// executor returns the same records in the same order.
pub trait QueryExecutor {
    fn execute(&self, filter: &Filter, page: &PageRequest) -> Result<Page<Post>, SearchError>;
}

/// Filters posts that were already fetched, e.g. the ones a page was rendered
/// with. Input order is kept.
#[derive(Debug, Clone, Default)]
pub struct InMemoryExecutor {
    posts: Vec<Post>,
}

impl InMemoryExecutor {
    pub fn new(posts: Vec<Post>) -> InMemoryExecutor {
        InMemoryExecutor { posts }
    }

    /// Accepts the `data` array of a serialized page, or a bare array of
    /// posts. Anything else is an invalid argument.
    pub fn from_json(source: &Value) -> Result<InMemoryExecutor, SearchError> {
        let items = match source {
            Value::Array(items) => items,
            Value::Object(page) => match page.get("data") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(SearchError::InvalidArgument(
                        "expected an array of posts or a page with a data array".to_string(),
                    ))
                }
            },
            other => {
                return Err(SearchError::InvalidArgument(format!(
                    "expected an array of posts, got {}",
                    json_kind(other)
                )))
            }
        };

        let posts = items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                Post::deserialize(item).map_err(|e| {
                    SearchError::InvalidArgument(format!("post at index {index} is malformed: {e}"))
                })
            })
            .collect::<Result<Vec<Post>, SearchError>>()?;

        Ok(InMemoryExecutor::new(posts))
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// Every matching post, unpaginated.
    pub fn filter(&self, filter: &Filter) -> Vec<Post> {
        self.posts
            .iter()
            .filter(|post| filter.matches(post))
            .cloned()
            .collect()
    }
}

impl QueryExecutor for InMemoryExecutor {
    fn execute(&self, filter: &Filter, page: &PageRequest) -> Result<Page<Post>, SearchError> {
        Ok(Page::from_vec(self.filter(filter), page, filter))
    }
}

/// Pushes the filter down to a [`ListingStore`] and lets it paginate.
#[derive(Clone)]
pub struct StoreExecutor {
    store: Arc<dyn ListingStore>,
}

impl StoreExecutor {
    pub fn new(store: Arc<dyn ListingStore>) -> StoreExecutor {
        StoreExecutor { store }
    }
}

impl QueryExecutor for StoreExecutor {
    fn execute(&self, filter: &Filter, page: &PageRequest) -> Result<Page<Post>, SearchError> {
        let hits = self.store.search(filter, page)?;
        Ok(Page::new(hits.posts, hits.total, page, filter))
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
