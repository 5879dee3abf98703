//! Search over posts: filter normalization, the two interchangeable query
//! executors, pagination and the search-bar session state.
pub mod executor;
pub mod filter;
pub mod pagination;
pub mod session;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}
