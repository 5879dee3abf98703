//! Persistence of users, posts and post likes.
//!
//! [`ListingStore`] is the seam between the search code and the database.
//! [`pg::PgListingStore`] talks to PostgreSQL through diesel and
//! [`memory::MemoryListingStore`] keeps everything in process; both enforce
//! the same invariants:
//!
//! - a user likes a given post at most once, a second like is a constraint
//!   violation and leaves the counter alone
//! - `posts.likes` equals the number of `post_likes` rows for the post
//! - deleting a user removes their posts and likes, deleting a post removes
//!   its likes
pub mod memory;
pub mod pg;

use thiserror::Error;

use crate::{
    models::{
        post::{InsertablePost, Post, PostChanges},
        post_like::PostLike,
        user::{InsertableUser, User},
    },
    search::{filter::Filter, pagination::PageRequest},
};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("query failed: {0}")]
    Query(#[from] diesel::result::Error),

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("constraint violation: user {user_id} already liked post {post_id}")]
    AlreadyLiked { user_id: i64, post_id: i64 },

    #[error("constraint violation: email {0} is already registered")]
    DuplicateEmail(String),

    #[error("invalid input: {0}")]
    Invalid(String),
}

impl StoreError {
    /// Uniqueness violations are expected outcomes (the user already liked
    /// the post), not faults.
    pub fn is_constraint_violation(&self) -> bool {
        matches!(
            self,
            StoreError::AlreadyLiked { .. } | StoreError::DuplicateEmail(_)
        )
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

impl From<diesel::ConnectionError> for StoreError {
    fn from(err: diesel::ConnectionError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

/// Matching posts for one page plus the total across all pages.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHits {
    pub posts: Vec<Post>,
    pub total: u64,
}

pub trait ListingStore: Send + Sync {
    fn create_user(&self, user: InsertableUser) -> Result<User, StoreError>;

    fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError>;

    /// Removes the user, their posts and every like they gave or received.
    fn delete_user(&self, user_id: i64) -> Result<(), StoreError>;

    fn create_post(&self, post: InsertablePost) -> Result<Post, StoreError>;

    fn get_post(&self, post_id: i64) -> Result<Option<Post>, StoreError>;

    fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Post, StoreError>;

    fn delete_post(&self, post_id: i64) -> Result<(), StoreError>;

    /// Every post, newest first. Same order as [`ListingStore::search`].
    fn all_posts(&self) -> Result<Vec<Post>, StoreError>;

    fn search(&self, filter: &Filter, page: &PageRequest) -> Result<SearchHits, StoreError>;

    /// Records the like and bumps `posts.likes` in one step.
    fn like(&self, user_id: i64, post_id: i64) -> Result<PostLike, StoreError>;

    /// Removes the like and decrements `posts.likes` in one step.
    fn unlike(&self, user_id: i64, post_id: i64) -> Result<(), StoreError>;

    fn likes_for_post(&self, post_id: i64) -> Result<Vec<PostLike>, StoreError>;

    /// Distinct city slugs that have at least one post, sorted.
    fn cities(&self) -> Result<Vec<String>, StoreError>;
}
