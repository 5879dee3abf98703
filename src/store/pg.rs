use diesel::PgConnection;
use log::{debug, info};

use super::{ListingStore, SearchHits, StoreError};
use crate::{
    config::Config,
    db::{self, establish_connection},
    models::{
        post::{InsertablePost, Post, PostChanges},
        post_like::PostLike,
        user::{InsertableUser, User},
    },
    search::{filter::Filter, pagination::PageRequest},
};

/// [`ListingStore`] backed by PostgreSQL. Every call opens its own
/// connection, so a database that is down surfaces as
/// [`StoreError::Unavailable`] on the call that needed it.
pub struct PgListingStore {
    database_url: String,
}

impl PgListingStore {
    pub fn new(database_url: impl Into<String>) -> PgListingStore {
        PgListingStore {
            database_url: database_url.into(),
        }
    }

    pub fn from_config(config: &Config) -> Result<PgListingStore, StoreError> {
        Ok(PgListingStore::new(db::database_url(config)?))
    }

    fn connection(&self) -> Result<PgConnection, StoreError> {
        establish_connection(&self.database_url)
    }
}

impl ListingStore for PgListingStore {
    fn create_user(&self, user: InsertableUser) -> Result<User, StoreError> {
        let created = db::user::insert(&mut self.connection()?, user)?;
        info!("Inserted user {} into users table", created.id);
        Ok(created)
    }

    fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        db::user::get(&mut self.connection()?, user_id)
    }

    fn delete_user(&self, user_id: i64) -> Result<(), StoreError> {
        db::user::delete(&mut self.connection()?, user_id)
    }

    fn create_post(&self, post: InsertablePost) -> Result<Post, StoreError> {
        post.validate()?;
        let created = db::post::insert(&mut self.connection()?, post)?;
        info!("Inserted post {} into posts table", created.id);
        Ok(created)
    }

    fn get_post(&self, post_id: i64) -> Result<Option<Post>, StoreError> {
        db::post::get(&mut self.connection()?, post_id)
    }

    fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        changes.validate()?;
        db::post::update(&mut self.connection()?, post_id, &changes)
    }

    fn delete_post(&self, post_id: i64) -> Result<(), StoreError> {
        db::post::delete(&mut self.connection()?, post_id)?;
        info!("Deleted post {} with its likes", post_id);
        Ok(())
    }

    fn all_posts(&self) -> Result<Vec<Post>, StoreError> {
        db::post::get_all(&mut self.connection()?)
    }

    fn search(&self, filter: &Filter, page: &PageRequest) -> Result<SearchHits, StoreError> {
        let hits = db::post::search(&mut self.connection()?, filter, page)?;
        debug!(
            "Search {:?} page {} matched {} posts",
            filter,
            page.page(),
            hits.total
        );
        Ok(hits)
    }

    fn like(&self, user_id: i64, post_id: i64) -> Result<PostLike, StoreError> {
        db::post_like::insert(&mut self.connection()?, user_id, post_id)
    }

    fn unlike(&self, user_id: i64, post_id: i64) -> Result<(), StoreError> {
        db::post_like::delete(&mut self.connection()?, user_id, post_id)
    }

    fn likes_for_post(&self, post_id: i64) -> Result<Vec<PostLike>, StoreError> {
        db::post_like::get_for_post(&mut self.connection()?, post_id)
    }

    fn cities(&self) -> Result<Vec<String>, StoreError> {
        db::post::distinct_cities(&mut self.connection()?)
    }
}
