use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Mutex, MutexGuard},
};

use chrono::Utc;
use log::info;

use super::{ListingStore, SearchHits, StoreError};
use crate::{
    models::{
        post::{InsertablePost, Post, PostChanges},
        post_like::PostLike,
        user::{InsertableUser, User},
    },
    search::{filter::Filter, pagination::PageRequest},
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    posts: BTreeMap<i64, Post>,
    post_likes: BTreeMap<i64, PostLike>,
    next_user_id: i64,
    next_post_id: i64,
    next_like_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }

    fn require_user(&self, user_id: i64) -> Result<(), StoreError> {
        if self.users.contains_key(&user_id) {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "user",
                id: user_id,
            })
        }
    }

    fn require_post(&self, post_id: i64) -> Result<(), StoreError> {
        if self.posts.contains_key(&post_id) {
            Ok(())
        } else {
            Err(StoreError::NotFound {
                entity: "post",
                id: post_id,
            })
        }
    }

    fn remove_post(&mut self, post_id: i64) {
        self.posts.remove(&post_id);
        self.post_likes.retain(|_, like| like.post_id != post_id);
    }

    /// Newest first, matching the PostgreSQL ordering.
    fn posts_newest_first(&self) -> impl Iterator<Item = &Post> {
        self.posts.values().rev()
    }
}

/// Process-local [`ListingStore`]. Used by the test suite and for running
/// the HTTP surface without a database.
#[derive(Default)]
pub struct MemoryListingStore {
    tables: Mutex<Tables>,
}

impl MemoryListingStore {
    pub fn new() -> MemoryListingStore {
        MemoryListingStore::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, StoreError> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl ListingStore for MemoryListingStore {
    fn create_user(&self, user: InsertableUser) -> Result<User, StoreError> {
        let mut tables = self.tables()?;

        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail(user.email));
        }

        let now = Utc::now();
        let created = User {
            id: Tables::next_id(&mut tables.next_user_id),
            name: user.name,
            email: user.email,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(created.id, created.clone());
        Ok(created)
    }

    fn get_user(&self, user_id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.tables()?.users.get(&user_id).cloned())
    }

    fn delete_user(&self, user_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.require_user(user_id)?;

        let given: Vec<PostLike> = tables
            .post_likes
            .values()
            .filter(|like| like.user_id == user_id)
            .cloned()
            .collect();
        for like in given {
            tables.post_likes.remove(&like.id);
            if let Some(post) = tables.posts.get_mut(&like.post_id) {
                post.likes -= 1;
            }
        }

        let owned: Vec<i64> = tables
            .posts
            .values()
            .filter(|post| post.user_id == user_id)
            .map(|post| post.id)
            .collect();
        for post_id in &owned {
            tables.remove_post(*post_id);
        }

        tables.users.remove(&user_id);
        info!(
            "Deleted user {} along with {} posts",
            user_id,
            owned.len()
        );
        Ok(())
    }

    fn create_post(&self, post: InsertablePost) -> Result<Post, StoreError> {
        post.validate()?;
        let mut tables = self.tables()?;
        tables.require_user(post.user_id)?;

        let now = Utc::now();
        let created = Post {
            id: Tables::next_id(&mut tables.next_post_id),
            city: post.city,
            sector: post.sector,
            price: post.price,
            product: post.product,
            property_type: post.property_type,
            bedrooms: post.bedrooms,
            bathrooms: post.bathrooms,
            area: post.area,
            address: post.address,
            address_maps: post.address_maps,
            title: post.title,
            description: post.description,
            image: post.image,
            likes: 0,
            user_id: post.user_id,
            created_at: now,
            updated_at: now,
        };
        tables.posts.insert(created.id, created.clone());
        Ok(created)
    }

    fn get_post(&self, post_id: i64) -> Result<Option<Post>, StoreError> {
        Ok(self.tables()?.posts.get(&post_id).cloned())
    }

    fn update_post(&self, post_id: i64, changes: PostChanges) -> Result<Post, StoreError> {
        changes.validate()?;
        let mut tables = self.tables()?;

        let post = tables.posts.get_mut(&post_id).ok_or(StoreError::NotFound {
            entity: "post",
            id: post_id,
        })?;
        changes.apply(post);
        post.updated_at = Utc::now();
        Ok(post.clone())
    }

    fn delete_post(&self, post_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables()?;
        tables.require_post(post_id)?;
        tables.remove_post(post_id);
        Ok(())
    }

    fn all_posts(&self) -> Result<Vec<Post>, StoreError> {
        Ok(self.tables()?.posts_newest_first().cloned().collect())
    }

    fn search(&self, filter: &Filter, page: &PageRequest) -> Result<SearchHits, StoreError> {
        let tables = self.tables()?;

        let matching: Vec<&Post> = tables
            .posts_newest_first()
            .filter(|post| filter.matches(post))
            .collect();

        Ok(SearchHits {
            total: matching.len() as u64,
            posts: matching
                .into_iter()
                .skip(page.offset() as usize)
                .take(page.per_page() as usize)
                .cloned()
                .collect(),
        })
    }

    fn like(&self, user_id: i64, post_id: i64) -> Result<PostLike, StoreError> {
        let mut tables = self.tables()?;
        tables.require_user(user_id)?;
        tables.require_post(post_id)?;

        if tables
            .post_likes
            .values()
            .any(|like| like.user_id == user_id && like.post_id == post_id)
        {
            return Err(StoreError::AlreadyLiked { user_id, post_id });
        }

        let now = Utc::now();
        let like = PostLike {
            id: Tables::next_id(&mut tables.next_like_id),
            post_id,
            user_id,
            created_at: now,
            updated_at: now,
        };
        tables.post_likes.insert(like.id, like.clone());
        if let Some(post) = tables.posts.get_mut(&post_id) {
            post.likes += 1;
        }
        Ok(like)
    }

    fn unlike(&self, user_id: i64, post_id: i64) -> Result<(), StoreError> {
        let mut tables = self.tables()?;

        let like_id = tables
            .post_likes
            .values()
            .find(|like| like.user_id == user_id && like.post_id == post_id)
            .map(|like| like.id)
            .ok_or(StoreError::NotFound {
                entity: "like on post",
                id: post_id,
            })?;

        tables.post_likes.remove(&like_id);
        if let Some(post) = tables.posts.get_mut(&post_id) {
            post.likes -= 1;
        }
        Ok(())
    }

    fn likes_for_post(&self, post_id: i64) -> Result<Vec<PostLike>, StoreError> {
        let tables = self.tables()?;
        tables.require_post(post_id)?;
        Ok(tables
            .post_likes
            .values()
            .filter(|like| like.post_id == post_id)
            .cloned()
            .collect())
    }

    fn cities(&self) -> Result<Vec<String>, StoreError> {
        let tables = self.tables()?;
        let cities: BTreeSet<&String> = tables.posts.values().map(|post| &post.city).collect();
        Ok(cities.into_iter().cloned().collect())
    }
}
