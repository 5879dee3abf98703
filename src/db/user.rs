use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error},
};
use log::info;

use super::schema::{post_likes, posts, users};
use crate::{
    models::user::{InsertableUser, User},
    store::StoreError,
};

pub fn insert(conn: &mut PgConnection, user: InsertableUser) -> Result<User, StoreError> {
    diesel::insert_into(users::table)
        .values(&user)
        .returning(User::as_returning())
        .get_result(conn)
        .map_err(|e| match e {
            Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                StoreError::DuplicateEmail(user.email.clone())
            }
            e => e.into(),
        })
}

pub fn get(conn: &mut PgConnection, target_user_id: i64) -> Result<Option<User>, StoreError> {
    let user = users::table
        .find(target_user_id)
        .select(User::as_select())
        .first(conn)
        .optional()?;

    Ok(user)
}

/// The foreign keys cascade the user's posts and likes away; the counters of
/// posts the user liked are decremented first so they stay in sync.
pub fn delete(conn: &mut PgConnection, target_user_id: i64) -> Result<(), StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let liked_posts: Vec<i64> = post_likes::table
            .filter(post_likes::user_id.eq(target_user_id))
            .select(post_likes::post_id)
            .load(conn)?;

        if !liked_posts.is_empty() {
            diesel::update(posts::table.filter(posts::id.eq_any(liked_posts)))
                .set(posts::likes.eq(posts::likes - 1))
                .execute(conn)?;
        }

        let deleted = diesel::delete(users::table.find(target_user_id)).execute(conn)?;
        if deleted == 0 {
            return Err(StoreError::NotFound {
                entity: "user",
                id: target_user_id,
            });
        }

        info!("Deleted user {} with cascading posts and likes", target_user_id);
        Ok(())
    })
}
