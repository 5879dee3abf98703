use diesel::{
    prelude::*,
    result::{DatabaseErrorKind, Error},
};
use log::{info, warn};

use super::schema::{post_likes, posts};
use crate::{
    models::post_like::{InsertablePostLike, PostLike},
    store::StoreError,
};

const POST_FOREIGN_KEY: &str = "post_likes_post_id_fkey";

/// Inserts the like and bumps the post counter in one transaction. A unique
/// violation rolls the transaction back so the counter is untouched.
pub fn insert(
    conn: &mut PgConnection,
    target_user_id: i64,
    target_post_id: i64,
) -> Result<PostLike, StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let insertable = InsertablePostLike {
            post_id: target_post_id,
            user_id: target_user_id,
        };

        let like = diesel::insert_into(post_likes::table)
            .values(&insertable)
            .returning(PostLike::as_returning())
            .get_result(conn)
            .map_err(|e| match e {
                Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    warn!(
                        "User {} already liked post {}",
                        target_user_id, target_post_id
                    );
                    StoreError::AlreadyLiked {
                        user_id: target_user_id,
                        post_id: target_post_id,
                    }
                }
                Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
                    if info.constraint_name() == Some(POST_FOREIGN_KEY) {
                        StoreError::NotFound {
                            entity: "post",
                            id: target_post_id,
                        }
                    } else {
                        StoreError::NotFound {
                            entity: "user",
                            id: target_user_id,
                        }
                    }
                }
                e => e.into(),
            })?;

        diesel::update(posts::table.find(target_post_id))
            .set(posts::likes.eq(posts::likes + 1))
            .execute(conn)?;

        info!("User {} liked post {}", target_user_id, target_post_id);
        Ok(like)
    })
}

pub fn delete(
    conn: &mut PgConnection,
    target_user_id: i64,
    target_post_id: i64,
) -> Result<(), StoreError> {
    conn.transaction::<_, StoreError, _>(|conn| {
        let deleted = diesel::delete(
            post_likes::table
                .filter(post_likes::user_id.eq(target_user_id))
                .filter(post_likes::post_id.eq(target_post_id)),
        )
        .execute(conn)?;

        if deleted == 0 {
            return Err(StoreError::NotFound {
                entity: "like on post",
                id: target_post_id,
            });
        }

        diesel::update(posts::table.find(target_post_id))
            .set(posts::likes.eq(posts::likes - 1))
            .execute(conn)?;

        info!("User {} unliked post {}", target_user_id, target_post_id);
        Ok(())
    })
}

pub fn get_for_post(
    conn: &mut PgConnection,
    target_post_id: i64,
) -> Result<Vec<PostLike>, StoreError> {
    let post_exists: bool =
        diesel::select(diesel::dsl::exists(posts::table.find(target_post_id))).get_result(conn)?;

    if !post_exists {
        return Err(StoreError::NotFound {
            entity: "post",
            id: target_post_id,
        });
    }

    let likes = post_likes::table
        .filter(post_likes::post_id.eq(target_post_id))
        .order(post_likes::id.asc())
        .select(PostLike::as_select())
        .load(conn)?;

    Ok(likes)
}
