use chrono::Utc;
use diesel::{
    pg::Pg,
    prelude::*,
    result::{DatabaseErrorKind, Error},
};

use super::schema::posts;
use crate::{
    models::post::{InsertablePost, Post, PostChanges},
    search::{filter::Filter, pagination::PageRequest},
    store::{SearchHits, StoreError},
};

pub fn insert(conn: &mut PgConnection, post: InsertablePost) -> Result<Post, StoreError> {
    diesel::insert_into(posts::table)
        .values(&post)
        .returning(Post::as_returning())
        .get_result(conn)
        .map_err(|e| match e {
            Error::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                StoreError::NotFound {
                    entity: "user",
                    id: post.user_id,
                }
            }
            e => e.into(),
        })
}

pub fn get(conn: &mut PgConnection, target_post_id: i64) -> Result<Option<Post>, StoreError> {
    let post = posts::table
        .find(target_post_id)
        .select(Post::as_select())
        .first(conn)
        .optional()?;

    Ok(post)
}

pub fn update(
    conn: &mut PgConnection,
    target_post_id: i64,
    changes: &PostChanges,
) -> Result<Post, StoreError> {
    diesel::update(posts::table.find(target_post_id))
        .set((changes, posts::updated_at.eq(Utc::now())))
        .returning(Post::as_returning())
        .get_result(conn)
        .optional()?
        .ok_or(StoreError::NotFound {
            entity: "post",
            id: target_post_id,
        })
}

pub fn delete(conn: &mut PgConnection, target_post_id: i64) -> Result<(), StoreError> {
    let deleted = diesel::delete(posts::table.find(target_post_id)).execute(conn)?;

    if deleted == 0 {
        return Err(StoreError::NotFound {
            entity: "post",
            id: target_post_id,
        });
    }
    Ok(())
}

pub fn get_all(conn: &mut PgConnection) -> Result<Vec<Post>, StoreError> {
    let all_posts = posts::table
        .order(posts::id.desc())
        .select(Post::as_select())
        .load(conn)?;

    Ok(all_posts)
}

pub fn search(
    conn: &mut PgConnection,
    filter: &Filter,
    page: &PageRequest,
) -> Result<SearchHits, StoreError> {
    let total: i64 = filtered(filter).count().get_result(conn)?;

    let matching = filtered(filter)
        .order(posts::id.desc())
        .limit(i64::from(page.per_page()))
        .offset(page.offset() as i64)
        .select(Post::as_select())
        .load(conn)?;

    Ok(SearchHits {
        posts: matching,
        total: total.max(0) as u64,
    })
}

pub fn distinct_cities(conn: &mut PgConnection) -> Result<Vec<String>, StoreError> {
    let cities = posts::table
        .select(posts::city)
        .distinct()
        .order(posts::city.asc())
        .load::<String>(conn)?;

    Ok(cities)
}

/// SQL rendition of [`Filter::matches`]. The title match is a
/// case-insensitive substring, city and type are exact.
fn filtered(filter: &Filter) -> posts::BoxedQuery<'static, Pg> {
    let mut query = posts::table.into_boxed();

    if let Some(text) = filter.query() {
        query = query.filter(posts::title.ilike(format!("%{}%", escape_like(text))));
    }
    if let Some(category) = filter.category() {
        query = query.filter(posts::type_.eq(category.slug()));
    }
    if let Some(city) = filter.city() {
        query = query.filter(posts::city.eq(city.to_string()));
    }

    query
}

/// Escapes LIKE wildcards so user input only ever matches literally.
fn escape_like(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
