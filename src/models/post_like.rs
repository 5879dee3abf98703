use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::models::{post::Post, user::User};

#[derive(Insertable)]
#[diesel(table_name = crate::db::schema::post_likes)]
pub struct InsertablePostLike {
    pub post_id: i64,
    pub user_id: i64,
}

#[derive(
    Debug, Clone, PartialEq, Associations, Identifiable, Queryable, Selectable, Serialize, Deserialize,
)]
#[diesel(belongs_to(Post, foreign_key = post_id))]
#[diesel(belongs_to(User, foreign_key = user_id))]
#[diesel(table_name = crate::db::schema::post_likes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PostLike {
    pub id: i64,
    pub post_id: i64,
    pub user_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
