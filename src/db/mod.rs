pub mod post;
pub mod post_like;
pub mod schema;
pub mod user;

use std::env;

use diesel::{Connection, PgConnection};
use log::error;

use crate::{config::Config, store::StoreError};

const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// `database_url` from the config file wins over the `DATABASE_URL`
/// environment variable.
pub fn database_url(config: &Config) -> Result<String, StoreError> {
    config
        .database_url
        .clone()
        .or_else(|| env::var(DATABASE_URL_ENV).ok())
        .ok_or_else(|| StoreError::Unavailable(format!("{DATABASE_URL_ENV} must be set")))
}

pub fn establish_connection(database_url: &str) -> Result<PgConnection, StoreError> {
    PgConnection::establish(database_url).map_err(|e| {
        error!("Error connecting to database: {}", e);
        StoreError::from(e)
    })
}
