pub mod config;
pub mod db;
pub mod logger;
pub mod models;
pub mod search;
pub mod store;
pub mod web;
