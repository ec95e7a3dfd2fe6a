// service/src/lib.rs

//! HTTP front for the cart store: configuration, the Redis and Postgres
//! backends, and the actix-web routes.

pub mod config;
pub mod db;
pub mod errors;
pub mod state;
pub mod web;
