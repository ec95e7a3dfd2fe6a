// service/src/db/mod.rs

// Production backends for the cart store seams.
pub mod product_repo;
pub mod redis_store;

pub use product_repo::PgProductRepo;
pub use redis_store::RedisDocumentStore;
