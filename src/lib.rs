pub mod auth;
pub mod bidding;
pub mod cache;
pub mod db;
pub mod handlers;
pub mod hiring;
pub mod models;
pub mod notify;

pub use db::create_pool;
