pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod hierarchy;
pub mod middleware;
pub mod pdf;
pub mod policy;
pub mod storage;

mod app;
pub use app::app;
