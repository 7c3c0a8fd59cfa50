pub mod auth;
pub mod browse;
pub mod categories;
pub mod contents;
pub mod files;
