//! Thin per-entity storage accessors over the shared connection pool.

pub mod categories;
pub mod contents;
pub mod users;

pub use categories::CategoryStore;
pub use contents::ContentStore;
pub use users::UserStore;
