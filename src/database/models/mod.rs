pub mod category;
pub mod content;
pub mod user;

pub use category::CategoryRow;
pub use content::{Content, ContentPage, ContentType, NewContent, NewContentPage};
pub use user::{NewUser, User, UserRole};
