//! Repositories for database operations

pub mod catalog;
pub mod comment;
pub mod review;
pub mod title;
pub mod user;

pub use catalog::CatalogRepository;
pub use comment::CommentRepository;
pub use review::ReviewRepository;
pub use title::TitleRepository;
pub use user::UserRepository;
