pub mod cursor;
pub mod error;
pub mod types;
pub mod wire;

pub use cursor::PageCursor;
pub use error::DomainError;
pub use types::{ListOptions, NewsItem, Page};

pub type Result<T> = std::result::Result<T, DomainError>;
