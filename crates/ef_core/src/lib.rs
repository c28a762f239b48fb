pub mod error;
pub mod types;

pub use error::Error;
pub use types::{ArticleRecord, ArticleRef};

pub type Result<T> = std::result::Result<T, Error>;
