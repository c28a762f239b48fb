pub mod convert;
pub mod date;
pub mod fetch;
pub mod footnotes;
pub mod index;
pub mod pipeline;
pub mod reflow;

pub use fetch::{Fetch, HttpFetcher};
pub use pipeline::{run, RunConfig};

pub mod prelude {
    pub use crate::fetch::Fetch;
    pub use ef_core::{ArticleRecord, ArticleRef, Error, Result};
}
