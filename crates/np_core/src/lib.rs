pub mod article;
pub mod config;
pub mod error;
pub mod storage;

pub use article::{Article, ArticleDocument, ArticleUpdate, NewArticle};
pub use config::{AdminCredentials, Config};
pub use error::Error;
pub use storage::ArticleStore;

pub type Result<T> = std::result::Result<T, Error>;
