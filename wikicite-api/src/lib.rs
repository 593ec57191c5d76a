//! # wikicite-api
//!
//! Thin MediaWiki API client that feeds article wikitext to the `wikicite`
//! scanner: bot login, article listing by embedded template, and batched
//! content retrieval with throttling and bounded retry.
//!
//! ```rust,no_run
//! use wikicite_api::{ApiConfig, Credentials, WikiClient};
//!
//! # async fn run() -> wikicite_api::Result<()> {
//! let client = WikiClient::new(ApiConfig::default())?;
//! if let Some(credentials) = Credentials::from_env() {
//!     client.authenticate(&credentials).await?;
//! }
//! let titles = client.find_articles_using_template("Cite web", 10).await?;
//! let texts = client.fetch_articles(&titles).await?;
//! println!("fetched {} articles", texts.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod error;
mod source;

pub use client::{Params, WikiClient};
pub use config::{
    ApiConfig, Credentials, DEFAULT_API_URL, DEFAULT_USER_AGENT, PASSWORD_ENV, RetryPolicy,
    USERNAME_ENV,
};
pub use error::{ApiError, Result};
pub use source::ArticleSource;
