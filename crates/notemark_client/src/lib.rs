//! # notemark client
//!
//! Remote API client and retrying transport for notemark.
//!
//! This crate provides:
//! - [`Credentials`] loading from the environment
//! - [`ApiError`] with a retryability classification
//! - [`RetryPolicy`] and [`with_retry`]: exponential backoff with jitter,
//!   a bounded attempt count and elapsed budget, honoring server-specified
//!   retry delays
//! - The [`RemoteApi`] trait abstracting the remote surface, with a
//!   reqwest-backed [`HttpRemote`] and a scripted [`MockRemote`]
//! - [`fetch_all_blocks`]: recursive block-tree retrieval that downgrades
//!   per-block child-listing failures to empty children

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod blocks;
mod config;
mod error;
mod http;
mod remote;
mod retry;
mod types;

pub use blocks::fetch_all_blocks;
pub use config::{mask_token, Credentials, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use http::HttpRemote;
pub use remote::{MockRemote, RemoteApi};
pub use retry::{with_retry, RetryPolicy};
pub use types::{DatabaseObject, PageObject, Paginated, SearchResult};
