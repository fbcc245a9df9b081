//! Response history used by request chaining.
//!
//! The `get` template function reads values out of the latest response of an
//! earlier request. Responses are looked up through the [`ResponseStore`]
//! capability; [`LatestResponses`] keeps them in memory.
//!
//! # Example
//!
//! ```ignore
//! let history = LatestResponses::new(100);
//! history.add(response);
//! let latest = history.latest_response("login").await;
//! ```

pub mod latest;

pub use latest::LatestResponses;

use crate::models::HttpResponse;
use async_trait::async_trait;

/// Lookup of the most recent response recorded for a request.
#[async_trait]
pub trait ResponseStore: Send + Sync {
    async fn latest_response(&self, request_id: &str) -> Option<HttpResponse>;
}
