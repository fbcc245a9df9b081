//! Data models for HTTP requests and responses.
//!
//! This module contains the request and response structures shared by the
//! template engine, the cURL importer and the stores.

pub mod request;
pub mod response;

pub use request::{content_type, Cookie, HttpMethod, HttpRequest, KvParam};
pub use response::{is_json, HttpResponse, ResponseBody};
