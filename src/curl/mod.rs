//! cURL command import and export.
//!
//! [`parse_curl`] turns a pasted `curl` command into an [`HttpRequest`];
//! [`generate_curl`] goes the other way for a resolved request.
//!
//! # Supported cURL Flags
//!
//! - `-X`, `--request` (also glued, as in `-XPUT`) - HTTP method
//! - `-H`, `--header` - request header, `Name: value`
//! - `-d`, `--data`, `--data-ascii`, `--data-raw`, `--data-binary` - body;
//!   repeated data is joined with `&`, and a GET/HEAD becomes a POST with a
//!   form content type unless one is set
//! - `-u`, `--user` - `Authorization: Basic` of the whole token
//! - `-A`, `--user-agent` - `User-Agent` header
//! - `-b`, `--cookie` - `Set-Cookie` header
//! - `-I`, `--head` - HEAD method
//! - `--compressed` - `Accept-Encoding: deflate, gzip` unless already set
//!
//! Any other flag is ignored. Commands copied from bash, PowerShell and CMD
//! are accepted, including their line continuations.
//!
//! [`HttpRequest`]: crate::models::HttpRequest

pub mod generator;
pub mod parser;

pub use generator::generate_curl;
pub use parser::{
    is_curl_command, normalize_curl_text, parse_curl, reduce, rewrite, CurlState, ParseError,
    PartialRequest,
};
