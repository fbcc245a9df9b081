//! Request templating core for the CyberAPI desktop client
//!
//! This crate holds the platform-independent logic behind API requests
//! edited in a collection: it resolves template functions embedded in request
//! text just before dispatch, and imports/exports requests as cURL commands.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - **models**: Core data structures for HTTP requests and responses
//! - **functions**: Placeholder scanning, function chain evaluation and substitution
//! - **environment**: Environments, variables and the variable store capability
//! - **history**: Latest response per request, read by `get`
//! - **host**: Filesystem, file picker and clock capabilities
//! - **curl**: cURL import and export
//! - **config**: Engine settings
//!
//! # Template Functions
//!
//! A placeholder `{{fn1.fn2(arg1, arg2)}}` is replaced by the result of
//! `fn1(fn2(arg1, arg2))`:
//!
//! ```text
//! POST https://{{env(host)}}/login?ts={{ts()}}
//! X-Sign: {{md5.env(secret)}}
//!
//! {"avatar": "{{b64.rf(avatar.png, desktop)}}", "token": "{{get(login, data.token)}}"}
//! ```
//!
//! The host application supplies its storage and platform through the
//! [`environment::VariableStore`], [`history::ResponseStore`],
//! [`host::FileSystem`], [`host::FilePicker`] and [`host::Clock`] traits and
//! hands them to a [`functions::Evaluator`].
//!
//! # Logging
//!
//! The crate logs through the `log` facade and installs no logger.

pub mod config;
pub mod curl;
pub mod environment;
pub mod functions;
pub mod history;
pub mod host;
pub mod models;

pub use curl::{generate_curl, parse_curl};
pub use functions::{replace_functions, resolve_request, scan_placeholders, Evaluator, FnError};
pub use models::{HttpMethod, HttpRequest, HttpResponse, KvParam};
