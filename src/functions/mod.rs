//! Template functions.
//!
//! Request text may embed computed values as `{{fn1.fn2(arg, ...)}}`. This
//! module scans such placeholders, evaluates their function chains against the
//! host capabilities and substitutes the results back into the text.
//!
//! Supported functions (aliases in parentheses): `readTextFile` (`rtf`),
//! `readFile` (`rf`), `base64` (`b64`), `openFile` (`of`), `timestamp` (`ts`),
//! `md5`, `sha256`, `get` (`g`), `env` and `random`.

pub mod error;
pub mod evaluator;
pub mod path;
pub mod random;
pub mod scanner;
pub mod substitution;
pub mod value;

pub use error::{FnError, ResolveError};
pub use evaluator::{Evaluator, FunctionName};
pub use path::get_path;
pub use scanner::{scan, scan_placeholders, Argument, PlaceholderMatch, Scan};
pub use substitution::{convert_body, convert_kv_params, replace_functions, resolve_request};
pub use value::Value;
