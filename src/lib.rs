//! A lenient TOML decoder that keeps going after errors.
//!
//! [`decode`] scans a whole document in a single pass, collecting every
//! problem it finds as a positioned [`Diagnostic`] instead of stopping at the
//! first. The returned [`Table`] holds everything that decoded cleanly, so a
//! partially broken config file still yields its good parts.
//!
//! ```
//! let (doc, diagnostics) = toml_lenient::decode(
//!     "[package]\n\
//!      name = \"demo\"\n\
//!      jobs = 1__0\n",
//! );
//!
//! // The malformed `jobs` line is reported, not fatal.
//! assert_eq!(diagnostics.len(), 1);
//!
//! let package = doc.get("package").and_then(|v| v.as_table()).unwrap();
//! assert_eq!(package.get("name").and_then(|v| v.as_str()), Some("demo"));
//! assert!(!package.contains_key("jobs"));
//! ```
//!
//! Positions in diagnostics are zero-based code-point offsets into the
//! source text after `\r\n` is normalized to `\n`.
//!
//! With the `serde` feature, [`Value`], [`Table`], [`Array`], and
//! [`DateTime`] implement `serde::Serialize`.

mod annotate;
mod cursor;
mod error;
mod parser;
mod table;
mod time;
mod value;

#[cfg(feature = "serde")]
mod impl_serde;

pub use annotate::annotate;
pub use error::{Diagnostic, ErrorKind, Severity};
pub use parser::{decode, decode_or_default};
pub use table::Table;
pub use time::{Date, DateTime, Offset, Time};
pub use value::{Array, Value};
