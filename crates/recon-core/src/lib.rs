//! # recon-core
//!
//! Pure-Rust serializer and parser for **RECON (Record Object Notation)**, the
//! relaxed brace-delimited text format used for generated game-data fixtures.
//!
//! RECON represents a tree of records, lists, strings and numbers. Output is
//! tab-indented and deterministic; strings are written bare whenever that is
//! unambiguous and quoted otherwise. A `class` field conventionally tags the
//! logical type of a record, but the format never interprets it.
//!
//! ## Quick start
//!
//! ```rust
//! use recon_core::{parse, serialize};
//!
//! let text = "{\n\tname: Acrobat\n\tfeatures: [\n\t\tDominance from movement\n\t\t\"Speed tricks, better speed\"\n\t]\n\tmeleeRes: 2\n}";
//! let value = parse(text).unwrap();
//! let record = value.as_record().unwrap();
//! assert_eq!(record.get("meleeRes").and_then(|v| v.as_i64()), Some(2));
//!
//! // Value → text → Value
//! assert_eq!(parse(&serialize(&value).unwrap()).unwrap(), value);
//! ```
//!
//! ## Modules
//!
//! - [`encoder`] — `Value` → text (`serialize`, `serialize_compact`)
//! - [`decoder`] — text → `Value` (`parse`)
//! - [`json`] — conversion to and from `serde_json::Value`
//! - [`value`] — the `Value` / `Record` tree
//! - [`error`] — error types for parse and serialize failures

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod json;
pub mod value;

pub use decoder::parse;
pub use encoder::{serialize, serialize_compact, serialize_with, Style};
pub use error::{ReconError, Result};
pub use value::{Kind, Record, Value, CLASS_FIELD};
