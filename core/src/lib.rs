//! Core language definition for Iris
//!
//! This crate contains the value model, the environment, the reader and
//! the evaluator. It registers no natives besides the quote macro the
//! reader depends on; the standard library and the command-line shell are
//! in the `iris-runtime` crate.

pub mod dict;
pub mod error;
pub mod interpreter;
pub mod native;
pub mod reader;
pub mod seq;
pub mod text;
pub mod value;

// Re-export commonly used items for convenience
pub use dict::{Dict, Key};
pub use error::{ErrorKind, ErrorValue};
pub use interpreter::{Context, DEFAULT_ARG_LIMIT, DEFAULT_DEPTH_LIMIT, Limits};
pub use reader::{read, read_str};
pub use seq::Seq;
pub use text::Text;
pub use value::{CallKind, Callable, Float, Int, Kind, NativeFn, Value};
