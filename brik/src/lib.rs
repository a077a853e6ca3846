//! Reader for BRIK, a small declarative configuration language of
//! assignments, nested blocks and lists that may reference earlier
//! top-level names.
//!
//! ```text
//! # tetris.brik
//! name = "Tetromino"
//! piece = { width = 4 height = 2 }
//! pieces = [piece, "L"]
//! ```

pub mod driver;
pub mod emit;
pub mod error;
pub mod ir;
pub mod options;
pub mod parser;
pub mod span;

pub use error::BrikError;
pub use ir::{Document, Number, Table, Value};
pub use options::ParseOptions;
