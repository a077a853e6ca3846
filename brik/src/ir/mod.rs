pub mod value;

pub use value::{Document, Number, Table, Value};
