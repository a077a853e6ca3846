use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::error::BrikError;
use crate::ir::Document;

use super::Emitter;

const INDENT: &[u8] = b"    ";

pub struct JsonEmitter {
    pretty: bool,
}

impl Emitter for JsonEmitter {
    fn emit(&self, document: &Document) -> Result<Vec<u8>, BrikError> {
        let mut out = Vec::new();

        if self.pretty {
            let mut serializer =
                Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
            document.serialize(&mut serializer)?;
        } else {
            serde_json::to_writer(&mut out, document)?;
        }

        out.push(b'\n');
        Ok(out)
    }
}

impl JsonEmitter {
    pub fn pretty() -> Self {
        Self { pretty: true }
    }

    pub fn compact() -> Self {
        Self { pretty: false }
    }
}
