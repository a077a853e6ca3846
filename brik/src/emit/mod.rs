pub mod json;

use crate::error::BrikError;
use crate::ir::Document;

pub trait Emitter {
    fn emit(&self, document: &Document) -> Result<Vec<u8>, BrikError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    JsonCompact,
}

impl Format {
    pub fn all() -> Vec<Self> {
        vec![Self::Json, Self::JsonCompact]
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().into_iter().find(|format| format.name() == name)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::JsonCompact => "json-compact",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Json => "JSON indented with four spaces",
            Self::JsonCompact => "JSON on a single line",
        }
    }

    pub fn create(&self) -> Box<dyn Emitter> {
        match self {
            Self::Json => Box::new(json::JsonEmitter::pretty()),
            Self::JsonCompact => Box::new(json::JsonEmitter::compact()),
        }
    }
}
