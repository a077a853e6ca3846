//! File-system collaborators around the parser. The parser itself only ever
//! sees text and hands back a [`Document`].

use std::fs;
use std::io;
use std::path::Path;

use crate::emit::Format;
use crate::error::BrikError;
use crate::ir::Document;

pub fn load_source(path: impl AsRef<Path>) -> Result<String, BrikError> {
    let path = path.as_ref();

    match fs::read_to_string(path) {
        Ok(source) => {
            tracing::info!(path = %path.display(), bytes = source.len(), "loaded source");
            Ok(source)
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => Err(BrikError::SourceNotFound {
            path: path.display().to_string(),
        }),
        Err(err) => Err(err.into()),
    }
}

/// Serializes `document` in `format` and writes it to `path`, returning the
/// number of bytes written.
pub fn emit_document(
    document: &Document,
    format: Format,
    path: impl AsRef<Path>,
) -> Result<usize, BrikError> {
    let path = path.as_ref();
    let output = format.create().emit(document)?;

    fs::write(path, &output)?;
    tracing::info!(path = %path.display(), format = format.name(), bytes = output.len(), "wrote document");

    Ok(output.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Value;

    #[test]
    fn test_load_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tetris.brik");

        match load_source(&path) {
            Err(BrikError::SourceNotFound { path: reported }) => {
                assert!(reported.ends_with("tetris.brik"));
            }
            other => panic!("expected missing source, got {:?}", other),
        }
    }

    #[test]
    fn test_load_existing_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tetris.brik");
        fs::write(&path, "name = \"Tetromino\"\n").unwrap();

        assert_eq!(load_source(&path).unwrap(), "name = \"Tetromino\"\n");
    }

    #[test]
    fn test_emit_document_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("arbol.ast");
        let mut document = Document::new();
        document.insert("name", Value::from("Tetromino"));

        let written = emit_document(&document, Format::JsonCompact, &path).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "{\"name\":\"Tetromino\"}\n");
        assert_eq!(written, contents.len());
    }

    #[test]
    fn test_emit_document_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("arbol.ast");

        let result = emit_document(&Document::new(), Format::Json, &path);

        assert!(matches!(result, Err(BrikError::IoError { .. })));
    }
}
