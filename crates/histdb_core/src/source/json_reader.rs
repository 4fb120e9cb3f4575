//! JSON-encoded histogram trees.
//!
//! A source file holds `{"entries": [...]}` where each entry is either
//! `{"kind": "dir", "name": .., "entries": [..]}` or
//! `{"kind": "hist", "name": .., "edges": [..], "contents": [..], "errors": [..]}`.

use super::{SourceError, SourceReader, SourceResult};
use crate::model::tree::SourceTree;
use log::debug;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// File extension handled by [`JsonSourceReader`].
pub const JSON_EXTENSION: &str = "json";

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSourceReader;

impl SourceReader for JsonSourceReader {
    fn open(&self, path: &Path) -> SourceResult<SourceTree> {
        let file = File::open(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let tree: SourceTree =
            serde_json::from_reader(BufReader::new(file)).map_err(|err| {
                SourceError::Corrupt {
                    path: path.to_path_buf(),
                    message: err.to_string(),
                }
            })?;

        debug!(
            "event=source_open module=source status=ok path={} entries={}",
            path.display(),
            tree.entries.len()
        );
        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::JsonSourceReader;
    use crate::model::tree::SourceNode;
    use crate::source::{SourceError, SourceReader};

    #[test]
    fn open_parses_nested_tree() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run1.json");
        std::fs::write(
            &path,
            r#"{"entries":[
                {"kind":"hist","name":"N","edges":[0,1],"contents":[0,10,0]},
                {"kind":"dir","name":"cat","entries":[
                    {"kind":"hist","name":"sig_bkg","edges":[0,1,2],"contents":[0,1,2,0]}
                ]}
            ]}"#,
        )
        .unwrap();

        let tree = JsonSourceReader.open(&path).unwrap();
        assert_eq!(tree.entries.len(), 2);
        assert!(matches!(&tree.entries[1], SourceNode::SubTree { name, .. } if name == "cat"));
    }

    #[test]
    fn open_reports_missing_file_as_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonSourceReader
            .open(&dir.path().join("absent.json"))
            .unwrap_err();
        assert!(matches!(err, SourceError::Io { .. }));
    }

    #[test]
    fn open_reports_garbage_as_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{\"entries\": [ {\"kind\": \"blob\"} ]}").unwrap();

        let err = JsonSourceReader.open(&path).unwrap_err();
        assert!(matches!(err, SourceError::Corrupt { .. }));
        assert!(err.to_string().contains("broken.json"));
    }
}
