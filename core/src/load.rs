//! Reading a document collection from JSON / JSONL files on disk.

use crate::collection::DocumentCollection;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct InputDoc {
    id: Value,
    #[serde(alias = "body")]
    text: String,
}

/// Load documents from a `.json`/`.jsonl` file, or from every such file under a directory.
///
/// Files under a directory are read in sorted path order so the collection
/// order (and with it ranking tie-breaks) is reproducible. Symlinks are
/// followed; any entry the walk cannot read fails the load.
pub fn load_documents<P: AsRef<Path>>(path: P) -> Result<DocumentCollection<String>> {
    let path = path.as_ref();
    let mut files: Vec<PathBuf> = Vec::new();
    if path.is_dir() {
        for entry in WalkDir::new(path).follow_links(true).sort_by_file_name() {
            let entry = entry.with_context(|| format!("walking {}", path.display()))?;
            let p = entry.path();
            if p.is_file() && is_document_file(p) {
                files.push(p.to_path_buf());
            }
        }
    } else if path.is_file() {
        files.push(path.to_path_buf());
    } else {
        bail!("input path {} does not exist", path.display());
    }

    let mut docs = DocumentCollection::new();
    for file in files {
        if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            load_jsonl(&file, &mut docs)?;
        } else {
            load_json(&file, &mut docs)?;
        }
    }
    tracing::info!(num_docs = docs.len(), path = %path.display(), "loaded documents");
    Ok(docs)
}

fn is_document_file(p: &Path) -> bool {
    matches!(p.extension().and_then(|s| s.to_str()), Some("json" | "jsonl"))
}

fn load_jsonl(file: &Path, docs: &mut DocumentCollection<String>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let doc: InputDoc = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}: invalid document", file.display(), lineno + 1))?;
        add(docs, doc.id, doc.text)?;
    }
    Ok(())
}

fn load_json(file: &Path, docs: &mut DocumentCollection<String>) -> Result<()> {
    let f = File::open(file).with_context(|| format!("opening {}", file.display()))?;
    let reader = BufReader::new(f);
    let json: Value = serde_json::from_reader(reader).with_context(|| format!("parsing {}", file.display()))?;
    match json {
        Value::Array(arr) => {
            for (i, v) in arr.into_iter().enumerate() {
                let doc: InputDoc = serde_json::from_value(v)
                    .with_context(|| format!("{}[{i}]: invalid document", file.display()))?;
                add(docs, doc.id, doc.text)?;
            }
        }
        Value::Object(obj) if obj.contains_key("id") => {
            let doc: InputDoc = serde_json::from_value(Value::Object(obj))
                .with_context(|| format!("{}: invalid document", file.display()))?;
            add(docs, doc.id, doc.text)?;
        }
        Value::Object(obj) => {
            // plain {"<id>": "<text>"} map
            for (id, text) in obj {
                match text {
                    Value::String(text) => docs.insert(id, text)?,
                    other => bail!("{}: document {id} is not a string: {other}", file.display()),
                }
            }
        }
        _ => bail!("{}: expected an array or object of documents", file.display()),
    }
    Ok(())
}

fn add(docs: &mut DocumentCollection<String>, id: Value, text: String) -> Result<()> {
    let id = match id {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        other => bail!("document id must be a string or number, got {other}"),
    };
    docs.insert(id, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn loads_jsonl_with_numeric_ids_and_body_alias() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("docs.jsonl");
        fs::write(&file, "{\"id\": 1, \"text\": \"first\"}\n\n{\"id\": \"b\", \"body\": \"second\"}\n").unwrap();
        let docs = load_documents(&file).unwrap();
        let ids: Vec<&String> = docs.ids().collect();
        assert_eq!(ids, vec!["1", "b"]);
        assert_eq!(docs.get(&"b".to_string()).unwrap().text, "second");
    }

    #[test]
    fn loads_plain_id_to_text_map() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("docs.json");
        fs::write(&file, r#"{"2": "beta", "1": "alpha"}"#).unwrap();
        let docs = load_documents(&file).unwrap();
        assert_eq!(docs.len(), 2);
        assert_eq!(docs.get(&"1".to_string()).unwrap().text, "alpha");
    }

    #[test]
    fn walks_directories_in_path_order_and_rejects_duplicates() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("b.json"), r#"[{"id": "y", "text": "two"}]"#).unwrap();
        fs::write(dir.path().join("a.jsonl"), "{\"id\": \"x\", \"text\": \"one\"}\n").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let docs = load_documents(dir.path()).unwrap();
        let ids: Vec<&String> = docs.ids().collect();
        assert_eq!(ids, vec!["x", "y"]);

        fs::write(dir.path().join("c.json"), r#"{"id": "x", "text": "again"}"#).unwrap();
        let err = load_documents(dir.path()).unwrap_err();
        assert!(err.to_string().contains("duplicate document id x"));
    }

    #[test]
    fn invalid_array_entry_names_the_file() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("broken.json");
        fs::write(&file, r#"[{"id": "a", "text": "ok"}, {"id": "b"}]"#).unwrap();
        let err = load_documents(&file).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("broken.json[1]: invalid document"), "{msg}");

        fs::write(&file, r#"{"id": "solo", "text": 7}"#).unwrap();
        let msg = format!("{:#}", load_documents(&file).unwrap_err());
        assert!(msg.contains("broken.json: invalid document"), "{msg}");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_entries_fail_the_load() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("a.json"), r#"[{"id": "x", "text": "one"}]"#).unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("loop")).unwrap();
        let err = load_documents(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains("walking"));
    }

    #[test]
    fn missing_path_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(load_documents(dir.path().join("nope.json")).is_err());
    }
}
