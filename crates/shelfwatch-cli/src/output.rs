use std::io::Write;
use std::path::Path;

use anyhow::Context;
use shelfwatch_core::Snapshot;

/// Writes `snapshot` as pretty-printed JSON, replacing any existing file.
///
/// The document is written to a temporary sibling and renamed into place, so
/// readers never observe a partially written file.
pub(crate) fn write_snapshot(path: &Path, snapshot: &Snapshot) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(snapshot).context("serializing snapshot")?;

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("creating temporary file in {}", dir.display()))?;
    tmp.write_all(json.as_bytes())
        .context("writing snapshot to temporary file")?;
    tmp.persist(path)
        .with_context(|| format!("replacing {}", path.display()))?;

    tracing::info!(path = %path.display(), bytes = json.len(), "snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelfwatch_core::{assemble, Demographic};

    fn snapshot(category: &str) -> Snapshot {
        assemble(
            "blinkit",
            category,
            "110001",
            Demographic::new(),
            Vec::new(),
            Vec::new(),
            Vec::new(),
        )
    }

    #[test]
    fn writes_pretty_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        write_snapshot(&path, &snapshot("atta")).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n  \"platform\": \"blinkit\""));
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["category"], "atta");
        assert_eq!(value["data"]["ads"], serde_json::json!([]));
    }

    #[test]
    fn overwrites_without_merging() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        std::fs::write(&path, r#"{"stale": true, "padding": "xxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxxx"}"#)
            .unwrap();

        write_snapshot(&path, &snapshot("rice")).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.get("stale").is_none());
        assert_eq!(value["category"], "rice");
    }

    #[test]
    fn leaves_no_temporary_files_behind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output.json");
        write_snapshot(&path, &snapshot("atta")).unwrap();

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("output.json");
        assert!(write_snapshot(&path, &snapshot("atta")).is_err());
    }
}
