//! Inventory imports
//!
//! Media servers we do not talk to directly (Plex, DLNA boxes) can
//! export their library as CSV or JSON; this module turns such an
//! export into movie inputs. Malformed rows are skipped individually
//! with a warning, never failing the whole import.

use crate::models::{MovieInput, Source};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

/// One CSV row of an inventory export
#[derive(Debug, Deserialize)]
struct InventoryRecord {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    library: Option<String>,
    title: String,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    file: Option<String>,
    #[serde(default)]
    file_size_bytes: Option<u64>,
    #[serde(default)]
    imdb_id: Option<String>,
}

impl From<InventoryRecord> for MovieInput {
    fn from(record: InventoryRecord) -> Self {
        let source = record
            .source
            .as_deref()
            .map(|s| s.parse::<Source>().unwrap_or_default())
            .unwrap_or(Source::Other);
        MovieInput {
            source,
            library: record.library.unwrap_or_default(),
            title: record.title,
            year: record.year,
            file: record.file,
            file_size_bytes: record.file_size_bytes,
            imdb_id_hint: record.imdb_id,
        }
    }
}

/// Load an inventory file, dispatching on extension.
pub fn load(path: &Path) -> Result<Vec<MovieInput>> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        other => bail!("unsupported inventory format '{}' (expected .csv or .json)", other),
    }
}

fn load_csv(path: &Path) -> Result<Vec<MovieInput>> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("opening inventory {}", path.display()))?;
    let mut inputs = Vec::new();
    for (line, record) in reader.deserialize::<InventoryRecord>().enumerate() {
        match record {
            Ok(record) if !record.title.trim().is_empty() => inputs.push(record.into()),
            Ok(_) => warn!("skipping inventory row {} with empty title", line + 2),
            Err(e) => warn!("skipping malformed inventory row {}: {}", line + 2, e),
        }
    }
    debug!("imported {} records from {}", inputs.len(), path.display());
    Ok(inputs)
}

fn load_json(path: &Path) -> Result<Vec<MovieInput>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading inventory {}", path.display()))?;
    let inputs: Vec<MovieInput> = serde_json::from_str(&content)
        .with_context(|| format!("parsing inventory {}", path.display()))?;
    Ok(inputs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csv_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plex.csv");
        std::fs::write(
            &path,
            "source,library,title,year,file,file_size_bytes,imdb_id\n\
             plex,Movies,Heat,1995,/media/Heat.mkv,4700000000,tt0113277\n\
             plex,Movies,,1996,/media/blank.mkv,,\n\
             dlna,Attic,Stalker,1979,,,\n",
        )
        .unwrap();

        let inputs = load(&path).unwrap();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].source, Source::Plex);
        assert_eq!(inputs[0].title, "Heat");
        assert_eq!(inputs[0].year, Some(1995));
        assert_eq!(inputs[0].file_size_bytes, Some(4_700_000_000));
        assert_eq!(inputs[0].imdb_id_hint.as_deref(), Some("tt0113277"));
        assert_eq!(inputs[1].source, Source::Dlna);
    }

    #[test]
    fn test_json_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("inventory.json");
        std::fs::write(
            &path,
            r#"[{"source":"plex","library":"Movies","title":"Heat","year":1995}]"#,
        )
        .unwrap();
        let inputs = load(&path).unwrap();
        assert_eq!(inputs.len(), 1);
        assert_eq!(inputs[0].source, Source::Plex);
    }

    #[test]
    fn test_unknown_extension_rejected() {
        assert!(load(Path::new("inventory.xml")).is_err());
    }

    #[test]
    fn test_unknown_source_maps_to_other() {
        let record = InventoryRecord {
            source: Some("kodi".into()),
            library: None,
            title: "Heat".into(),
            year: None,
            file: None,
            file_size_bytes: None,
            imdb_id: None,
        };
        let input: MovieInput = record.into();
        assert_eq!(input.source, Source::Other);
    }
}
