//! Row readers for the authored CSV sheets, and the media asset store.

use std::io::Read;
use std::path::{Path, PathBuf};

use csv::ReaderBuilder;

use crate::error::{BuildError, Result};

/// One positional record of a sheet.
pub type Row = Vec<String>;

/// A sheet whose header row carries meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Row,
    pub rows: Vec<Row>,
}

/// Read a sheet, dropping the first `skip` rows (headers).
pub fn read_rows(path: &Path, skip: usize) -> Result<Vec<Row>> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|source| BuildError::Source {
            path: path.to_path_buf(),
            source,
        })?;
    collect_rows(reader, path, skip)
}

/// Read a sheet from any reader; `name` is only used in errors.
pub fn read_rows_from<R: Read>(input: R, name: &str, skip: usize) -> Result<Vec<Row>> {
    let reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);
    collect_rows(reader, Path::new(name), skip)
}

/// Read a sheet keeping its header row.
pub fn read_table(path: &Path) -> Result<Table> {
    let mut rows = read_rows(path, 0)?.into_iter();
    let header = rows.next().unwrap_or_default();
    Ok(Table {
        header,
        rows: rows.collect(),
    })
}

fn collect_rows<R: Read>(mut reader: csv::Reader<R>, path: &Path, skip: usize) -> Result<Vec<Row>> {
    let mut rows = Vec::new();
    for record in reader.records().skip(skip) {
        let record = record.map_err(|source| BuildError::Source {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// URL prefix under which the app serves images.
pub const MEDIA_URL_PREFIX: &str = "./images";

/// The directory of images pages may reference.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
    verify: bool,
}

impl MediaStore {
    /// A store that checks every referenced asset exists under `root`.
    pub fn new(root: impl Into<PathBuf>, verify: bool) -> Self {
        Self {
            root: root.into(),
            verify,
        }
    }

    /// A store that accepts every reference without touching the disk.
    pub fn unchecked() -> Self {
        Self::new(PathBuf::new(), false)
    }

    /// Resolve an authored asset name to the URL the app loads.
    ///
    /// Blank names resolve to `None`. A name missing from the store is an
    /// authoring defect.
    pub fn resolve(&self, name: &str) -> Result<Option<String>> {
        let name = name.trim().to_lowercase();
        if name.is_empty() {
            return Ok(None);
        }

        if self.verify && !self.root.join(&name).exists() {
            return Err(BuildError::MissingMedia {
                name,
                root: self.root.clone(),
            });
        }

        Ok(Some(format!("{}/{}", MEDIA_URL_PREFIX, name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows_skips_header() {
        let csv = "domain,label\nFinances,Rent\n\"Mental Health\",\"Quote, with comma\"\n";
        let rows = read_rows_from(csv.as_bytes(), "inline", 1).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["Finances", "Rent"]);
        assert_eq!(rows[1][1], "Quote, with comma");
    }

    #[test]
    fn test_read_rows_allows_ragged_rows() {
        let csv = "a,b,c\n1\n1,2,3,4\n";
        let rows = read_rows_from(csv.as_bytes(), "inline", 1).unwrap();
        assert_eq!(rows[0].len(), 1);
        assert_eq!(rows[1].len(), 4);
    }

    #[test]
    fn test_unchecked_media() {
        let store = MediaStore::unchecked();
        assert_eq!(
            store.resolve(" Park.JPG ").unwrap(),
            Some("./images/park.jpg".to_string())
        );
        assert_eq!(store.resolve("").unwrap(), None);
    }

    #[test]
    fn test_missing_media_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("present.png"), b"png").unwrap();
        let store = MediaStore::new(dir.path(), true);

        assert!(store.resolve("present.png").unwrap().is_some());
        assert!(matches!(
            store.resolve("absent.png"),
            Err(BuildError::MissingMedia { .. })
        ));
    }
}
