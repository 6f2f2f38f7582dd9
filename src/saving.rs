use bincode::{deserialize_from, serialize_into};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use log::info;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use crate::cell::{CellContent, CellKey};
use crate::error::Result;
use crate::layout::{ColumnSize, RowSize};
use crate::persistence::{GridDocument, Persistence};

/// Writes a grid document as bincode inside a gzip stream.
pub fn save_document(document: &GridDocument, path: impl AsRef<Path>) -> Result<()> {
    let file = File::create(path)?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut writer = BufWriter::new(encoder);

    serialize_into(&mut writer, document)?;
    let encoder = writer.into_inner().map_err(|e| e.into_error())?;
    encoder.finish()?;
    Ok(())
}

pub fn load_document(path: impl AsRef<Path>) -> Result<GridDocument> {
    let file = File::open(path)?;
    let decoder = GzDecoder::new(file);
    let mut reader = BufReader::new(decoder);

    let document: GridDocument = deserialize_from(&mut reader)?;
    Ok(document)
}

/// One `<grid_id>.bin.gz` file per grid under a directory. Every write
/// rewrites the whole file.
#[derive(Clone, Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(FileStore { dir })
    }

    pub fn path_for(&self, grid_id: &str) -> PathBuf {
        self.dir.join(format!("{grid_id}.bin.gz"))
    }

    fn modify<F>(&self, grid_id: &str, f: F) -> Result<()>
    where
        F: FnOnce(&mut GridDocument),
    {
        let path = self.path_for(grid_id);
        let mut document = if path.exists() {
            load_document(&path)?
        } else {
            GridDocument::new("")
        };
        f(&mut document);
        save_document(&document, &path)
    }
}

impl Persistence for FileStore {
    fn load(&mut self, grid_id: &str) -> Result<Option<GridDocument>> {
        let path = self.path_for(grid_id);
        if !path.exists() {
            return Ok(None);
        }
        let document = load_document(&path)?;
        info!("loaded {} cells from {}", document.cells.len(), path.display());
        Ok(Some(document))
    }

    fn save_cell(&mut self, grid_id: &str, key: CellKey, content: &CellContent) -> Result<()> {
        self.modify(grid_id, |doc| doc.upsert_cell(key, content))
    }

    fn save_layout(&mut self, grid_id: &str, columns: &[ColumnSize], rows: &[RowSize]) -> Result<()> {
        self.modify(grid_id, |doc| {
            doc.column_sizes = columns.to_vec();
            doc.row_sizes = rows.to_vec();
            doc.updated_at = chrono::Utc::now();
        })
    }

    fn rename(&mut self, grid_id: &str, title: &str) -> Result<()> {
        self.modify(grid_id, |doc| {
            doc.title = title.to_string();
            doc.updated_at = chrono::Utc::now();
        })
    }
}
