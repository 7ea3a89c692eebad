//! Storage collaborators for record stores
//!
//! A store hands its whole collection to the collaborator after every
//! mutation; the collaborator overwrites what it persisted before. There is
//! no append or patch path.

use crate::records::Record;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cell::{Cell, RefCell};
use std::fs;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::debug;

/// Persistence contract used by [`RecordStore`](crate::store::RecordStore)
pub trait RecordStorage<R: Record> {
    /// Read the full ordered collection
    fn load(&self) -> Result<Vec<R>>;

    /// Overwrite the persisted collection with `records`
    fn save(&self, records: &[R]) -> Result<()>;

    /// Short description of the backing medium for log lines
    fn describe(&self) -> String;
}

/// On-disk layout of the store files
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreFormat {
    #[default]
    Json,
    /// One header row plus one row per record, as earlier league exports
    Csv,
}

impl StoreFormat {
    /// File extension used for default store file names
    pub fn extension(self) -> &'static str {
        match self {
            StoreFormat::Json => "json",
            StoreFormat::Csv => "csv",
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Move a fully written temp file over `path`
fn replace_with_temp(temp_path: &Path, path: &Path) -> Result<()> {
    if let Err(e) = fs::rename(temp_path, path) {
        let _ = fs::remove_file(temp_path);
        return Err(Error::Io(e));
    }
    Ok(())
}

/// One pretty-printed JSON array per store
///
/// Writes go to `<file>.tmp` first and are renamed over the target, so a
/// reader never sees a half-written collection.
#[derive(Debug, Clone)]
pub struct JsonFileStorage<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> JsonFileStorage<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

}

impl<R: Record> RecordStorage<R> for JsonFileStorage<R> {
    fn load(&self) -> Result<Vec<R>> {
        let content = fs::read_to_string(&self.path)?;
        let records: Vec<R> = serde_json::from_str(&content)?;
        debug!(
            "Loaded {} {} records from {}",
            records.len(),
            R::KIND,
            self.path.display()
        );
        Ok(records)
    }

    fn save(&self, records: &[R]) -> Result<()> {
        let json = serde_json::to_string_pretty(records)?;
        let temp_path = temp_path_for(&self.path);

        fs::write(&temp_path, json)?;
        replace_with_temp(&temp_path, &self.path)?;

        debug!(
            "Saved {} {} records to {}",
            records.len(),
            R::KIND,
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// One CSV file per store with a header row
///
/// Columns are matched by header name on load, so column order in the file
/// does not matter and extra columns are ignored. Short rows are padded with
/// empty values. Writes use the same temp-then-rename step as
/// [`JsonFileStorage`].
#[derive(Debug, Clone)]
pub struct CsvFileStorage<R> {
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R> CsvFileStorage<R> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl<R: Record> RecordStorage<R> for CsvFileStorage<R> {
    fn load(&self) -> Result<Vec<R>> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.clone();
        let columns = R::CSV_HEADERS
            .iter()
            .map(|&column| {
                headers
                    .iter()
                    .position(|h| h == column)
                    .ok_or_else(|| Error::MissingColumn {
                        column,
                        file: self.path.display().to_string(),
                    })
            })
            .collect::<Result<Vec<usize>>>()?;

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row?;
            let fields = columns
                .iter()
                .map(|&i| row.get(i).unwrap_or_default().to_string())
                .collect();
            records.push(R::from_csv_fields(fields));
        }

        debug!(
            "Loaded {} {} records from {}",
            records.len(),
            R::KIND,
            self.path.display()
        );
        Ok(records)
    }

    fn save(&self, records: &[R]) -> Result<()> {
        let temp_path = temp_path_for(&self.path);
        {
            let mut writer = csv::Writer::from_path(&temp_path)?;
            writer.write_record(R::CSV_HEADERS)?;
            for record in records {
                writer.write_record(record.csv_fields())?;
            }
            writer.flush()?;
        }
        replace_with_temp(&temp_path, &self.path)?;

        debug!(
            "Saved {} {} records to {}",
            records.len(),
            R::KIND,
            self.path.display()
        );
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// File-backed storage in either [`StoreFormat`]
#[derive(Debug, Clone)]
pub enum FileStorage<R> {
    Json(JsonFileStorage<R>),
    Csv(CsvFileStorage<R>),
}

impl<R> FileStorage<R> {
    pub fn new(format: StoreFormat, path: impl Into<PathBuf>) -> Self {
        match format {
            StoreFormat::Json => FileStorage::Json(JsonFileStorage::new(path)),
            StoreFormat::Csv => FileStorage::Csv(CsvFileStorage::new(path)),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            FileStorage::Json(storage) => storage.path(),
            FileStorage::Csv(storage) => storage.path(),
        }
    }
}

impl<R: Record> RecordStorage<R> for FileStorage<R> {
    fn load(&self) -> Result<Vec<R>> {
        match self {
            FileStorage::Json(storage) => storage.load(),
            FileStorage::Csv(storage) => storage.load(),
        }
    }

    fn save(&self, records: &[R]) -> Result<()> {
        match self {
            FileStorage::Json(storage) => storage.save(records),
            FileStorage::Csv(storage) => storage.save(records),
        }
    }

    fn describe(&self) -> String {
        match self {
            FileStorage::Json(storage) => storage.describe(),
            FileStorage::Csv(storage) => storage.describe(),
        }
    }
}

/// In-process storage, mainly for tests and scratch leagues
///
/// Clones share the same backing collection, so a test can keep a handle
/// and inspect what the store persisted. [`MemoryStorage::fail_writes`]
/// makes every subsequent `save` fail.
#[derive(Debug)]
pub struct MemoryStorage<R> {
    records: Rc<RefCell<Vec<R>>>,
    fail_writes: Rc<Cell<bool>>,
}

impl<R> Clone for MemoryStorage<R> {
    fn clone(&self) -> Self {
        Self {
            records: Rc::clone(&self.records),
            fail_writes: Rc::clone(&self.fail_writes),
        }
    }
}

impl<R: Clone> Default for MemoryStorage<R> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<R: Clone> MemoryStorage<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self {
            records: Rc::new(RefCell::new(records)),
            fail_writes: Rc::new(Cell::new(false)),
        }
    }

    /// Snapshot of the last persisted collection
    pub fn persisted(&self) -> Vec<R> {
        self.records.borrow().clone()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.set(fail);
    }
}

impl<R: Record> RecordStorage<R> for MemoryStorage<R> {
    fn load(&self) -> Result<Vec<R>> {
        Ok(self.records.borrow().clone())
    }

    fn save(&self, records: &[R]) -> Result<()> {
        if self.fail_writes.get() {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "memory storage is refusing writes",
            )));
        }
        *self.records.borrow_mut() = records.to_vec();
        Ok(())
    }

    fn describe(&self) -> String {
        format!("memory ({} {} records)", self.records.borrow().len(), R::KIND)
    }
}
