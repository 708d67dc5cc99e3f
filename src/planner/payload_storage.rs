use std::{
    cell::RefCell,
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use tracing::{debug, trace};

use crate::fs::operations::{read_if_exists, remove_if_exists, with_file_lock, write_atomically};

use super::entities::PlannerPayload;

pub const PAYLOAD_FILE_NAME: &str = "planner.v1.json";

/// Interface for abstracting where the planner payload lives. Writes always replace the whole
/// payload.
#[cfg_attr(test, mockall::automock)]
pub trait PayloadStorage {
    /// Returns `Ok(None)` when nothing was stored yet. An `Err` means the stored state exists but
    /// is unreadable.
    fn load(&self) -> Result<Option<PlannerPayload>>;

    fn save(&self, payload: &PlannerPayload) -> Result<()>;

    /// Erases the stored payload entirely.
    fn clear(&self) -> Result<()>;
}

impl<T: Deref> PayloadStorage for T
where
    T::Target: PayloadStorage,
{
    fn load(&self) -> Result<Option<PlannerPayload>> {
        self.deref().load()
    }

    fn save(&self, payload: &PlannerPayload) -> Result<()> {
        self.deref().save(payload)
    }

    fn clear(&self) -> Result<()> {
        self.deref().clear()
    }
}

fn parse_payload(raw: &str) -> Result<PlannerPayload> {
    serde_json::from_str(raw).context("Stored planner payload is malformed")
}

/// Keeps the payload as a single JSON file on the local disk.
pub struct FilePayloadStorage {
    path: PathBuf,
    lock_path: PathBuf,
}

impl FilePayloadStorage {
    pub fn new(path: PathBuf) -> Self {
        let lock_path = path.with_extension("lock");
        Self { path, lock_path }
    }

    /// Storage for the default payload file inside an application directory.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(PAYLOAD_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PayloadStorage for FilePayloadStorage {
    fn load(&self) -> Result<Option<PlannerPayload>> {
        let raw = with_file_lock(&self.lock_path, false, || {
            read_if_exists(&self.path)
                .with_context(|| format!("Failed to read payload {:?}", self.path))
        })?;
        match raw {
            Some(raw) => {
                debug!("Loaded payload from {:?}", self.path);
                parse_payload(&raw).map(Some)
            }
            None => Ok(None),
        }
    }

    fn save(&self, payload: &PlannerPayload) -> Result<()> {
        let contents = serde_json::to_vec_pretty(payload)?;
        with_file_lock(&self.lock_path, true, || {
            write_atomically(&self.path, &contents)
        })?;
        trace!("Saved payload into {:?}", self.path);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        with_file_lock(&self.lock_path, true, || {
            remove_if_exists(&self.path)
                .with_context(|| format!("Failed to remove payload {:?}", self.path))
        })
    }
}

/// Holds the raw JSON text in memory. Useful for embedding and for feeding hand written payloads
/// into the store.
#[derive(Default)]
pub struct MemoryPayloadStorage {
    raw: RefCell<Option<String>>,
}

impl MemoryPayloadStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RefCell::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.raw.borrow().clone()
    }

    /// Overwrites the stored text without any validation.
    pub fn set_raw(&self, raw: impl Into<String>) {
        *self.raw.borrow_mut() = Some(raw.into());
    }
}

impl PayloadStorage for MemoryPayloadStorage {
    fn load(&self) -> Result<Option<PlannerPayload>> {
        self.raw.borrow().as_deref().map(parse_payload).transpose()
    }

    fn save(&self, payload: &PlannerPayload) -> Result<()> {
        *self.raw.borrow_mut() = Some(serde_json::to_string(payload)?);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.raw.borrow_mut() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use anyhow::Result;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    use crate::planner::{
        catalog::Mode,
        entities::{DayRecord, PlannerPayload, Settings, TodayEntity},
        history::HistoryArchive,
    };

    use super::{FilePayloadStorage, MemoryPayloadStorage, PayloadStorage};

    fn sample_payload() -> PlannerPayload {
        let date = NaiveDate::from_ymd_opt(2025, 10, 27).unwrap();
        let mut history = HistoryArchive::default();
        history.archive(date, DayRecord::new(3, 14));
        PlannerPayload::new(
            Settings {
                mode: Mode::Lite,
                ..Settings::default()
            },
            history,
            Some(TodayEntity {
                date: date.succ_opt().unwrap(),
                done_map: [(1, true)].into_iter().collect(),
            }),
        )
    }

    #[test]
    fn test_file_storage_round_trip() -> Result<()> {
        let dir = tempdir()?;
        let storage = FilePayloadStorage::in_dir(dir.path());
        assert_eq!(storage.load()?, None);

        storage.save(&sample_payload())?;
        assert_eq!(storage.load()?, Some(sample_payload()));

        storage.clear()?;
        assert_eq!(storage.load()?, None);
        Ok(())
    }

    #[test]
    fn test_file_storage_malformed_payload_is_error() -> Result<()> {
        let dir = tempdir()?;
        let storage = FilePayloadStorage::in_dir(dir.path());
        std::fs::write(storage.path(), "{ not json")?;
        assert!(storage.load().is_err());
        Ok(())
    }

    #[test]
    fn test_memory_storage_through_shared_handle() -> Result<()> {
        let storage = Rc::new(MemoryPayloadStorage::new());
        let handle = storage.clone();

        storage.save(&sample_payload())?;
        assert_eq!(handle.load()?, Some(sample_payload()));
        assert!(handle.raw().is_some_and(|raw| raw.contains("\"doneMap\"")));
        Ok(())
    }

    #[test]
    fn test_memory_storage_invalid_json() {
        let storage = MemoryPayloadStorage::with_raw("definitely not json");
        assert!(storage.load().is_err());
    }
}
