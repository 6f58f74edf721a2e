//! [`JsonHistoryStore`], the JSON-file implementation of [`HistoryStore`].

use std::{
  io::ErrorKind,
  path::{Path, PathBuf},
  sync::Arc,
};

use addrval_core::{
  address::AddressInput,
  history::{HistoryRecord, HistoryStore},
  validation::ValidationResult,
};
use tokio::{fs, io::AsyncWriteExt as _, sync::Mutex};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  encode::{decode_log, encode_log},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A bounded validation history kept in a single JSON file.
///
/// Every operation holds an in-process lock for its whole load-modify-write
/// cycle, so clones shared across tasks never interleave. Separate processes
/// pointed at the same file are not coordinated.
///
/// Clones share the file path and the lock.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
  path:             PathBuf,
  max_history_size: usize,
  lock:             Arc<Mutex<()>>,
}

impl JsonHistoryStore {
  /// Open a store at `path` keeping at most `max_history_size` records.
  ///
  /// The parent directory is created if needed; the file itself is not
  /// created until the first write.
  pub async fn open(
    path: impl AsRef<Path>,
    max_history_size: usize,
  ) -> Result<Self> {
    if max_history_size == 0 {
      return Err(Error::ZeroCapacity);
    }

    let path = path.as_ref().to_path_buf();
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      fs::create_dir_all(parent)
        .await
        .map_err(|source| Error::Io { path: parent.to_path_buf(), source })?;
    }

    debug!(path = %path.display(), max_history_size, "opened history store");
    Ok(Self { path, max_history_size, lock: Arc::new(Mutex::new(())) })
  }

  pub fn path(&self) -> &Path { &self.path }

  pub fn max_history_size(&self) -> usize { self.max_history_size }

  fn io_error(&self, source: std::io::Error) -> Error {
    Error::Io { path: self.path.clone(), source }
  }

  /// Read the whole log. A missing file is an empty log.
  async fn load(&self) -> Result<Vec<HistoryRecord>> {
    match fs::read_to_string(&self.path).await {
      Ok(raw) => decode_log(&self.path, &raw),
      Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
      Err(e) => Err(self.io_error(e)),
    }
  }

  /// Sibling file the next log is staged in: the full file name plus `.tmp`.
  fn temp_path(&self) -> PathBuf {
    let mut name = self.path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
  }

  /// Replace the log on disk with `records`.
  ///
  /// The new content is written and synced to a sibling temporary file which
  /// is then renamed over the real one. A failed write removes the temporary
  /// file and leaves the previous log in place.
  async fn persist(&self, records: &[HistoryRecord]) -> Result<()> {
    let encoded = encode_log(records)?;
    let temp_path = self.temp_path();

    if let Err(e) = stage_and_swap(&temp_path, &self.path, &encoded).await {
      if let Err(cleanup) = fs::remove_file(&temp_path).await
        && cleanup.kind() != ErrorKind::NotFound
      {
        warn!(
          path = %temp_path.display(),
          error = %cleanup,
          "failed to remove temporary history file"
        );
      }
      return Err(e);
    }
    Ok(())
  }

  async fn exists(&self) -> Result<bool> {
    fs::try_exists(&self.path).await.map_err(|e| self.io_error(e))
  }

  /// Populate a store that has never been written from the log at `seed`.
  ///
  /// Returns `false` without touching anything when the history file already
  /// exists or `seed` does not. The seed is decoded like a history file, and
  /// only its newest `max_history_size` records are kept.
  pub async fn seed_from(&self, seed: impl AsRef<Path>) -> Result<bool> {
    let seed = seed.as_ref();
    let _guard = self.lock.lock().await;

    if self.exists().await? {
      return Ok(false);
    }
    let raw = match fs::read_to_string(seed).await {
      Ok(raw) => raw,
      Err(e) if e.kind() == ErrorKind::NotFound => {
        debug!(seed = %seed.display(), "no seed history found");
        return Ok(false);
      }
      Err(source) => {
        return Err(Error::Io { path: seed.to_path_buf(), source });
      }
    };

    let mut records = decode_log(seed, &raw)?;
    records.truncate(self.max_history_size);
    self.persist(&records).await?;
    info!(
      seed = %seed.display(),
      held = records.len(),
      "seeded validation history"
    );
    Ok(true)
  }
}

async fn stage_and_swap(
  temp: &Path,
  target: &Path,
  content: &str,
) -> Result<()> {
  let io = |path: &Path| {
    let path = path.to_path_buf();
    move |source: std::io::Error| Error::Io { path, source }
  };

  let mut file = fs::File::create(temp).await.map_err(io(temp))?;
  file.write_all(content.as_bytes()).await.map_err(io(temp))?;
  file.sync_all().await.map_err(io(temp))?;
  drop(file);

  fs::rename(temp, target).await.map_err(io(target))
}

// ─── HistoryStore impl ───────────────────────────────────────────────────────

impl HistoryStore for JsonHistoryStore {
  type Error = Error;

  async fn save(
    &self,
    original_query: String,
    address_input: Option<AddressInput>,
    result: ValidationResult,
  ) -> Result<HistoryRecord> {
    let _guard = self.lock.lock().await;

    let mut history = self.load().await?;
    let record = HistoryRecord::new(original_query, address_input, result);
    history.insert(0, record.clone());

    let evicted = history.len().saturating_sub(self.max_history_size);
    history.truncate(self.max_history_size);
    self.persist(&history).await?;

    info!(
      id = %record.id,
      is_valid = record.validation_result.is_valid,
      held = history.len(),
      evicted,
      "saved validation record"
    );
    Ok(record)
  }

  async fn get_history(
    &self,
    max_results: usize,
  ) -> Result<Vec<HistoryRecord>> {
    let _guard = self.lock.lock().await;

    let mut history = self.load().await?;
    history.truncate(max_results);
    Ok(history)
  }

  async fn get_by_id(&self, id: Uuid) -> Result<Option<HistoryRecord>> {
    let _guard = self.lock.lock().await;

    let history = self.load().await?;
    Ok(history.into_iter().find(|r| r.id == id))
  }

  async fn clear(&self) -> Result<bool> {
    let _guard = self.lock.lock().await;

    if !self.exists().await? {
      debug!(path = %self.path.display(), "no history file to clear");
      return Ok(false);
    }
    self.persist(&[]).await?;
    info!(path = %self.path.display(), "cleared validation history");
    Ok(true)
  }
}
