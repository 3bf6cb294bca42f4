//! JSONL-backed append-only logs for workouts and check-ins.
//!
//! Writers serialize on an exclusive advisory lock held on a `<log>.lock`
//! sidecar. Appends take it for the write; update-by-id holds it across the
//! read, the rewrite into a temp file and the rename over the existing file,
//! so an append can never land on an inode that is about to be replaced.

use crate::store::{CheckInStore, HistoryStore};
use crate::{DailyCheckIn, Error, Result, Workout};
use fs2::FileExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Exclusive writer lock on a log's sidecar file, released on drop
struct WriterLock {
    file: File,
}

impl WriterLock {
    fn acquire(log_path: &Path) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut lock_path = log_path.as_os_str().to_owned();
        lock_path.push(".lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(PathBuf::from(lock_path))?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!("Failed to release log lock: {}", e);
        }
    }
}

/// Append one record as a JSON line
///
/// A partial last line left by an interrupted write is terminated first so
/// the new record lands on its own line.
pub fn append_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let _guard = WriterLock::acquire(path)?;

    let file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;
    // Readers take a shared lock on the log itself
    file.lock_exclusive()?;

    let needs_newline = ends_mid_line(&file)?;
    let mut writer = std::io::BufWriter::new(&file);
    if needs_newline {
        tracing::warn!("Terminating partial line at end of {:?}", path);
        writer.write_all(b"\n")?;
    }
    let line = serde_json::to_string(record)?;
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    drop(writer);

    file.unlock()?;
    Ok(())
}

fn ends_mid_line(mut file: &File) -> Result<bool> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(false);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::Start(len - 1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] != b'\n')
}

/// Read every parseable record; malformed lines are skipped with a warning
pub fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)?;
    file.lock_shared()?;

    let reader = BufReader::new(&file);
    let mut records = Vec::new();

    for (line_num, line_result) in reader.lines().enumerate() {
        let line = line_result?;
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<T>(&line) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(
                    "Skipping malformed record in {:?} at line {}: {}",
                    path,
                    line_num + 1,
                    e
                );
            }
        }
    }

    file.unlock()?;
    Ok(records)
}

/// Read, edit and atomically replace the log as one locked step
///
/// Returns whatever `edit` returns. If `edit` fails the log is left untouched.
pub fn update_records<T, R, F>(path: &Path, edit: F) -> Result<R>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce(&mut Vec<T>) -> Result<R>,
{
    let _guard = WriterLock::acquire(path)?;
    let mut records = read_records(path)?;
    let result = edit(&mut records)?;
    rewrite_records(path, &records)?;
    Ok(result)
}

/// Replace the log with `records`; callers hold the writer lock
fn rewrite_records<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| Error::Store(format!("{:?} has no parent directory", path)))?;

    let temp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = std::io::BufWriter::new(temp.as_file());
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| Error::Io(e.error))?;
    Ok(())
}

/// Workout history stored as `workouts.jsonl`
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for FileHistoryStore {
    fn append_workout(&mut self, workout: &Workout) -> Result<()> {
        append_record(&self.path, workout)?;
        tracing::debug!("Appended workout {} to {:?}", workout.id, self.path);
        Ok(())
    }

    fn list_workouts(&self) -> Result<Vec<Workout>> {
        let workouts: Vec<Workout> = read_records(&self.path)?;
        tracing::debug!("Read {} workouts from {:?}", workouts.len(), self.path);
        Ok(workouts)
    }

    fn update_workout(&mut self, id: Uuid, f: &mut dyn FnMut(&mut Workout)) -> Result<Workout> {
        let updated = update_records(&self.path, |workouts: &mut Vec<Workout>| {
            let workout = workouts
                .iter_mut()
                .find(|w| w.id == id)
                .ok_or_else(|| Error::NotFound(format!("workout {}", id)))?;
            f(workout);
            Ok(workout.clone())
        })?;
        tracing::debug!("Updated workout {} in {:?}", id, self.path);
        Ok(updated)
    }
}

/// Daily check-ins stored as `checkins.jsonl`
pub struct FileCheckInStore {
    path: PathBuf,
}

impl FileCheckInStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CheckInStore for FileCheckInStore {
    fn append_check_in(&mut self, check_in: &DailyCheckIn) -> Result<()> {
        append_record(&self.path, check_in)?;
        tracing::debug!("Recorded check-in for {}", check_in.date());
        Ok(())
    }

    fn list_check_ins(&self) -> Result<Vec<DailyCheckIn>> {
        read_records(&self.path)
    }
}
