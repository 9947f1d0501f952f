use super::snapshot::StoredData;
use crate::error::{Error, Result};
use crate::library::Song;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const STORE_DIR: &str = ".playra";
const STORE_FILE: &str = "data.json";

/// Single-file JSON store with write-to-temp-then-rename saves
#[derive(Debug, Clone)]
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<home>/.playra/data.json`
    pub fn default_location() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(STORE_DIR)
            .join(STORE_FILE)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling the snapshot is written to before it replaces the real file
    pub fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| STORE_FILE.to_string());
        self.path.with_file_name(format!("{}.tmp", file_name))
    }

    /// Read the store. Missing, unreadable or unparsable files all mean "no data".
    pub fn load(&self) -> Option<StoredData> {
        if !self.path.exists() {
            debug!("No store at {}, starting fresh", self.path.display());
            return None;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read store {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<StoredData>(&content) {
            Ok(data) => {
                info!(
                    "Loaded store {} ({} song record(s), {} playlist(s))",
                    self.path.display(),
                    data.songs.len(),
                    data.playlists.0.len()
                );
                Some(data)
            }
            Err(e) => {
                warn!("Failed to parse store {}: {}", self.path.display(), e);
                None
            }
        }
    }

    /// Write a complete snapshot and atomically swap it in
    pub fn save(&self, songs: &[Song], playlists: &[(String, Vec<String>)]) -> Result<()> {
        let data = StoredData::new(songs, playlists);
        let temp = self.write_temp(&data)?;
        self.commit(&temp)?;

        info!(
            "Saved {} song(s) and {} playlist(s) to {}",
            songs.len(),
            playlists.len(),
            self.path.display()
        );
        Ok(())
    }

    /// First half of a save: the snapshot lands in the temp sibling only
    pub(crate) fn write_temp(&self, data: &StoredData) -> Result<PathBuf> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::persistence(parent, e))?;
        }

        let temp = self.temp_path();
        if let Err(e) = write_json(&temp, data) {
            let _ = fs::remove_file(&temp);
            return Err(Error::persistence(&temp, e));
        }
        Ok(temp)
    }

    /// Second half: rename over the real file, or replace non-atomically if rename refuses
    pub(crate) fn commit(&self, temp: &Path) -> Result<()> {
        if let Err(e) = fs::rename(temp, &self.path) {
            warn!(
                "Atomic rename onto {} failed ({}), replacing non-atomically",
                self.path.display(),
                e
            );
            replace_non_atomic(temp, &self.path).map_err(|e| Error::persistence(&self.path, e))?;
        }

        // the rename only survives a power cut once the directory entry is on disk
        if let Err(e) = sync_parent_dir(&self.path) {
            warn!("Failed to sync directory of {}: {}", self.path.display(), e);
        }
        Ok(())
    }
}

impl Default for JsonStore {
    fn default() -> Self {
        Self::new(Self::default_location())
    }
}

fn write_json(path: &Path, data: &StoredData) -> io::Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.flush()?;

    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => File::open(parent)?.sync_all(),
        None => File::open(".")?.sync_all(),
    }
}

// directories can't be opened for syncing here
#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

fn replace_non_atomic(temp: &Path, target: &Path) -> io::Result<()> {
    if target.exists() {
        fs::remove_file(target)?;
    }
    fs::rename(temp, target).or_else(|_| {
        fs::copy(temp, target)?;
        fs::remove_file(temp)
    })
}
