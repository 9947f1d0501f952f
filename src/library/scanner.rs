use crate::error::{Error, Result};
use std::io;
use std::path::{self, Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    Mp3,
    Wav,
    M4a,
}

impl AudioFormat {
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "wav" => Some(AudioFormat::Wav),
            "m4a" => Some(AudioFormat::M4a),
            _ => None,
        }
    }

    pub fn of(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }
}

/// Finds importable audio files under a folder
#[derive(Debug, Clone, Default)]
pub struct FolderScanner;

impl FolderScanner {
    pub fn new() -> Self {
        Self
    }

    /// Walk `dir` and return every supported file as an absolute path, sorted.
    ///
    /// The walk finishes before anything is returned; a single unreadable entry fails
    /// the whole scan so callers never act on a partial listing.
    pub fn scan<P: AsRef<Path>>(&self, dir: P) -> Result<Vec<PathBuf>> {
        let dir = dir.as_ref();
        validate_folder(dir)?;

        let root = path::absolute(dir)?;
        let mut files = Vec::new();

        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            if AudioFormat::of(path).is_some() {
                files.push(path.to_path_buf());
            } else {
                debug!("Skipping unsupported file {}", path.display());
            }
        }

        // plain byte order, so `a.mp3` sorts ahead of `a/x.mp3`
        files.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
        Ok(files)
    }
}

fn validate_folder(dir: &Path) -> Result<()> {
    if dir.as_os_str().is_empty() {
        return Err(Error::InvalidArgument("folder must not be blank".to_string()));
    }
    if !dir.exists() {
        return Err(Error::InvalidArgument(format!(
            "folder does not exist: {}",
            dir.display()
        )));
    }
    if !dir.is_dir() {
        return Err(Error::InvalidArgument(format!(
            "path is not a directory: {}",
            dir.display()
        )));
    }
    Ok(())
}
