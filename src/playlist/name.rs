use crate::error::{Error, Result};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Playlist name with case-insensitive identity.
///
/// Keeps the trimmed spelling it was created with for display; comparisons and
/// hashing use the case-folded key only.
#[derive(Debug, Clone)]
pub struct PlaylistName {
    display: String,
    key: String,
}

impl PlaylistName {
    pub fn parse(raw: &str) -> Result<Self> {
        let display = raw.trim();
        if display.is_empty() {
            return Err(Error::BlankName);
        }
        Ok(Self {
            display: display.to_string(),
            key: display.to_lowercase(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.display
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// True when `raw` names this playlist, ignoring case and surrounding whitespace
    pub fn matches(&self, raw: &str) -> bool {
        raw.trim().to_lowercase() == self.key
    }
}

impl PartialEq for PlaylistName {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for PlaylistName {}

impl Hash for PlaylistName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl fmt::Display for PlaylistName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
