use super::name::PlaylistName;
use crate::error::{Error, Result};
use std::collections::HashSet;
use tracing::{debug, info};

/// Names seeded into a registry with no persisted state
pub const DEFAULT_PLAYLISTS: [&str; 3] = ["Favorites", "Study Mix", "Gym"];

/// A named, insertion-ordered set of song ids.
///
/// Purely referential: ids may point at songs no longer in the library.
#[derive(Debug, Clone)]
pub struct Playlist {
    name: PlaylistName,
    song_ids: Vec<String>,
    members: HashSet<String>,
}

impl Playlist {
    pub fn new(name: PlaylistName) -> Self {
        Self {
            name,
            song_ids: Vec::new(),
            members: HashSet::new(),
        }
    }

    pub fn name(&self) -> &PlaylistName {
        &self.name
    }

    pub fn song_ids(&self) -> &[String] {
        &self.song_ids
    }

    pub fn contains(&self, song_id: &str) -> bool {
        self.members.contains(song_id.trim())
    }

    pub fn len(&self) -> usize {
        self.song_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.song_ids.is_empty()
    }

    /// Returns false when the id was already present
    fn add(&mut self, song_id: &str) -> bool {
        if !self.members.insert(song_id.to_string()) {
            return false;
        }
        self.song_ids.push(song_id.to_string());
        true
    }

    fn remove(&mut self, song_id: &str) -> bool {
        if !self.members.remove(song_id) {
            return false;
        }
        self.song_ids.retain(|id| id != song_id);
        true
    }
}

/// Every playlist, in creation order
#[derive(Debug, Default)]
pub struct PlaylistRegistry {
    playlists: Vec<Playlist>,
}

impl PlaylistRegistry {
    /// Fresh registry; `seed` pre-populates the starter playlists
    pub fn new(seed: bool) -> Self {
        if seed {
            Self::with_defaults(&DEFAULT_PLAYLISTS)
        } else {
            Self::default()
        }
    }

    /// Registry seeded with the given names. Blank names and repeats are skipped.
    pub fn with_defaults<S: AsRef<str>>(names: &[S]) -> Self {
        let mut registry = Self::default();
        for name in names {
            if let Err(e) = registry.create_playlist(name.as_ref()) {
                debug!("Skipping seed playlist '{}': {}", name.as_ref(), e);
            }
        }
        registry
    }

    pub fn create_playlist(&mut self, name: &str) -> Result<()> {
        let name = PlaylistName::parse(name)?;
        if self.find(name.key()).is_some() {
            return Err(Error::DuplicateName(name.to_string()));
        }

        info!("Created playlist '{}'", name);
        self.playlists.push(Playlist::new(name));
        Ok(())
    }

    pub fn delete_playlist(&mut self, name: &str) -> Result<()> {
        let position = self
            .position(name)
            .ok_or_else(|| Error::NotFound(name.trim().to_string()))?;

        let removed = self.playlists.remove(position);
        info!("Deleted playlist '{}'", removed.name());
        Ok(())
    }

    /// Add a song reference; adding an existing member changes nothing
    pub fn add_song(&mut self, name: &str, song_id: &str) -> Result<()> {
        let song_id = require_song_id(song_id)?;
        let playlist = self.get_mut(name)?;

        if playlist.add(song_id) {
            info!("Added {} to playlist '{}'", song_id, playlist.name());
        } else {
            debug!("{} already in playlist '{}'", song_id, playlist.name());
        }
        Ok(())
    }

    /// Remove a song reference; removing a non-member is a no-op
    pub fn remove_song(&mut self, name: &str, song_id: &str) -> Result<()> {
        let song_id = require_song_id(song_id)?;
        let playlist = self.get_mut(name)?;

        if playlist.remove(song_id) {
            info!("Removed {} from playlist '{}'", song_id, playlist.name());
        }
        Ok(())
    }

    /// Names in creation order
    pub fn playlists(&self) -> Vec<String> {
        self.playlists
            .iter()
            .map(|p| p.name().to_string())
            .collect()
    }

    pub fn song_ids(&self, name: &str) -> Result<Vec<String>> {
        self.get(name).map(|p| p.song_ids().to_vec())
    }

    pub fn get(&self, name: &str) -> Result<&Playlist> {
        self.position(name)
            .map(|idx| &self.playlists[idx])
            .ok_or_else(|| Error::NotFound(name.trim().to_string()))
    }

    pub fn has_playlist(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn contains_song(&self, name: &str, song_id: &str) -> bool {
        self.get(name).map(|p| p.contains(song_id)).unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.playlists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlists.is_empty()
    }

    /// Snapshot for persistence: (name, ordered ids) in creation order
    pub fn export_playlists(&self) -> Vec<(String, Vec<String>)> {
        self.playlists
            .iter()
            .map(|p| (p.name().to_string(), p.song_ids().to_vec()))
            .collect()
    }

    /// Replace everything from a persisted snapshot.
    ///
    /// Blank names, later case-insensitive duplicates and blank ids are dropped.
    pub fn load_playlists<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        self.playlists.clear();

        for (raw_name, ids) in entries {
            let name = match PlaylistName::parse(&raw_name) {
                Ok(name) => name,
                Err(_) => {
                    debug!("Dropping stored playlist with blank name");
                    continue;
                }
            };
            if self.find(name.key()).is_some() {
                debug!("Dropping duplicate stored playlist '{}'", name);
                continue;
            }

            let mut playlist = Playlist::new(name);
            for id in ids.iter().map(|id| id.trim()).filter(|id| !id.is_empty()) {
                playlist.add(id);
            }
            self.playlists.push(playlist);
        }

        info!("Loaded {} playlist(s)", self.playlists.len());
    }

    fn find(&self, key: &str) -> Option<&Playlist> {
        self.playlists.iter().find(|p| p.name().key() == key)
    }

    fn position(&self, raw: &str) -> Option<usize> {
        self.playlists.iter().position(|p| p.name().matches(raw))
    }

    fn get_mut(&mut self, name: &str) -> Result<&mut Playlist> {
        match self.position(name) {
            Some(idx) => Ok(&mut self.playlists[idx]),
            None => Err(Error::NotFound(name.trim().to_string())),
        }
    }
}

fn require_song_id(song_id: &str) -> Result<&str> {
    let trimmed = song_id.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("song id must not be blank".to_string()));
    }
    Ok(trimmed)
}
