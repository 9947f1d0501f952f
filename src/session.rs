// Session - what a shell talks to
// Owns the library, the playlists and the store; every successful mutation is saved straight away

use crate::config::Config;
use crate::error::Result;
use crate::library::{filter_songs, LibraryIndex, Song};
use crate::playlist::PlaylistRegistry;
use crate::store::JsonStore;
use std::path::Path;
use tracing::info;

/// Which list the shell is showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Library,
    Playlist(String),
}

pub struct Session {
    library: LibraryIndex,
    playlists: PlaylistRegistry,
    store: JsonStore,
}

impl Session {
    pub fn open(config: &Config) -> Self {
        let store = JsonStore::new(config.resolved_store_path());
        let seed: &[String] = if config.seed_default_playlists {
            &config.default_playlists
        } else {
            &[]
        };
        Self::open_with(store, seed)
    }

    /// Rehydrate from `store`, or start cold with `seed` playlists if it holds nothing
    pub fn open_with<S: AsRef<str>>(store: JsonStore, seed: &[S]) -> Self {
        let mut library = LibraryIndex::new();

        let playlists = match store.load() {
            Some(data) => {
                library.load_library(data.to_songs());
                let mut playlists = PlaylistRegistry::new(false);
                playlists.load_playlists(data.playlist_entries());
                playlists
            }
            None => {
                info!("Cold start, seeding {} playlist(s)", seed.len());
                PlaylistRegistry::with_defaults(seed)
            }
        };

        Self {
            library,
            playlists,
            store,
        }
    }

    pub fn library(&self) -> &LibraryIndex {
        &self.library
    }

    pub fn playlists(&self) -> &PlaylistRegistry {
        &self.playlists
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }

    /// Import a folder and save. Returns how many songs were new.
    pub fn import_folder<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let added = self.library.import_folder(dir)?;
        self.save()?;
        Ok(added)
    }

    /// Forget every song. Playlists keep their (now stale) references.
    pub fn clear_library(&mut self) -> Result<()> {
        self.library.clear_library();
        self.save()
    }

    pub fn create_playlist(&mut self, name: &str) -> Result<()> {
        self.playlists.create_playlist(name)?;
        self.save()
    }

    pub fn delete_playlist(&mut self, name: &str) -> Result<()> {
        self.playlists.delete_playlist(name)?;
        self.save()
    }

    pub fn add_to_playlist(&mut self, name: &str, song_id: &str) -> Result<()> {
        self.playlists.add_song(name, song_id)?;
        self.save()
    }

    pub fn remove_from_playlist(&mut self, name: &str, song_id: &str) -> Result<()> {
        self.playlists.remove_song(name, song_id)?;
        self.save()
    }

    /// Songs a playlist currently resolves to; stale ids are left out
    pub fn playlist_songs(&self, name: &str) -> Result<Vec<Song>> {
        let ids = self.playlists.song_ids(name)?;
        Ok(self.library.resolve_songs_by_ids(ids.as_slice()))
    }

    /// The list to display (and queue) for `view`, narrowed by `query`
    pub fn view(&self, view: &View, query: &str) -> Result<Vec<Song>> {
        match view {
            View::Library => Ok(self.library.search(query)),
            View::Playlist(name) => Ok(filter_songs(&self.playlist_songs(name)?, query)),
        }
    }

    pub fn save(&self) -> Result<()> {
        self.store
            .save(&self.library.all_songs(), &self.playlists.export_playlists())
    }
}
