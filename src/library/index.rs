use super::scanner::FolderScanner;
use super::song::{filter_songs, Song, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
use super::identity;
use crate::error::Result;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info};

/// In-memory library: songs by id, discovery order, and artist/album lookups
#[derive(Debug, Default)]
pub struct LibraryIndex {
    songs_by_id: HashMap<String, Song>,
    song_order: Vec<String>,
    artist_to_ids: HashMap<String, Vec<String>>,
    album_to_ids: HashMap<String, Vec<String>>,
    scanner: FolderScanner,
}

impl LibraryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Import every supported file under `dir` that isn't already known.
    ///
    /// All-or-nothing: the folder is fully scanned before the first insert, so a walk
    /// failure leaves the index exactly as it was. Returns how many songs were added.
    pub fn import_folder<P: AsRef<Path>>(&mut self, dir: P) -> Result<usize> {
        let dir = dir.as_ref();
        let files = self.scanner.scan(dir)?;

        let mut fresh = Vec::new();
        let mut pending = HashSet::new();
        for file in &files {
            let id = identity::derive_id_for(file)?;
            if self.songs_by_id.contains_key(&id) || !pending.insert(id) {
                debug!("Already in library, skipping {}", file.display());
                continue;
            }
            fresh.push(Song::from_file(file)?);
        }

        let added = fresh.len();
        for song in fresh {
            self.insert(song);
        }

        info!(
            "Imported {} new song(s) from {} ({} candidates, {} total)",
            added,
            dir.display(),
            files.len(),
            self.len()
        );
        Ok(added)
    }

    /// Songs in display (discovery) order
    pub fn all_songs(&self) -> Vec<Song> {
        self.iter().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Song> + '_ {
        self.song_order
            .iter()
            .filter_map(move |id| self.songs_by_id.get(id))
    }

    pub fn song(&self, id: &str) -> Option<&Song> {
        self.songs_by_id.get(id.trim())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.song(id).is_some()
    }

    /// Materialize ids into songs, silently dropping blank or unknown ids
    pub fn resolve_songs_by_ids<S: AsRef<str>>(&self, ids: &[S]) -> Vec<Song> {
        ids.iter()
            .map(AsRef::as_ref)
            .filter(|id| !id.trim().is_empty())
            .filter_map(|id| self.song(id))
            .cloned()
            .collect()
    }

    /// Case-insensitive substring search over title, artist and album
    pub fn search(&self, query: &str) -> Vec<Song> {
        filter_songs(&self.all_songs(), query)
    }

    /// Replace the whole library. Later duplicates of an id are ignored.
    pub fn load_library(&mut self, songs: Vec<Song>) {
        self.clear();
        for song in songs {
            if self.songs_by_id.contains_key(song.id()) {
                debug!("Duplicate id {} while loading library, keeping first", song.id());
                continue;
            }
            self.insert(song);
        }
        info!("Loaded {} song(s) into library", self.len());
    }

    pub fn clear_library(&mut self) {
        self.clear();
        info!("Library cleared");
    }

    pub fn len(&self) -> usize {
        self.song_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.song_order.is_empty()
    }

    pub fn artists(&self) -> &HashMap<String, Vec<String>> {
        &self.artist_to_ids
    }

    pub fn albums(&self) -> &HashMap<String, Vec<String>> {
        &self.album_to_ids
    }

    pub fn songs_by_artist(&self, artist: &str) -> Vec<Song> {
        let key = index_key(artist, UNKNOWN_ARTIST);
        self.artist_to_ids
            .get(&key)
            .map(|ids| self.resolve_songs_by_ids(ids.as_slice()))
            .unwrap_or_default()
    }

    pub fn songs_by_album(&self, album: &str) -> Vec<Song> {
        let key = index_key(album, UNKNOWN_ALBUM);
        self.album_to_ids
            .get(&key)
            .map(|ids| self.resolve_songs_by_ids(ids.as_slice()))
            .unwrap_or_default()
    }

    fn insert(&mut self, song: Song) {
        let id = song.id().to_string();

        self.artist_to_ids
            .entry(index_key(song.artist(), UNKNOWN_ARTIST))
            .or_default()
            .push(id.clone());
        self.album_to_ids
            .entry(index_key(song.album(), UNKNOWN_ALBUM))
            .or_default()
            .push(id.clone());

        self.song_order.push(id.clone());
        self.songs_by_id.insert(id, song);
    }

    fn clear(&mut self) {
        self.songs_by_id.clear();
        self.song_order.clear();
        self.artist_to_ids.clear();
        self.album_to_ids.clear();
    }
}

fn index_key(name: &str, sentinel: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        sentinel.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    fn music_folder(files: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(path, b"").unwrap();
        }
        dir
    }

    fn song(id: &str, title: &str, artist: &str, album: &str) -> Song {
        Song::with_id(id, title, artist, album, format!("/music/{}.mp3", id)).unwrap()
    }

    #[test]
    fn test_import_filters_extensions() {
        let dir = music_folder(&["a.mp3", "b.wav", "c.txt"]);
        let mut index = LibraryIndex::new();

        let added = index.import_folder(dir.path()).unwrap();
        assert_eq!(added, 2);
        assert_eq!(index.len(), 2);

        let titles: Vec<_> = index.iter().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, vec!["a", "b"]);
    }

    #[test]
    fn test_reimport_adds_nothing() {
        let dir = music_folder(&["a.mp3", "b.wav"]);
        let mut index = LibraryIndex::new();

        index.import_folder(dir.path()).unwrap();
        let ids_before: Vec<_> = index.iter().map(|s| s.id().to_string()).collect();

        assert_eq!(index.import_folder(dir.path()).unwrap(), 0);
        let ids_after: Vec<_> = index.iter().map(|s| s.id().to_string()).collect();
        assert_eq!(ids_before, ids_after);
    }

    #[test]
    fn test_import_appends_in_path_order() {
        let dir = music_folder(&["z.mp3", "m/b.m4a", "m/a.mp3"]);
        let mut index = LibraryIndex::new();
        index.import_folder(dir.path()).unwrap();

        let titles: Vec<_> = index.iter().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, vec!["a", "b", "z"]);

        let more = music_folder(&["0.mp3"]);
        assert_eq!(index.import_folder(more.path()).unwrap(), 1);
        assert_eq!(index.iter().last().unwrap().title(), "0");
    }

    #[test]
    fn test_import_indexes_unknown_artist_and_album() {
        let dir = music_folder(&["a.mp3", "b.mp3"]);
        let mut index = LibraryIndex::new();
        index.import_folder(dir.path()).unwrap();

        assert_eq!(index.artists()[UNKNOWN_ARTIST].len(), 2);
        assert_eq!(index.albums()[UNKNOWN_ALBUM].len(), 2);
        assert_eq!(index.songs_by_artist("  ").len(), 2);
    }

    #[test]
    fn test_import_invalid_folder_leaves_index_untouched() {
        let mut index = LibraryIndex::new();
        index.load_library(vec![song("1", "One", "A", "B")]);

        let result = index.import_folder("/definitely/not/here/playra");
        assert!(matches!(result, Err(Error::InvalidArgument(_))));
        assert_eq!(index.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_failure_leaves_index_untouched() {
        use std::os::unix::fs::PermissionsExt;

        let dir = music_folder(&["a.mp3", "locked/b.mp3"]);
        let locked = dir.path().join("locked");
        let mut index = LibraryIndex::new();
        index.load_library(vec![song("1", "One", "A", "B")]);

        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        let readable = fs::read_dir(&locked).is_ok();
        let result = index.import_folder(dir.path());
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        // running as root: permission bits don't stop the walk
        if readable {
            return;
        }
        assert!(matches!(result, Err(Error::Io(_))));
        assert_eq!(index.len(), 1);
        assert!(index.contains("1"));
        assert_eq!(index.artists().len(), 1);
    }

    #[test]
    fn test_case_only_duplicates_keep_first() {
        let dir = music_folder(&["Song.mp3", "song.mp3"]);
        // case-insensitive filesystems fold these into one file
        if fs::read_dir(dir.path()).unwrap().count() < 2 {
            return;
        }

        let mut index = LibraryIndex::new();
        assert_eq!(index.import_folder(dir.path()).unwrap(), 1);
        assert_eq!(index.len(), 1);
        assert_eq!(index.iter().next().unwrap().title(), "Song");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_name_does_not_block_import() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = music_folder(&["good.mp3"]);
        let bad = dir.path().join(OsStr::from_bytes(b"bad\xff.mp3"));
        // some filesystems refuse non-UTF-8 names outright
        if fs::write(&bad, b"").is_err() {
            return;
        }

        let mut index = LibraryIndex::new();
        assert_eq!(index.import_folder(dir.path()).unwrap(), 2);

        let titles: Vec<_> = index.iter().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, vec!["bad\u{FFFD}", "good"]);
        assert!(index.iter().any(|s| s.path() == bad.as_path()));
    }

    #[test]
    fn test_sibling_file_sorts_before_same_named_folder() {
        let dir = music_folder(&["a/x.mp3", "a.mp3"]);
        let mut index = LibraryIndex::new();
        index.import_folder(dir.path()).unwrap();

        let titles: Vec<_> = index.iter().map(|s| s.title().to_string()).collect();
        assert_eq!(titles, vec!["a", "x"]);
    }

    #[test]
    fn test_lookup_and_resolve() {
        let mut index = LibraryIndex::new();
        index.load_library(vec![song("1", "One", "A", "X"), song("2", "Two", "B", "X")]);

        assert_eq!(index.song(" 1 ").unwrap().title(), "One");
        assert!(index.song("missing").is_none());

        let resolved = index.resolve_songs_by_ids(&["2", "gone", "", "1"]);
        assert_eq!(resolved.iter().map(Song::id).collect::<Vec<_>>(), vec!["2", "1"]);
    }

    #[test]
    fn test_search_preserves_display_order() {
        let mut index = LibraryIndex::new();
        index.load_library(vec![
            song("1", "Hello", "Adele", "25"),
            song("2", "Yellow", "Coldplay", "Parachutes"),
            song("3", "Hell Yeah", "Someone", "Mellow"),
        ]);

        let hits = index.search("ELL");
        assert_eq!(hits.iter().map(Song::id).collect::<Vec<_>>(), vec!["1", "2", "3"]);
        assert_eq!(index.search("").len(), 3);
        assert_eq!(index.search("parachutes")[0].id(), "2");
    }

    #[test]
    fn test_load_replaces_and_clear_empties() {
        let mut index = LibraryIndex::new();
        index.load_library(vec![song("1", "One", "A", "X")]);
        index.load_library(vec![
            song("2", "Two", "B", "Y"),
            song("2", "Dup", "C", "Z"),
            song("3", "Three", "B", "Y"),
        ]);

        assert_eq!(index.len(), 2);
        assert!(!index.contains("1"));
        assert_eq!(index.song("2").unwrap().title(), "Two");
        assert_eq!(index.songs_by_artist("B").len(), 2);
        assert_eq!(index.songs_by_album("Y").len(), 2);

        index.clear_library();
        assert!(index.is_empty());
        assert!(index.artists().is_empty());
        assert!(index.albums().is_empty());
    }
}
