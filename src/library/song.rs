use super::identity;
use crate::error::{Error, Result};
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};

pub const UNKNOWN_ARTIST: &str = "Unknown Artist";
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

/// A song known to the library. Immutable once built; identity is the `id` alone.
#[derive(Debug, Clone)]
pub struct Song {
    id: String,
    title: String,
    artist: String,
    album: String,
    path: PathBuf,
}

impl Song {
    /// Build a song whose id is derived from its path
    pub fn new(
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let path = path.into();
        let id = identity::derive_id_for(&path)?;
        Self::with_id(id, title, artist, album, path)
    }

    /// Build a song with an already-known id (rehydrating from the store)
    pub fn with_id(
        id: impl Into<String>,
        title: impl Into<String>,
        artist: impl Into<String>,
        album: impl Into<String>,
        path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let (id, title, artist, album): (String, String, String, String) =
            (id.into(), title.into(), artist.into(), album.into());
        let path = path.into();
        require_non_blank(&path.to_string_lossy(), "path")?;

        Ok(Self {
            id: require_non_blank(&id, "id")?,
            title: require_non_blank(&title, "title")?,
            artist: require_non_blank(&artist, "artist")?,
            album: require_non_blank(&album, "album")?,
            path,
        })
    }

    /// Song for a freshly discovered file: title from the file stem, sentinel artist/album
    pub fn from_file(path: &Path) -> Result<Self> {
        // names that aren't valid UTF-8 still get a readable (lossy) title
        let title = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .filter(|stem| !stem.trim().is_empty())
            .or_else(|| path.file_name().map(|n| n.to_string_lossy().into_owned()))
            .ok_or_else(|| {
                Error::InvalidArgument(format!("no usable file name: {}", path.display()))
            })?;

        Self::new(title, UNKNOWN_ARTIST, UNKNOWN_ALBUM, path)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn artist(&self) -> &str {
        &self.artist
    }

    pub fn album(&self) -> &str {
        &self.album
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Case-insensitive substring match; `needle` must already be lowercased
    pub(crate) fn matches_lowercase(&self, needle: &str) -> bool {
        [&self.title, &self.artist, &self.album]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }

    pub fn display_line(&self) -> String {
        format!("{} - {}", self.title, self.artist)
    }
}

impl PartialEq for Song {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Song {}

impl Hash for Song {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Case-insensitive filter used for every displayed list; blank query keeps everything
pub fn filter_songs(songs: &[Song], query: &str) -> Vec<Song> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return songs.to_vec();
    }

    songs
        .iter()
        .filter(|song| song.matches_lowercase(&needle))
        .cloned()
        .collect()
}

fn require_non_blank(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument(format!("{} must not be blank", field)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fields_are_trimmed() {
        let song = Song::with_id(" id-1 ", " Title ", " Artist ", " Album ", "/music/a.mp3").unwrap();
        assert_eq!(song.id(), "id-1");
        assert_eq!(song.title(), "Title");
        assert_eq!(song.artist(), "Artist");
        assert_eq!(song.album(), "Album");
    }

    #[test]
    fn test_blank_fields_rejected() {
        assert!(matches!(
            Song::with_id("id", "  ", "Artist", "Album", "/a.mp3"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Song::with_id("id", "Title", "Artist", "", "/a.mp3"),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            Song::with_id("id", "Title", "Artist", "Album", ""),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_equality_follows_id() {
        let a = Song::with_id("same", "One", "X", "Y", "/a.mp3").unwrap();
        let b = Song::with_id("same", "Two", "Z", "W", "/b.mp3").unwrap();
        let c = Song::with_id("other", "One", "X", "Y", "/a.mp3").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_from_file_uses_stem_and_sentinels() {
        let song = Song::from_file(Path::new("/music/Intro Track.mp3")).unwrap();
        assert_eq!(song.title(), "Intro Track");
        assert_eq!(song.artist(), UNKNOWN_ARTIST);
        assert_eq!(song.album(), UNKNOWN_ALBUM);
        assert_eq!(song.id(), identity::derive_id("/music/Intro Track.mp3").unwrap());
    }

    #[cfg(unix)]
    #[test]
    fn test_from_file_non_utf8_name() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new("/music").join(OsStr::from_bytes(b"bad\xff.mp3"));
        let song = Song::from_file(&path).unwrap();
        assert_eq!(song.title(), "bad\u{FFFD}");
        assert_eq!(song.path(), path.as_path());
    }

    #[test]
    fn test_filter_songs() {
        let songs = vec![
            Song::with_id("1", "Blue Monday", "New Order", "Power", "/1.mp3").unwrap(),
            Song::with_id("2", "Karma Police", "Radiohead", "OK Computer", "/2.mp3").unwrap(),
            Song::with_id("3", "Airbag", "Radiohead", "OK Computer", "/3.mp3").unwrap(),
        ];

        let hits = filter_songs(&songs, "RADIO");
        assert_eq!(hits.iter().map(Song::id).collect::<Vec<_>>(), vec!["2", "3"]);

        let hits = filter_songs(&songs, "computer");
        assert_eq!(hits.len(), 2);

        assert_eq!(filter_songs(&songs, "   ").len(), 3);
        assert!(filter_songs(&songs, "zzz").is_empty());
    }
}
