use crate::library::Song;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use tracing::debug;

/// One song as it sits in the store file. Fields stay optional so hand-edited
/// files with gaps still parse; incomplete records are dropped on conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub artist: Option<String>,
    #[serde(default)]
    pub album: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

impl SongRecord {
    pub fn from_song(song: &Song) -> Self {
        Self {
            id: Some(song.id().to_string()),
            title: Some(song.title().to_string()),
            artist: Some(song.artist().to_string()),
            album: Some(song.album().to_string()),
            path: Some(song.path().to_string_lossy().into_owned()),
        }
    }

    /// None when any required field is missing or blank
    pub fn to_song(&self) -> Option<Song> {
        let field = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Song::with_id(
            field(&self.id)?,
            field(&self.title)?,
            field(&self.artist)?,
            field(&self.album)?,
            field(&self.path)?,
        )
        .ok()
    }
}

/// Playlist name -> ordered ids, kept in file order in both directions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredPlaylists(pub Vec<(String, Vec<String>)>);

impl Serialize for StoredPlaylists {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, ids) in &self.0 {
            map.serialize_entry(name, ids)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for StoredPlaylists {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PlaylistsVisitor;

        impl<'de> Visitor<'de> for PlaylistsVisitor {
            type Value = StoredPlaylists;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of playlist name to song ids")
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E> {
                Ok(StoredPlaylists::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, ids)) =
                    access.next_entry::<String, Option<Vec<Option<String>>>>()?
                {
                    let ids = ids.unwrap_or_default().into_iter().flatten().collect();
                    entries.push((name, ids));
                }
                Ok(StoredPlaylists(entries))
            }
        }

        deserializer.deserialize_any(PlaylistsVisitor)
    }
}

/// Everything the store file holds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredData {
    #[serde(default, deserialize_with = "skip_null_records")]
    pub songs: Vec<SongRecord>,
    #[serde(default)]
    pub playlists: StoredPlaylists,
}

impl StoredData {
    pub fn new(songs: &[Song], playlists: &[(String, Vec<String>)]) -> Self {
        Self {
            songs: songs.iter().map(SongRecord::from_song).collect(),
            playlists: StoredPlaylists(playlists.to_vec()),
        }
    }

    /// Valid songs only, in file order
    pub fn to_songs(&self) -> Vec<Song> {
        let songs: Vec<Song> = self.songs.iter().filter_map(SongRecord::to_song).collect();
        let dropped = self.songs.len() - songs.len();
        if dropped > 0 {
            debug!("Dropped {} incomplete song record(s) from store", dropped);
        }
        songs
    }

    pub fn playlist_entries(&self) -> Vec<(String, Vec<String>)> {
        self.playlists.0.clone()
    }
}

fn skip_null_records<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SongRecord>, D::Error> {
    let records: Option<Vec<Option<SongRecord>>> = Option::deserialize(deserializer)?;
    Ok(records.unwrap_or_default().into_iter().flatten().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playlist_order_survives_json() {
        let data = StoredData {
            songs: Vec::new(),
            playlists: StoredPlaylists(vec![
                ("Zebra".to_string(), vec!["2".to_string(), "1".to_string()]),
                ("Alpha".to_string(), Vec::new()),
                ("Middle".to_string(), vec!["3".to_string()]),
            ]),
        };

        let json = serde_json::to_string(&data).unwrap();
        let parsed: StoredData = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, data);
    }

    #[test]
    fn test_missing_fields_default_to_empty() {
        let parsed: StoredData = serde_json::from_str("{}").unwrap();
        assert!(parsed.songs.is_empty());
        assert!(parsed.playlists.0.is_empty());

        let parsed: StoredData = serde_json::from_str(r#"{"songs": null, "playlists": null}"#).unwrap();
        assert_eq!(parsed, StoredData::default());
    }

    #[test]
    fn test_incomplete_records_dropped() {
        let json = r#"{
            "songs": [
                {"id": "1", "title": "Ok", "artist": "A", "album": "B", "path": "/1.mp3"},
                {"id": "2", "title": "  ", "artist": "A", "album": "B", "path": "/2.mp3"},
                {"id": "3", "title": "No path", "artist": "A", "album": "B"},
                null
            ],
            "playlists": {"Mix": ["1", null, "3"], "Empty": null}
        }"#;

        let parsed: StoredData = serde_json::from_str(json).unwrap();
        let songs = parsed.to_songs();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].id(), "1");

        assert_eq!(
            parsed.playlist_entries(),
            vec![
                ("Mix".to_string(), vec!["1".to_string(), "3".to_string()]),
                ("Empty".to_string(), Vec::new()),
            ]
        );
    }

    #[test]
    fn test_file_shape() {
        let song = Song::with_id("abc", "T", "A", "B", "/music/t.mp3").unwrap();
        let data = StoredData::new(&[song], &[("Gym".to_string(), vec!["abc".to_string()])]);

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["songs"][0]["id"], "abc");
        assert_eq!(value["songs"][0]["path"], "/music/t.mp3");
        assert_eq!(value["playlists"]["Gym"][0], "abc");
    }
}
