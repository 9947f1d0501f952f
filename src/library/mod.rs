// Library - songs, their stable identities, and the folder import that finds them

pub mod identity;  // path -> stable song id
pub mod index;     // in-memory index with artist/album lookups
pub mod scanner;   // folder walk for supported audio files
pub mod song;

pub use identity::derive_id;
pub use index::LibraryIndex;
pub use scanner::{AudioFormat, FolderScanner};
pub use song::{filter_songs, Song, UNKNOWN_ALBUM, UNKNOWN_ARTIST};
