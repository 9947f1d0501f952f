// Persistence - the whole library and every playlist in one JSON file

pub mod json;      // load / crash-safe save
pub mod snapshot;  // file-resident shapes

pub use json::JsonStore;
pub use snapshot::{SongRecord, StoredData, StoredPlaylists};
