// Playra Library - the engine behind a local music library manager
// Songs get stable identities, playlists reference them by id, and everything lands in one JSON file

pub mod config;    // settings and preferences
pub mod error;     // one error type for the whole engine
pub mod library;   // songs, identities, folder import, search
pub mod playback;  // queue navigation and device coordination
pub mod playlist;  // named sets of song references
pub mod session;   // shell-facing facade with write-through saves
pub mod store;     // crash-safe JSON persistence

// Export the stuff callers actually use
pub use config::Config;
pub use error::{Error, Result};
pub use library::{derive_id, LibraryIndex, Song};
pub use playback::{DeviceEvent, PlaybackDevice, PlaybackQueue, Player, PlayerEvent};
pub use playlist::{PlaylistName, PlaylistRegistry};
pub use session::{Session, View};
pub use store::{JsonStore, StoredData};
