// Playlists - named sets of song references, kept separate from the songs themselves

pub mod name;      // case-insensitive playlist name key
pub mod registry;  // creation-ordered collection of playlists

pub use name::PlaylistName;
pub use registry::{Playlist, PlaylistRegistry, DEFAULT_PLAYLISTS};
