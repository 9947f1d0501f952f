use crate::error::{Error, Result};
use std::path::{self, Path};
use uuid::Uuid;

/// Namespace for path-derived song ids. Changing it re-keys every library on disk.
const SONG_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a8e_4b7d_5e30_9a41_c2d8_17f5_0b3e);

/// Normalize a path the way identities see it: trimmed, absolute, lowercased
pub fn normalize_path(path: &str) -> Result<String> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidIdentity("path must not be blank".to_string()));
    }

    let absolute = path::absolute(Path::new(trimmed))
        .map_err(|e| Error::InvalidIdentity(format!("cannot resolve '{}': {}", trimmed, e)))?;

    Ok(absolute.to_string_lossy().trim().to_lowercase())
}

/// Stable song id for a file path.
///
/// Same normalized path, same id - across re-imports and process restarts.
/// This is what keeps playlist references valid when a folder is scanned again.
pub fn derive_id(path: &str) -> Result<String> {
    let normalized = normalize_path(path)?;
    Ok(Uuid::new_v5(&SONG_NAMESPACE, normalized.as_bytes()).to_string())
}

/// Convenience for callers holding a `Path`
pub fn derive_id_for(path: &Path) -> Result<String> {
    derive_id(&path.to_string_lossy())
}
