// Snapshot blob layout: [version: u8][wincode payload].

use crate::error::PersistenceError;
use crate::models::PersistedSnapshot;

pub(super) const SNAPSHOT_BLOB_VERSION: u8 = 1;

pub(super) fn with_version_prefix(version: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(version);
    out.extend_from_slice(&payload);
    out
}

pub fn encode_snapshot(snapshot: &PersistedSnapshot) -> Result<Vec<u8>, PersistenceError> {
    let payload =
        wincode::serialize(snapshot).map_err(|e| PersistenceError::Encode(e.to_string()))?;
    Ok(with_version_prefix(SNAPSHOT_BLOB_VERSION, payload))
}

/// Rejects empty blobs and unknown versions rather than guessing at the layout.
pub fn decode_snapshot(bytes: &[u8]) -> Result<PersistedSnapshot, PersistenceError> {
    let Some((&version, payload)) = bytes.split_first() else {
        return Err(PersistenceError::Decode("empty snapshot blob".into()));
    };
    if version != SNAPSHOT_BLOB_VERSION {
        return Err(PersistenceError::Decode(format!(
            "unsupported snapshot blob version {}",
            version
        )));
    }
    wincode::deserialize(payload).map_err(|e| PersistenceError::Decode(e.to_string()))
}
