//! Snapshot persistence: the model codec and the blob store it writes to.

mod codec;
mod store;

use tracing::info;

use crate::{error::SnapshotError, model::StaffingModel};

pub use codec::{decode, encode};
pub use store::{BlobStore, FileStore, MemoryStore};

/// Fixed key the current model is stored under.
pub const STATE_KEY: &str = "staffboard-state";

/// Encode `model` and write it under [`STATE_KEY`].
pub fn save(store: &dyn BlobStore, model: &StaffingModel) -> Result<(), SnapshotError> {
    let blob = encode(model)?;
    store
        .put(STATE_KEY, &blob)
        .map_err(|source| SnapshotError::Store {
            key: STATE_KEY.to_string(),
            source,
        })?;
    info!(
        projects = model.projects().len(),
        assignments = model.assignment_total(),
        "snapshot saved"
    );
    Ok(())
}

/// Read and decode the model under [`STATE_KEY`]; `None` when nothing is stored.
pub fn load(store: &dyn BlobStore) -> Result<Option<StaffingModel>, SnapshotError> {
    let blob = store.get(STATE_KEY).map_err(|source| SnapshotError::Store {
        key: STATE_KEY.to_string(),
        source,
    })?;
    blob.as_deref().map(decode).transpose()
}
