//! Render snapshots: live records flattened into [`Sprite`]s.

use sparkfield_store::{ParticleStore, StoreError};
use sparkfield_types::Sprite;

/// Errors that can occur when exporting a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The output buffer cannot hold every live record.
    #[error("snapshot buffer too small: capacity {capacity}, {required} live records")]
    BufferTooSmall {
        /// Length of the buffer that was passed in.
        capacity: usize,
        /// Number of live records.
        required: usize,
    },

    /// The store rejected a handle during the walk.
    #[error("store error during snapshot: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: StoreError,
    },

    /// The walk from `first()` to `end()` disagrees with `len()`.
    #[error("snapshot walk visited {visited} records, store reports {required}")]
    CountMismatch {
        /// Records reached before the walk ended or was cut off.
        visited: usize,
        /// Number of live records the store reports.
        required: usize,
    },
}

/// Write one sprite per live record into `out`, in traversal order, and
/// return how many were written. Entries past that count are untouched.
///
/// # Errors
///
/// Returns [`SnapshotError::BufferTooSmall`] if `out.len() < store.len()`.
/// Nothing is written in that case. A walk that fails or does not end
/// after exactly `store.len()` records is reported as
/// [`SnapshotError::Store`] or [`SnapshotError::CountMismatch`].
pub fn export<S: ParticleStore>(store: &S, out: &mut [Sprite]) -> Result<usize, SnapshotError> {
    let required = store.len();
    if out.len() < required {
        return Err(SnapshotError::BufferTooSmall {
            capacity: out.len(),
            required,
        });
    }
    let mut written: usize = 0;
    let mut handle = store.first();
    for slot in out.iter_mut().take(required) {
        if handle == store.end() {
            break;
        }
        *slot = store.get(handle)?.sprite();
        handle = store.next(handle)?;
        written = written.saturating_add(1);
    }
    if written != required || handle != store.end() {
        return Err(SnapshotError::CountMismatch {
            visited: written,
            required,
        });
    }
    Ok(written)
}

/// Collect every live record's sprite into a new vector.
pub fn collect_sprites<S: ParticleStore>(store: &S) -> Result<Vec<Sprite>, SnapshotError> {
    let mut out = vec![Sprite::default(); store.len()];
    export(store, &mut out)?;
    Ok(out)
}
