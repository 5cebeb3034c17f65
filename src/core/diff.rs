//! Diff engine: compares consecutive library snapshots.

use crate::models::library::{LibraryDiff, LibraryIndex};

/// Compute `added = current - previous` and `removed = previous - current`.
///
/// With no previous snapshot the whole library would count as added; that
/// initial population is suppressed and reported through `initial`.
pub fn diff_indexes(previous: Option<&LibraryIndex>, current: &LibraryIndex) -> LibraryDiff {
    let Some(previous) = previous else {
        return LibraryDiff {
            initial: true,
            ..LibraryDiff::default()
        };
    };

    LibraryDiff {
        added: current.keys().difference(previous.keys()).cloned().collect(),
        removed: previous.keys().difference(current.keys()).cloned().collect(),
        initial: false,
    }
}
