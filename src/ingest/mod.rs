//! Archive ingestion — zip/rar containers behind one capability
//!
//! The normalizer walks submissions through the [`Container`] trait rather
//! than concrete archive types, so the recursive routine is written once.
//! Containers are scoped resources: each one owns whatever backs it (an
//! in-memory cursor, a spilled temp file) and releases it on drop, on every
//! exit path.

pub mod path_codec;
pub mod rar;
pub mod zip;

pub use rar::RarContainer;
pub use zip::ZipContainer;

use crate::{NormlabError, NormlabResult};

/// Metadata for one archive entry, name already repaired by the path codec
#[derive(Debug, Clone)]
pub struct EntryMeta {
    /// Entry path within the container, `/`-separated
    pub name: String,
    /// Uncompressed size in bytes
    pub size: u64,
    pub is_dir: bool,
}

/// Minimal archive capability: list entries, read one entry, know your name.
pub trait Container {
    /// Base name of the container (final path segment, extension stripped);
    /// used as the key for wrapper-directory collapsing.
    fn base_name(&self) -> &str;

    fn entry_count(&self) -> usize;

    /// Entry metadata, in container iteration order.
    fn entry(&self, index: usize) -> &EntryMeta;

    /// Uncompressed bytes of one entry.
    fn read_entry(&mut self, index: usize) -> NormlabResult<Vec<u8>>;
}

/// Open an in-memory archive pulled out of a parent container.
///
/// Dispatches on the entry's extension; `base_name` is the entry's filename
/// minus that extension. Corrupt containers surface as errors — the caller
/// decides whether that fails the whole submission.
pub fn open_nested(
    entry_name: &str,
    base_name: &str,
    data: Vec<u8>,
) -> NormlabResult<Box<dyn Container>> {
    if entry_name.ends_with(".zip") {
        Ok(Box::new(ZipContainer::from_bytes(data, base_name)?))
    } else if entry_name.ends_with(".rar") {
        Ok(Box::new(RarContainer::from_bytes(data, base_name)?))
    } else {
        Err(NormlabError::Container(format!(
            "not a supported archive: {entry_name}"
        )))
    }
}
