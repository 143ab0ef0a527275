//! Rar container backend
//!
//! The unrar library only reads from a real file path and only streams
//! forward, so a rar is drained in one pass at open time: entry metadata and
//! file bytes are captured together. Rar bytes found nested inside another
//! archive are spilled to a temp file that lives exactly as long as the open
//! call — it is removed on every exit path, including decode failures.

use super::{path_codec, Container, EntryMeta};
use crate::{NormlabError, NormlabResult};
use std::io::Write;
use std::path::Path;
use unrar::Archive;

pub struct RarContainer {
    base_name: String,
    entries: Vec<EntryMeta>,
    // One buffer per entry, taken on read; directories carry None
    data: Vec<Option<Vec<u8>>>,
}

impl RarContainer {
    /// Open a rar file on disk; the base name is the file stem.
    pub fn open(path: &Path) -> NormlabResult<Self> {
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::drain(path, &base_name)
    }

    /// Open a rar held in memory (e.g. pulled out of a parent container).
    pub fn from_bytes(data: Vec<u8>, base_name: &str) -> NormlabResult<Self> {
        let mut spill = tempfile::NamedTempFile::new()?;
        spill.write_all(&data)?;
        spill.flush()?;
        // The temp file drops (and is removed) once the drain completes,
        // whether it succeeded or not.
        Self::drain(spill.path(), base_name)
    }

    fn drain(path: &Path, base_name: &str) -> NormlabResult<Self> {
        let mut archive = Archive::new(path).open_for_processing().map_err(rar_err)?;

        let mut entries = Vec::new();
        let mut data = Vec::new();

        while let Some(header) = archive.read_header().map_err(rar_err)? {
            let entry = header.entry();
            let name = path_codec::repair(&entry.filename.to_string_lossy().replace('\\', "/"));
            let size = entry.unpacked_size as u64;
            let is_file = entry.is_file();

            entries.push(EntryMeta {
                name,
                size,
                is_dir: !is_file,
            });

            archive = if is_file {
                let (bytes, rest) = header.read().map_err(rar_err)?;
                data.push(Some(bytes));
                rest
            } else {
                data.push(None);
                header.skip().map_err(rar_err)?
            };
        }

        Ok(Self {
            base_name: base_name.to_string(),
            entries,
            data,
        })
    }
}

impl Container for RarContainer {
    fn base_name(&self) -> &str {
        &self.base_name
    }

    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, index: usize) -> &EntryMeta {
        &self.entries[index]
    }

    fn read_entry(&mut self, index: usize) -> NormlabResult<Vec<u8>> {
        self.data
            .get_mut(index)
            .and_then(Option::take)
            .ok_or_else(|| {
                NormlabError::Container(format!(
                    "rar entry {index} already consumed or is a directory"
                ))
            })
    }
}

fn rar_err(e: unrar::error::UnrarError) -> NormlabError {
    NormlabError::Container(format!("rar: {e}"))
}
