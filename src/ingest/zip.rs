//! Zip container backend
//!
//! Zip archives are held fully in memory (submissions are small and the
//! normalizer recurses into archives nested inside other archives, where no
//! file handle exists to seek on).

use super::{path_codec, Container, EntryMeta};
use crate::NormlabResult;
use std::io::{Cursor, Read};
use std::path::Path;
use zip::ZipArchive;

pub struct ZipContainer {
    archive: ZipArchive<Cursor<Vec<u8>>>,
    base_name: String,
    entries: Vec<EntryMeta>,
}

impl ZipContainer {
    /// Open a zip file on disk; the base name is the file stem.
    pub fn open(path: &Path) -> NormlabResult<Self> {
        let base_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let data = std::fs::read(path)?;
        Self::from_bytes(data, &base_name)
    }

    /// Open a zip held in memory (e.g. pulled out of a parent container).
    pub fn from_bytes(data: Vec<u8>, base_name: &str) -> NormlabResult<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data))?;

        let mut entries = Vec::with_capacity(archive.len());
        for index in 0..archive.len() {
            let file = archive.by_index(index)?;
            entries.push(EntryMeta {
                name: path_codec::repair(file.name()),
                size: file.size(),
                is_dir: file.is_dir(),
            });
        }

        Ok(Self {
            archive,
            base_name: base_name.to_string(),
            entries,
        })
    }
}

impl Container for ZipContainer {
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
        let mut file = self.archive.by_index(index)?;
        let mut data = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut data)?;
        Ok(data)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn zip_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            writer
                .start_file(name.to_string(), SimpleFileOptions::default())
                .unwrap();
            writer.write_all(data).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn lists_entries_in_container_order() {
        let data = zip_bytes(&[("a.txt", b"aaa"), ("dir/b.txt", b"bbbb")]);
        let container = ZipContainer::from_bytes(data, "HW1").unwrap();
        assert_eq!(container.base_name(), "HW1");
        assert_eq!(container.entry_count(), 2);
        assert_eq!(container.entry(0).name, "a.txt");
        assert_eq!(container.entry(0).size, 3);
        assert_eq!(container.entry(1).name, "dir/b.txt");
        assert_eq!(container.entry(1).size, 4);
    }

    #[test]
    fn reads_entry_bytes() {
        let data = zip_bytes(&[("a.txt", b"hello zip")]);
        let mut container = ZipContainer::from_bytes(data, "HW1").unwrap();
        assert_eq!(container.read_entry(0).unwrap(), b"hello zip");
        // Zip entries can be re-read
        assert_eq!(container.read_entry(0).unwrap(), b"hello zip");
    }

    #[test]
    fn corrupt_zip_surfaces_an_error() {
        assert!(ZipContainer::from_bytes(b"not a zip".to_vec(), "bad").is_err());
    }
}
