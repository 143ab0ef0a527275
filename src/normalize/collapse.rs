//! Wrapper-directory collapse passes
//!
//! Students routinely re-zip an already-zipped project, or hand in an IDE
//! tree wrapped in a lone `src` directory. Two bottom-up passes rewrite the
//! materialized tree after extraction:
//!
//! - singleton-`src` collapse: a directory whose only child is a directory
//!   literally named `src` absorbs that child's contents;
//! - singleton-key collapse: a directory whose only child is a directory
//!   named exactly `key` (the container's base name) absorbs it, repeatedly,
//!   which unwinds `HW1/HW1/HW1/...` re-wrapping.
//!
//! Both passes are idempotent.

use std::fs;
use std::io;
use std::path::Path;

/// Hoist the contents of a lone `src` child directory, bottom-up.
pub fn collapse_single_src(dir: &Path) -> io::Result<()> {
    let mut child_count = 0;
    let mut lone_src = false;

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        child_count += 1;
        if entry.file_type()?.is_dir() {
            if entry.file_name() == "src" {
                lone_src = true;
            }
            // Children first, so nested wrappers collapse before their parents
            collapse_single_src(&entry.path())?;
        }
    }

    if lone_src && child_count == 1 {
        let src = dir.join("src");
        for item in fs::read_dir(&src)? {
            let item = item?;
            fs::rename(item.path(), dir.join(item.file_name()))?;
        }
        fs::remove_dir(&src)?;
    }
    Ok(())
}

/// Hoist the contents of a lone child directory named `key`, repeating while
/// the pattern recurs (a zip inside a zip inside a zip, all sharing a name).
pub fn collapse_single_key(dir: &Path, key: &str) -> io::Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !(entry.file_type()?.is_dir() && entry.file_name().to_string_lossy() == key) {
            return Ok(());
        }
    }

    let wrapper = dir.join(key);
    if !wrapper.exists() {
        // Empty directory: nothing to hoist
        return Ok(());
    }

    // Rename aside first so a nested `key/key` does not collide on the move up
    let staging = dir.join(format!("{key}.collapse"));
    fs::rename(&wrapper, &staging)?;
    for item in fs::read_dir(&staging)? {
        let item = item?;
        fs::rename(item.path(), dir.join(item.file_name()))?;
    }
    fs::remove_dir(&staging)?;

    collapse_single_key(dir, key)
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn tree(root: &Path) -> Vec<String> {
        let mut paths: Vec<String> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| {
                e.path()
                    .strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        paths.sort();
        paths
    }

    #[test]
    fn lone_src_is_absorbed() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/Main.java"));
        touch(&dir.path().join("src/util/Helper.java"));

        collapse_single_src(dir.path()).unwrap();
        assert_eq!(tree(dir.path()), vec!["Main.java", "util/Helper.java"]);
    }

    #[test]
    fn src_with_siblings_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("src/Main.java"));
        touch(&dir.path().join("pom.xml"));

        collapse_single_src(dir.path()).unwrap();
        assert_eq!(tree(dir.path()), vec!["pom.xml", "src/Main.java"]);
    }

    #[test]
    fn nested_lone_src_collapses_bottom_up() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("HW1/src/Main.java"));
        touch(&dir.path().join("README.md"));

        collapse_single_src(dir.path()).unwrap();
        assert_eq!(tree(dir.path()), vec!["HW1/Main.java", "README.md"]);
    }

    #[test]
    fn repeated_key_wrappers_unwind() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("HW1/HW1/HW1/Main.java"));

        collapse_single_key(dir.path(), "HW1").unwrap();
        assert_eq!(tree(dir.path()), vec!["Main.java"]);
    }

    #[test]
    fn key_wrapper_with_sibling_file_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("HW1/Main.java"));
        touch(&dir.path().join("notes.txt"));

        collapse_single_key(dir.path(), "HW1").unwrap();
        assert_eq!(tree(dir.path()), vec!["HW1/Main.java", "notes.txt"]);
    }

    #[test]
    fn both_passes_are_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("HW1/HW1/src/Main.java"));

        let run = |root: &PathBuf| {
            collapse_single_src(root).unwrap();
            collapse_single_key(root, "HW1").unwrap();
        };
        let root = dir.path().to_path_buf();
        run(&root);
        let first = tree(&root);
        run(&root);
        assert_eq!(tree(&root), first);
        assert_eq!(first, vec!["Main.java"]);
    }
}
