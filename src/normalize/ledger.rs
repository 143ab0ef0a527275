//! Source ledger — every extracted file of one submission
//!
//! Mutated only while that submission is being normalized; read-only for the
//! analyzer afterwards. The running total always equals the sum of recorded
//! sizes: appending a path that is already present removes the earlier entry
//! first (overwrite-append, last write wins).

#[derive(Debug, Clone, Default)]
pub struct SourceLedger {
    files: Vec<(String, u64)>,
    total_size: u64,
}

impl SourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one extracted file (path relative to the submission root).
    pub fn append(&mut self, path: impl Into<String>, size: u64) {
        let path = path.into();
        if let Some(pos) = self.files.iter().position(|(p, _)| *p == path) {
            let (_, old) = self.files.remove(pos);
            self.total_size -= old;
        }
        self.files.push((path, size));
        self.total_size += size;
    }

    /// Sum of all recorded sizes, in bytes.
    pub fn total_size(&self) -> u64 {
        self.total_size
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.iter().map(|(path, _)| path.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, u64)> {
        self.files.iter()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_tracks_sum_of_sizes() {
        let mut ledger = SourceLedger::new();
        ledger.append("Main.java", 100);
        ledger.append("Util.java", 250);
        assert_eq!(ledger.total_size(), 350);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn duplicate_path_overwrites_and_last_write_wins() {
        let mut ledger = SourceLedger::new();
        ledger.append("Main.java", 100);
        ledger.append("Util.java", 250);
        ledger.append("Main.java", 40);

        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_size(), 290);
        // Overwrite re-appends at the end
        let paths: Vec<_> = ledger.paths().collect();
        assert_eq!(paths, vec!["Util.java", "Main.java"]);
    }

    #[test]
    fn total_invariant_holds_over_random_mixes() {
        // Deterministic pseudo-random path/size mix
        let mut ledger = SourceLedger::new();
        let mut seed = 0x2545_f491u64;
        for _ in 0..500 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let path = format!("file-{}.java", seed % 37);
            let size = seed % 10_000;
            ledger.append(path, size);
        }
        let expected: u64 = ledger.iter().map(|(_, size)| size).sum();
        assert_eq!(ledger.total_size(), expected);
        assert!(ledger.len() <= 37);
    }
}
