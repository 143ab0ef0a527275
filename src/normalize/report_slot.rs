//! Report slot — the single retained graded document per submission
//!
//! Each student gets exactly one valid lab report, so only the largest
//! report-like document ever seen is kept. The slot starts unset; updates
//! are monotonic in size.

#[derive(Debug, Clone, Default)]
pub struct ReportSlot {
    held: Option<(String, u64)>,
}

impl ReportSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held report iff `size` strictly exceeds the held size
    /// (an unset slot accepts anything). Returns whether a replacement
    /// occurred. Multiplicity warnings are the caller's concern.
    pub fn cmp_update(&mut self, filename: &str, size: u64) -> bool {
        match &self.held {
            Some((_, held)) if size <= *held => false,
            _ => {
                self.held = Some((filename.to_string(), size));
                true
            }
        }
    }

    pub fn is_set(&self) -> bool {
        self.held.is_some()
    }

    /// Original filename of the retained report, as it appeared in the archive.
    pub fn filename(&self) -> Option<&str> {
        self.held.as_ref().map(|(name, _)| name.as_str())
    }

    pub fn size(&self) -> Option<u64> {
        self.held.as_ref().map(|(_, size)| *size)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────
