//! Student identity and roster lookup
//!
//! The roster is a CSV export from the course system: header row discarded,
//! registration number in the first field, short display name in the third.

use crate::{NormlabError, NormlabResult};
use std::collections::HashMap;
use std::path::Path;

/// Width of the fixed registration number prefixed to every submission name
pub const STUDENT_ID_WIDTH: usize = 13;

/// One student: registration number plus short display name.
/// Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub number: String,
    pub name: String,
}

impl Student {
    pub fn new(number: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for Student {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.number, self.name)
    }
}

/// Registration-number → display-name lookup loaded from the roster CSV
#[derive(Debug, Clone, Default)]
pub struct Roster {
    names: HashMap<String, String>,
}

impl Roster {
    pub fn load(path: &Path) -> NormlabResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let mut names = HashMap::new();
        for record in reader.records() {
            let record = record?;
            let number = record
                .get(0)
                .ok_or_else(|| NormlabError::Roster("missing student number field".into()))?;
            let name = record
                .get(2)
                .ok_or_else(|| NormlabError::Roster("missing display name field".into()))?;
            names.insert(number.trim().to_string(), name.trim().to_string());
        }
        Ok(Self { names })
    }

    pub fn get(&self, number: &str) -> Option<&str> {
        self.names.get(number).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn student_display_is_number_dash_name() {
        let s = Student::new("2021302181234", "zs");
        assert_eq!(s.to_string(), "2021302181234-zs");
    }

    #[test]
    fn roster_skips_header_and_reads_first_and_third_fields() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "number,fullname,shortname").unwrap();
        writeln!(file, "2021302181234,Zhang San,zs").unwrap();
        writeln!(file, "2021302181235,Li Si,ls").unwrap();

        let roster = Roster::load(file.path()).unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster.get("2021302181234"), Some("zs"));
        assert_eq!(roster.get("2021302181235"), Some("ls"));
        assert_eq!(roster.get("0000000000000"), None);
    }
}
