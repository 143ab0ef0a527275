//! Similarity report rendering and CSV export
//!
//! One row per group: label, comma-joined aspect descriptions, then the
//! member students in discovery order. The widest group determines the
//! column count; narrower groups leave trailing columns blank.

use crate::analyze::SimilarityGroup;
use crate::normalize::Assignment;
use crate::NormlabResult;
use std::path::Path;

/// Build the report table: header plus one row per group, all rows padded
/// to the header width.
pub fn render_rows(
    groups: &[SimilarityGroup],
    assignments: &[Assignment],
) -> (Vec<String>, Vec<Vec<String>>) {
    let widest = groups.iter().map(|g| g.members.len()).max().unwrap_or(0);

    let mut header = vec![String::new(), "Similar Aspects".to_string()];
    for n in 1..=widest {
        header.push(format!("Student {n}"));
    }

    let rows = groups
        .iter()
        .enumerate()
        .map(|(n, group)| {
            let mut row = vec![format!("Group {}", n + 1), group.aspects.describe()];
            row.extend(
                group
                    .members
                    .iter()
                    .map(|&index| assignments[index].student.to_string()),
            );
            row.resize(header.len(), String::new());
            row
        })
        .collect();

    (header, rows)
}

/// Write the similarity report as CSV.
pub fn write_csv(
    path: &Path,
    groups: &[SimilarityGroup],
    assignments: &[Assignment],
) -> NormlabResult<()> {
    let (header, rows) = render_rows(groups, assignments);
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&header)?;
    for row in &rows {
        writer.write_record(row)?;
    }
    writer.flush()?;
    Ok(())
}

// ─── Tests ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::Aspects;
    use crate::student::Student;

    fn assignment(number: &str, name: &str) -> Assignment {
        Assignment::new("03", Student::new(number, name), Path::new("/tmp/lab"))
    }

    #[test]
    fn widest_group_sizes_the_header() {
        let assignments = vec![
            assignment("1", "a"),
            assignment("2", "b"),
            assignment("3", "c"),
        ];
        let groups = vec![
            SimilarityGroup {
                aspects: Aspects {
                    size: true,
                    ..Aspects::default()
                },
                members: vec![0, 1, 2],
            },
            SimilarityGroup {
                aspects: Aspects {
                    report_name: true,
                    ..Aspects::default()
                },
                members: vec![0, 2],
            },
        ];

        let (header, rows) = render_rows(&groups, &assignments);
        assert_eq!(
            header,
            vec!["", "Similar Aspects", "Student 1", "Student 2", "Student 3"]
        );
        assert_eq!(
            rows[0],
            vec!["Group 1", "similar size", "1-a", "2-b", "3-c"]
        );
        // Narrower group pads its trailing column
        assert_eq!(
            rows[1],
            vec!["Group 2", "similar report name", "1-a", "3-c", ""]
        );
    }

    #[test]
    fn empty_result_renders_bare_header() {
        let (header, rows) = render_rows(&[], &[]);
        assert_eq!(header, vec!["", "Similar Aspects"]);
        assert!(rows.is_empty());
    }
}
