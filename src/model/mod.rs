//! Employee record model and seed-data ingestion.
//!
//! Records are loaded once from JSON (a bundled dataset or a user-supplied
//! file) and owned exclusively by the engine afterwards. Identifiers are
//! assigned at ingestion and never reused or mutated.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dataset shipped with the binary, used when no `--data` path is given.
const BUNDLED_DATASET: &str = include_str!("../../data/employees.json");

/// Nested detail block of a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmployeeDetails {
    pub manager: String,
    pub projects: Vec<String>,
    /// Year -> review score.
    pub performance: BTreeMap<String, f64>,
    pub skills: Vec<String>,
    pub last_promotion_date: String,
}

impl EmployeeDetails {
    /// Review score for a year, formatted for display. Missing years render
    /// as empty string.
    pub fn score_for(&self, year: &str) -> String {
        self.performance
            .get(year)
            .map(|s| format!("{s}"))
            .unwrap_or_default()
    }
}

/// One employee entity. Scalar fields plus a nested detail block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub location: String,
    /// ISO-8601 date, possibly with a time-of-day suffix.
    #[serde(default)]
    pub joined_date: String,
    #[serde(default)]
    pub details: EmployeeDetails,
}

impl Employee {
    /// String value of a scalar/filterable field. Missing values coerce to
    /// empty string so filtering and sorting never special-case them.
    pub fn value_of(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Role => &self.role,
            Field::Department => &self.department,
            Field::Location => &self.location,
            Field::JoinedDate => &self.joined_date,
            Field::Manager => &self.details.manager,
        }
    }

    /// Joined date truncated to the calendar day. `None` when the stored
    /// string does not carry a parseable date.
    pub fn joined_day(&self) -> Option<NaiveDate> {
        let day = self.joined_date.split('T').next()?;
        NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
    }
}

/// Column identity for filtering, sorting, and editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    Name,
    Email,
    Role,
    Department,
    Location,
    JoinedDate,
    Manager,
}

impl Field {
    /// Every filterable column, in display order.
    pub fn all() -> &'static [Field] {
        &[
            Field::Name,
            Field::Email,
            Field::Role,
            Field::Department,
            Field::Location,
            Field::JoinedDate,
            Field::Manager,
        ]
    }

    /// Column header label.
    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Role => "Role",
            Field::Department => "Department",
            Field::Location => "Location",
            Field::JoinedDate => "Joined Date",
            Field::Manager => "Manager",
        }
    }

    /// In-place editing is restricted to the scalar identity fields. The
    /// identifier, the joined date, and the detail block are read-only.
    pub fn editable(&self) -> bool {
        matches!(
            self,
            Field::Name | Field::Email | Field::Role | Field::Department | Field::Location
        )
    }

    /// Manager lives in the detail block and is filterable but not a sort
    /// column.
    pub fn sortable(&self) -> bool {
        !matches!(self, Field::Manager)
    }

    pub fn next(&self) -> Field {
        let all = Field::all();
        let idx = all.iter().position(|f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Ingestion failure: unreadable file, malformed JSON, or duplicate ids.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    DuplicateId(u64),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read dataset: {e}"),
            LoadError::Parse(e) => write!(f, "failed to parse dataset: {e}"),
            LoadError::DuplicateId(id) => write!(f, "duplicate record id {id} in dataset"),
        }
    }
}

impl std::error::Error for LoadError {}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(e: serde_json::Error) -> Self {
        LoadError::Parse(e)
    }
}

fn check_unique_ids(records: &[Employee]) -> Result<(), LoadError> {
    let mut seen = HashSet::with_capacity(records.len());
    for rec in records {
        if !seen.insert(rec.id) {
            return Err(LoadError::DuplicateId(rec.id));
        }
    }
    Ok(())
}

/// Parses an ordered record sequence from JSON text.
pub fn parse_employees(json: &str) -> Result<Vec<Employee>, LoadError> {
    let records: Vec<Employee> = serde_json::from_str(json)?;
    check_unique_ids(&records)?;
    Ok(records)
}

/// Loads records from a JSON file.
pub fn load_employees(path: impl AsRef<Path>) -> Result<Vec<Employee>, LoadError> {
    let text = std::fs::read_to_string(path)?;
    parse_employees(&text)
}

/// Parses the dataset bundled into the binary.
pub fn bundled_employees() -> Result<Vec<Employee>, LoadError> {
    parse_employees(BUNDLED_DATASET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_dataset_parses_with_unique_ids() {
        let records = bundled_employees().expect("bundled dataset must parse");
        assert!(!records.is_empty());
        let mut ids: Vec<u64> = records.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), records.len());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            {"id": 1, "name": "A"},
            {"id": 1, "name": "B"}
        ]"#;
        match parse_employees(json) {
            Err(LoadError::DuplicateId(1)) => {}
            other => panic!("expected DuplicateId(1), got {other:?}"),
        }
    }

    #[test]
    fn missing_fields_coerce_to_empty() {
        let json = r#"[{"id": 7}]"#;
        let records = parse_employees(json).expect("parse");
        let rec = &records[0];
        assert_eq!(rec.value_of(Field::Name), "");
        assert_eq!(rec.value_of(Field::Manager), "");
        assert_eq!(rec.details.score_for("2023"), "");
        assert!(rec.joined_day().is_none());
    }

    #[test]
    fn joined_day_truncates_time_of_day() {
        let rec = Employee {
            id: 1,
            joined_date: "2021-05-14T13:45:00".to_string(),
            ..Employee::default()
        };
        assert_eq!(
            rec.joined_day(),
            NaiveDate::from_ymd_opt(2021, 5, 14)
        );
    }

    #[test]
    fn editable_excludes_identifier_and_details() {
        assert!(Field::Name.editable());
        assert!(Field::Location.editable());
        assert!(!Field::JoinedDate.editable());
        assert!(!Field::Manager.editable());
    }
}
