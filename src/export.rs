//! CSV formatting of record sequences.
//!
//! Pure formatting only; delivering the text to a file or download is the
//! caller's concern. Every field is quoted and missing nested detail
//! values render as empty strings.

use crate::model::Employee;

/// Fixed header row, one column per exported value.
pub const CSV_HEADERS: [&str; 12] = [
    "Name",
    "Email",
    "Role",
    "Department",
    "Location",
    "Joined Date",
    "Manager",
    "Projects",
    "Performance (2023)",
    "Performance (2022)",
    "Skills",
    "Last Promotion Date",
];

/// Renders `rows` as CSV text with the fixed header. Projects and skills
/// are joined with `"; "`.
pub fn to_csv<'a>(rows: impl IntoIterator<Item = &'a Employee>) -> Result<String, csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(vec![]);

    wtr.write_record(CSV_HEADERS)?;
    for emp in rows {
        let projects = emp.details.projects.join("; ");
        let skills = emp.details.skills.join("; ");
        let score_2023 = emp.details.score_for("2023");
        let score_2022 = emp.details.score_for("2022");
        wtr.write_record([
            emp.name.as_str(),
            emp.email.as_str(),
            emp.role.as_str(),
            emp.department.as_str(),
            emp.location.as_str(),
            emp.joined_date.as_str(),
            emp.details.manager.as_str(),
            projects.as_str(),
            score_2023.as_str(),
            score_2022.as_str(),
            skills.as_str(),
            emp.details.last_promotion_date.as_str(),
        ])?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
