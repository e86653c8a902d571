//! Course requirement model.
//!
//! A course requirement is a weekly teaching obligation: a class-section
//! must receive `weekly_hours` of a subject, taught by any of the listed
//! faculty members, in a room of the matching session kind.
//!
//! Raw tabular rows ([`CourseRow`]) are normalized here so the search
//! engine only ever sees well-typed requirements.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of teaching session. Determines which room pool is eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SessionKind {
    /// Theory session held in a lecture room.
    Lecture,
    /// Practical session held in a lab.
    Lab,
}

impl SessionKind {
    /// Lenient parse used at the ingestion boundary.
    ///
    /// Any label containing `Lab` is a lab; everything else is a lecture.
    pub fn from_label(label: &str) -> Self {
        if label.contains("Lab") {
            SessionKind::Lab
        } else {
            SessionKind::Lecture
        }
    }
}

impl fmt::Display for SessionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionKind::Lecture => write!(f, "Lecture"),
            SessionKind::Lab => write!(f, "Lab"),
        }
    }
}

/// A weekly teaching obligation for one class-section.
///
/// Co-taught courses list several faculty members; each session is taught
/// by one of them, chosen independently per session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseRequirement {
    /// Class-section identifier (e.g. `CS-5A`).
    pub class_section: String,
    /// Subject name.
    pub subject: String,
    /// Subject code.
    pub subject_code: String,
    /// Faculty members allowed to teach this course.
    pub faculty: Vec<String>,
    /// Session kind.
    pub kind: SessionKind,
    /// Required weekly hours.
    pub weekly_hours: u32,
}

impl CourseRequirement {
    /// Creates a lecture requirement with no faculty and zero hours.
    pub fn new(class_section: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            class_section: class_section.into(),
            subject: subject.into(),
            subject_code: String::new(),
            faculty: Vec::new(),
            kind: SessionKind::Lecture,
            weekly_hours: 0,
        }
    }

    /// Sets the subject code.
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.subject_code = code.into();
        self
    }

    /// Adds a faculty member.
    pub fn with_faculty(mut self, faculty: impl Into<String>) -> Self {
        self.faculty.push(faculty.into());
        self
    }

    /// Sets the session kind.
    pub fn with_kind(mut self, kind: SessionKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the required weekly hours.
    pub fn with_hours(mut self, hours: u32) -> Self {
        self.weekly_hours = hours;
        self
    }

    /// Whether the given faculty member may teach this course.
    pub fn is_taught_by(&self, faculty: &str) -> bool {
        self.faculty.iter().any(|f| f == faculty)
    }

    /// Normalizes a raw row.
    ///
    /// Faculty are split on `;` and trimmed; unparseable or negative hours
    /// become 0. Returns `None` when the row names no faculty at all.
    pub fn from_row(row: &CourseRow) -> Option<Self> {
        let faculty: Vec<String> = row
            .faculty
            .split(';')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if faculty.is_empty() {
            return None;
        }

        let weekly_hours = row
            .hours
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|h| h.is_finite() && *h > 0.0)
            .map(|h| h as u32)
            .unwrap_or(0);

        Some(Self {
            class_section: row.class_section.trim().to_string(),
            subject: row.subject.trim().to_string(),
            subject_code: row.code.trim().to_string(),
            faculty,
            kind: SessionKind::from_label(&row.kind),
            weekly_hours,
        })
    }
}

/// A course row as it arrives from a tabular source.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CourseRow {
    #[serde(rename = "Class")]
    pub class_section: String,
    #[serde(rename = "Subject")]
    pub subject: String,
    #[serde(rename = "Code", default)]
    pub code: String,
    #[serde(rename = "Faculty", default)]
    pub faculty: String,
    #[serde(rename = "Type", default)]
    pub kind: String,
    #[serde(rename = "Hours", default)]
    pub hours: String,
}

/// Normalizes a batch of rows, silently skipping rows without faculty.
pub fn requirements_from_rows(rows: &[CourseRow]) -> Vec<CourseRequirement> {
    rows.iter().filter_map(CourseRequirement::from_row).collect()
}
