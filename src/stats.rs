use crate::models::{AdditionalData, Leave, Meeting, MeetingStatus, Student, Teacher};
use serde::Serialize;
use std::collections::BTreeMap;

pub const NO_CLASS_LABEL: &str = "Aucune classe";

/// When a student's absence count counts as "too many". The dashboard and the
/// teacher gradebook draw the line in different places, so each call site says
/// which rule it uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbsenceThreshold {
    AtLeast(u32),
    MoreThan(u32),
}

impl AbsenceThreshold {
    #[must_use]
    pub fn exceeded_by(self, absences: u32) -> bool {
        match self {
            Self::AtLeast(n) => absences >= n,
            Self::MoreThan(n) => absences > n,
        }
    }
}

impl Default for AbsenceThreshold {
    fn default() -> Self {
        Self::AtLeast(3)
    }
}

/// Borrowed view of everything the counters are computed from.
#[derive(Debug, Clone, Copy, Default)]
pub struct Snapshot<'a> {
    pub students: &'a [Student],
    pub teachers: &'a [Teacher],
    pub leaves: &'a [Leave],
    pub meetings: &'a [Meeting],
    pub additional_data: &'a [AdditionalData],
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub active_students: usize,
    pub teachers_count: usize,
    pub locked_accounts: usize,
    pub late_students: usize,
    pub students_with_excessive_absences: usize,
    pub pending_leaves: usize,
    pub planned_meetings: usize,
    pub total_additional_data: usize,
}

impl DashboardStats {
    /// Full recompute from the lists; there is no incremental path.
    #[must_use]
    pub fn compute(snapshot: Snapshot<'_>, threshold: AbsenceThreshold) -> Self {
        let Snapshot {
            students,
            teachers,
            leaves,
            meetings,
            additional_data,
        } = snapshot;

        Self {
            active_students: students.iter().filter(|s| s.is_active()).count(),
            teachers_count: teachers.len(),
            locked_accounts: students.iter().filter(|s| !s.is_active()).count(),
            late_students: students.iter().filter(|s| s.absences > 0).count(),
            students_with_excessive_absences: students
                .iter()
                .filter(|s| threshold.exceeded_by(s.absences))
                .count(),
            pending_leaves: leaves.iter().filter(|l| l.is_pending()).count(),
            planned_meetings: meetings
                .iter()
                .filter(|m| m.status == MeetingStatus::Planned)
                .count(),
            total_additional_data: additional_data.len(),
        }
    }
}

#[must_use]
pub fn students_over_threshold(students: &[Student], threshold: AbsenceThreshold) -> Vec<i64> {
    students
        .iter()
        .filter(|s| threshold.exceeded_by(s.absences))
        .map(|s| s.id)
        .collect()
}

/// Total absences per class name. Students without a class are left out; if
/// nobody has one the result is a single zeroed "no class" bucket.
#[must_use]
pub fn absences_by_class(students: &[Student]) -> BTreeMap<String, u32> {
    let mut out = BTreeMap::new();
    for student in students {
        if let Some(class) = student.class_name() {
            *out.entry(class.to_string()).or_insert(0) += student.absences;
        }
    }

    if out.is_empty() {
        out.insert(NO_CLASS_LABEL.to_string(), 0);
    }
    out
}

#[must_use]
pub fn data_by_category(data: &[AdditionalData]) -> BTreeMap<String, usize> {
    let mut out = BTreeMap::new();
    for item in data {
        *out.entry(item.category.clone()).or_insert(0) += 1;
    }
    out
}
