//! The teacher's per-course mark sheet: a practical (TP) mark and an exam mark
//! per student, plus a running absence count.

use crate::{
    api::{RestBackend, SchoolApi},
    error::{SlateError, SlateResult},
    models::{Course, NoteUpdate, Student},
    stats::AbsenceThreshold,
};
use futures::future::try_join_all;

pub const MAX_MARK: f64 = 20.0;

fn check_mark(mark: f64) -> SlateResult<f64> {
    if (0.0..=MAX_MARK).contains(&mark) {
        Ok(mark)
    } else {
        Err(SlateError::MarkOutOfRange { mark })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradebookEntry {
    pub student_id: i64,
    pub name: String,
    pub tp: Option<f64>,
    pub exam: Option<f64>,
    pub absences: u32,
}

impl GradebookEntry {
    #[must_use]
    pub fn for_student(student: &Student) -> Self {
        Self {
            student_id: student.id,
            name: student.full_name(),
            tp: None,
            exam: None,
            absences: student.absences,
        }
    }

    /// Out-of-range marks are refused and leave the old one in place.
    pub fn set_tp(&mut self, mark: f64) -> SlateResult<()> {
        self.tp = Some(check_mark(mark)?);
        Ok(())
    }

    pub fn set_exam(&mut self, mark: f64) -> SlateResult<()> {
        self.exam = Some(check_mark(mark)?);
        Ok(())
    }

    /// Returns whether the marks were wiped.
    pub fn mark_absent(&mut self, rule: AbsenceThreshold) -> bool {
        self.absences = self.absences.saturating_add(1);
        self.enforce(rule)
    }

    pub fn mark_present(&mut self, rule: AbsenceThreshold) -> bool {
        self.absences = self.absences.saturating_sub(1);
        self.enforce(rule)
    }

    fn enforce(&mut self, rule: AbsenceThreshold) -> bool {
        if rule.exceeded_by(self.absences) {
            warn!(student = %self.name, absences = self.absences, "Too many absences, marks reset");
            self.tp = Some(0.0);
            self.exam = Some(0.0);
            true
        } else {
            false
        }
    }

    /// Missing marks count as zero.
    #[must_use]
    pub fn average(&self) -> f64 {
        (self.tp.unwrap_or_default() + self.exam.unwrap_or_default()) / 2.0
    }

    fn updates(&self, course_id: i64) -> impl Iterator<Item = NoteUpdate> + '_ {
        [("tp", self.tp), ("exam", self.exam)]
            .into_iter()
            .filter_map(move |(kind, mark)| {
                mark.map(|note| NoteUpdate {
                    student_id: self.student_id,
                    cours_id: course_id,
                    kind: kind.to_string(),
                    note,
                })
            })
    }
}

#[derive(Debug, Clone)]
pub struct Gradebook {
    pub course: Course,
    pub entries: Vec<GradebookEntry>,
    rule: AbsenceThreshold,
}

impl Gradebook {
    #[must_use]
    pub fn new(course: Course, students: &[Student], rule: AbsenceThreshold) -> Self {
        Self {
            course,
            entries: students.iter().map(GradebookEntry::for_student).collect(),
            rule,
        }
    }

    pub fn entry_mut(&mut self, student_id: i64) -> Option<&mut GradebookEntry> {
        self.entries.iter_mut().find(|e| e.student_id == student_id)
    }

    /// `None` if the student isn't on this sheet.
    pub fn mark_absent(&mut self, student_id: i64) -> Option<bool> {
        let rule = self.rule;
        self.entry_mut(student_id).map(|e| e.mark_absent(rule))
    }

    pub fn mark_present(&mut self, student_id: i64) -> Option<bool> {
        let rule = self.rule;
        self.entry_mut(student_id).map(|e| e.mark_present(rule))
    }

    #[must_use]
    pub fn class_average(&self) -> Option<f64> {
        if self.entries.is_empty() {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let count = self.entries.len() as f64;
        Some(self.entries.iter().map(GradebookEntry::average).sum::<f64>() / count)
    }

    /// Sends every mark that has been set, all at once.
    #[instrument(level = "debug", skip(self, api), fields(course = self.course.id))]
    pub async fn submit<B: RestBackend>(
        &self,
        api: &SchoolApi<B>,
        teacher_id: i64,
    ) -> SlateResult<usize> {
        let updates: Vec<NoteUpdate> = self
            .entries
            .iter()
            .flat_map(|e| e.updates(self.course.id))
            .collect();

        try_join_all(updates.iter().map(|u| api.update_grade(teacher_id, u))).await?;
        Ok(updates.len())
    }
}
