//! The admin dashboard: every list the admin works on, what is ticked, and
//! the counters. Lists only change after the server has said yes, except
//! for lock toggles which flip first and save after.

pub mod notice;
pub mod selection;

pub use notice::{Notice, NoticeLevel};
pub use selection::Selection;

use crate::{
    api::{RestBackend, SchoolApi},
    error::{FormKind, SlateError, SlateResult},
    models::{
        additional_data::next_id, meeting::normalize_date, require, AdditionalData, AdminSettings, Leave,
        LeaveStatus, Meeting, MeetingStatus, Student, StudentStatus, Teacher, Validate,
    },
    state::{cache::TtlCache, storage::KeyValueStore},
    stats::{self, AbsenceThreshold, DashboardStats, Snapshot},
};
use futures::future::try_join_all;
use std::collections::BTreeMap;

/// Which table a selection belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Students,
    Teachers,
    AdditionalData,
}

pub struct Dashboard<B, S> {
    api: SchoolApi<B>,
    cache: TtlCache<S>,
    teachers_key: String,
    threshold: AbsenceThreshold,

    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub meetings: Vec<Meeting>,
    pub leaves: Vec<Leave>,
    pub additional_data: Vec<AdditionalData>,

    pub selected_students: Selection,
    pub selected_teachers: Selection,
    pub selected_data: Selection,

    pub stats: DashboardStats,
    pub is_loading: bool,
    pub is_saving: bool,
    notices: Vec<Notice>,
}

impl<B: RestBackend, S: KeyValueStore> Dashboard<B, S> {
    pub fn new(
        api: SchoolApi<B>,
        cache: TtlCache<S>,
        teachers_key: String,
        threshold: AbsenceThreshold,
    ) -> Self {
        Self {
            api,
            cache,
            teachers_key,
            threshold,
            students: vec![],
            teachers: vec![],
            meetings: vec![],
            leaves: vec![],
            additional_data: vec![],
            selected_students: Selection::default(),
            selected_teachers: Selection::default(),
            selected_data: Selection::default(),
            stats: DashboardStats::default(),
            is_loading: false,
            is_saving: false,
            notices: vec![],
        }
    }

    // notices

    #[must_use]
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    fn fail(&mut self, context: &str, e: &SlateError) {
        error!(?e, %context, "Dashboard operation failed");
        self.notices.push(Notice::failure(context, e));
    }

    fn succeed(&mut self, message: &str) {
        info!(%message);
        self.notices.push(Notice::success(message));
    }

    /// The value on success; on failure the error is logged and noticed.
    fn settle<T>(&mut self, context: &str, result: SlateResult<T>) -> Option<T> {
        match result {
            Ok(t) => Some(t),
            Err(e) => {
                self.fail(context, &e);
                None
            }
        }
    }

    // derived

    pub fn refresh_stats(&mut self) {
        self.stats = DashboardStats::compute(self.snapshot(), self.threshold);
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            students: &self.students,
            teachers: &self.teachers,
            leaves: &self.leaves,
            meetings: &self.meetings,
            additional_data: &self.additional_data,
        }
    }

    #[must_use]
    pub fn absences_by_class(&self) -> BTreeMap<String, u32> {
        stats::absences_by_class(&self.students)
    }

    #[must_use]
    pub fn data_by_category(&self) -> BTreeMap<String, usize> {
        stats::data_by_category(&self.additional_data)
    }

    #[must_use]
    pub fn teacher_name(&self, id: i64) -> String {
        self.teachers
            .iter()
            .find(|t| t.id == id)
            .map_or_else(|| "Inconnu".to_string(), Teacher::full_name)
    }

    fn attach_teacher_names(&mut self) {
        for leave in &mut self.leaves {
            if !leave.enseignant_nom.is_empty() {
                continue;
            }
            if let Some(teacher) = leave
                .enseignant_id
                .and_then(|id| self.teachers.iter().find(|t| t.id == id))
            {
                leave.enseignant_nom = teacher.full_name();
            }
        }
    }

    // loading

    /// Fetches all five lists at once. A failed fetch is reported and leaves
    /// that list empty (teachers fall back to the cache) without affecting
    /// the others.
    #[instrument(level = "info", skip(self))]
    pub async fn load_all(&mut self) {
        self.is_loading = true;
        self.is_saving = true;

        let (students, teachers, meetings, leaves, additional_data) = futures::join!(
            self.api.list_students(),
            self.api.list_teachers(),
            self.api.list_meetings(),
            self.api.list_leaves(),
            self.api.list_additional_data(),
        );

        self.students = self
            .settle("chargement des étudiants", students)
            .unwrap_or_default();
        match teachers {
            Ok(teachers) => {
                self.cache.save(&self.teachers_key, &teachers).await;
                self.teachers = teachers;
            }
            Err(e) => {
                self.fail("chargement des enseignants", &e);
                let cached: Vec<Teacher> = self.cache.load(&self.teachers_key).await;
                if cached.is_empty() {
                    warn!("No cached teachers to fall back on");
                } else {
                    info!(count = cached.len(), "Using cached teachers");
                    self.teachers = cached;
                }
            }
        }
        self.meetings = self
            .settle("chargement des réunions", meetings)
            .unwrap_or_default();
        self.leaves = self
            .settle("chargement des congés", leaves)
            .unwrap_or_default();
        self.additional_data = self
            .settle("chargement des données", additional_data)
            .unwrap_or_default();

        self.attach_teacher_names();
        self.refresh_stats();

        self.is_loading = false;
        self.is_saving = false;
        debug!(stats = ?self.stats, "Dashboard loaded");
    }

    pub async fn refresh_all(&mut self) {
        self.load_all().await;
        self.notices.push(Notice::info("Données rafraîchies"));
    }

    // selections

    pub fn toggle_selection(&mut self, table: Table, id: i64, checked: bool) {
        let (selection, total) = match table {
            Table::Students => (&mut self.selected_students, self.students.len()),
            Table::Teachers => (&mut self.selected_teachers, self.teachers.len()),
            Table::AdditionalData => (&mut self.selected_data, self.additional_data.len()),
        };
        selection.toggle(id, checked, total);
    }

    pub fn toggle_select_all(&mut self, table: Table, checked: bool) {
        match table {
            Table::Students => self
                .selected_students
                .toggle_all(checked, self.students.iter().map(|s| s.id)),
            Table::Teachers => self
                .selected_teachers
                .toggle_all(checked, self.teachers.iter().map(|t| t.id)),
            Table::AdditionalData => self
                .selected_data
                .toggle_all(checked, self.additional_data.iter().map(|d| d.id)),
        }
    }

    // students

    /// Creates the student if the form has no id yet, updates it otherwise.
    pub async fn save_student(&mut self, form: Student) {
        if let Err(e) = form.validate() {
            self.fail("sauvegarde étudiant", &e);
            return;
        }

        self.is_saving = true;
        let result = if form.id == 0 {
            self.api.create_student(&form).await
        } else {
            self.api.update_student(form.id, &form).await
        };
        self.is_saving = false;

        let Some(saved) = self.settle("sauvegarde étudiant", result) else {
            return;
        };
        if form.id == 0 {
            self.students.push(saved);
            self.succeed("Étudiant créé avec succès");
        } else if let Some(existing) = self.students.iter_mut().find(|s| s.id == saved.id) {
            *existing = saved;
            self.succeed("Étudiant mis à jour avec succès");
        }
        self.refresh_stats();
    }

    pub async fn delete_student(&mut self, id: i64) {
        self.is_saving = true;
        let result = self.api.delete_student(id).await;
        self.is_saving = false;

        if self.settle("suppression étudiant", result).is_some() {
            self.students.retain(|s| s.id != id);
            self.selected_students.retain(|x| x != id);
            self.refresh_stats();
            self.succeed("Étudiant supprimé");
        }
    }

    pub async fn delete_selected_students(&mut self) {
        let ids = self.selected_students.ids().to_vec();
        if ids.is_empty() {
            self.fail(
                "suppression des étudiants",
                &SlateError::NothingSelected { action: "delete" },
            );
            return;
        }

        self.is_saving = true;
        let result = try_join_all(ids.iter().map(|&id| self.api.delete_student(id))).await;
        self.is_saving = false;

        if self.settle("suppression des étudiants", result).is_some() {
            self.students.retain(|s| !ids.contains(&s.id));
            self.selected_students.clear();
            self.refresh_stats();
            self.succeed("Étudiants supprimés");
        }
    }

    /// Flips the status in the list straight away, then saves the student like
    /// any other edit. A failed save leaves the flip in place.
    pub async fn toggle_student_lock(&mut self, id: i64) {
        let Some(student) = self.students.iter_mut().find(|s| s.id == id) else {
            warn!(id, "No such student to lock/unlock");
            return;
        };
        student.status = student.status.toggled();
        let form = student.clone();

        self.refresh_stats();
        self.save_student(form).await;
    }

    /// Local only: nothing is sent until each student is saved.
    pub fn set_selected_students_status(&mut self, status: StudentStatus) {
        for student in &mut self.students {
            if self.selected_students.contains(student.id) {
                student.status = status;
            }
        }
        self.refresh_stats();
    }

    pub fn lock_selected_students(&mut self) {
        self.set_selected_students_status(StudentStatus::Locked);
    }

    pub fn unlock_selected_students(&mut self) {
        self.set_selected_students_status(StudentStatus::Active);
    }

    pub async fn send_absence_alerts(&mut self) {
        let ids = stats::students_over_threshold(&self.students, self.threshold);
        if ids.is_empty() {
            self.notices
                .push(Notice::info("Aucun étudiant avec trop d'absences"));
            return;
        }

        let result = self.api.send_absence_alerts(&ids).await;
        if self.settle("envoi des alertes d'absence", result).is_some() {
            self.succeed("Alertes d'absence envoyées");
        }
    }

    // teachers

    async fn save_teachers_to_cache(&self) {
        self.cache.save(&self.teachers_key, &self.teachers).await;
    }

    pub async fn save_teacher(&mut self, form: Teacher) {
        if let Err(e) = form.validate() {
            self.fail("sauvegarde enseignant", &e);
            return;
        }

        self.is_saving = true;
        let result = if form.id == 0 {
            self.api.create_teacher(&form).await
        } else {
            self.api.update_teacher(form.id, &form).await
        };
        self.is_saving = false;

        let Some(saved) = self.settle("sauvegarde enseignant", result) else {
            return;
        };
        if form.id == 0 {
            self.teachers.push(saved);
            self.succeed("Enseignant créé");
        } else {
            if let Some(existing) = self.teachers.iter_mut().find(|t| t.id == saved.id) {
                *existing = saved;
            }
            self.succeed("Enseignant mis à jour");
        }

        self.save_teachers_to_cache().await;
        self.refresh_stats();
    }

    pub async fn delete_teacher(&mut self, id: i64) {
        self.is_saving = true;
        let result = self.api.delete_teacher(id).await;
        self.is_saving = false;

        if self.settle("suppression enseignant", result).is_some() {
            self.teachers.retain(|t| t.id != id);
            self.selected_teachers.retain(|x| x != id);
            self.save_teachers_to_cache().await;
            self.refresh_stats();
            self.succeed("Enseignant supprimé");
        }
    }

    pub async fn delete_selected_teachers(&mut self) {
        let ids = self.selected_teachers.ids().to_vec();
        if ids.is_empty() {
            self.fail(
                "suppression des enseignants",
                &SlateError::NothingSelected { action: "delete" },
            );
            return;
        }

        self.is_saving = true;
        let result = try_join_all(ids.iter().map(|&id| self.api.delete_teacher(id))).await;
        self.is_saving = false;

        if self.settle("suppression des enseignants", result).is_some() {
            self.teachers.retain(|t| !ids.contains(&t.id));
            self.selected_teachers.clear();
            self.save_teachers_to_cache().await;
            self.refresh_stats();
            self.succeed("Enseignants supprimés");
        }
    }

    // meetings

    pub async fn save_meeting(&mut self, mut form: Meeting) {
        let checked = form
            .validate()
            .and_then(|()| normalize_date(&form.date));
        let date = match checked {
            Ok(date) => date,
            Err(e) => {
                self.fail("planification réunion", &e);
                return;
            }
        };
        form.date = date;

        self.is_saving = true;
        let result = self.api.create_meeting(&form).await;
        self.is_saving = false;

        if let Some(saved) = self.settle("planification réunion", result) {
            self.meetings.push(saved);
            self.refresh_stats();
            self.succeed("Réunion planifiée");
        }
    }

    pub async fn cancel_meeting(&mut self, id: i64) {
        let result = self.api.cancel_meeting(id).await;
        if self.settle("annulation réunion", result).is_none() {
            return;
        }

        if let Some(meeting) = self.meetings.iter_mut().find(|m| m.id == id) {
            meeting.status = MeetingStatus::Cancelled;
        }
        self.refresh_stats();
        self.succeed("Réunion annulée");
    }

    // leaves

    pub async fn save_leave(&mut self, form: Leave) {
        if let Err(e) = form.validate() {
            self.fail("enregistrement congé", &e);
            return;
        }

        self.is_saving = true;
        let result = self.api.create_leave(&form).await;
        self.is_saving = false;

        let Some(mut saved) = self.settle("enregistrement congé", result) else {
            return;
        };
        if saved.enseignant_id.is_none() {
            saved.enseignant_id = form.enseignant_id;
        }
        if let Some(teacher) = saved
            .enseignant_id
            .and_then(|id| self.teachers.iter().find(|t| t.id == id))
        {
            saved.enseignant_nom = teacher.full_name();
        }

        self.leaves.push(saved);
        self.refresh_stats();
        self.succeed("Congé enregistré");
    }

    pub async fn approve_leave(&mut self, id: i64) {
        let result = self.api.approve_leave(id).await;
        if self.settle("approbation congé", result).is_some() {
            if let Some(leave) = self.leaves.iter_mut().find(|l| l.id == id) {
                leave.statut = LeaveStatus::Approved;
            }
            self.refresh_stats();
            self.succeed("Congé approuvé");
        }
    }

    pub async fn reject_leave(&mut self, id: i64, reason: &str) {
        let result = self.api.reject_leave(id, reason).await;
        if self.settle("rejet congé", result).is_some() {
            if let Some(leave) = self.leaves.iter_mut().find(|l| l.id == id) {
                leave.statut = LeaveStatus::Rejected;
                leave.motif_rejet = Some(reason.to_string());
            }
            self.refresh_stats();
            self.succeed("Congé rejeté");
        }
    }

    // additional data

    pub async fn add_data(&mut self, form: AdditionalData) {
        if let Err(e) = form.validate() {
            self.fail("ajout de donnée", &e);
            return;
        }
        let record = AdditionalData {
            id: next_id(&self.additional_data),
            ..form
        };

        self.is_saving = true;
        let result = self.api.create_additional_data(&record).await;
        self.is_saving = false;

        if let Some(saved) = self.settle("ajout de donnée", result) {
            self.additional_data.push(saved);
            self.refresh_stats();
            self.succeed("Donnée ajoutée avec succès");
        }
    }

    pub async fn update_data(&mut self, form: AdditionalData) {
        let checked = form
            .validate()
            .and_then(|()| require(FormKind::AdditionalData, "id", form.id != 0));
        if let Err(e) = checked {
            self.fail("mise à jour de donnée", &e);
            return;
        }

        self.is_saving = true;
        let result = self.api.update_additional_data(form.id, &form).await;
        self.is_saving = false;

        let Some(saved) = self.settle("mise à jour de donnée", result) else {
            return;
        };
        if let Some(existing) = self.additional_data.iter_mut().find(|d| d.id == saved.id) {
            *existing = saved;
            self.refresh_stats();
            self.succeed("Donnée mise à jour avec succès");
        }
    }

    pub async fn delete_data(&mut self, id: i64) {
        self.is_saving = true;
        let result = self.api.delete_additional_data(id).await;
        self.is_saving = false;

        if self.settle("suppression de donnée", result).is_some() {
            self.additional_data.retain(|d| d.id != id);
            self.selected_data.retain(|x| x != id);
            self.refresh_stats();
            self.succeed("Donnée supprimée avec succès");
        }
    }

    pub async fn delete_selected_data(&mut self) {
        let ids = self.selected_data.ids().to_vec();
        if ids.is_empty() {
            self.fail(
                "suppression des données",
                &SlateError::NothingSelected { action: "delete" },
            );
            return;
        }

        self.is_saving = true;
        let result =
            try_join_all(ids.iter().map(|&id| self.api.delete_additional_data(id))).await;
        self.is_saving = false;

        if self.settle("suppression des données", result).is_some() {
            self.additional_data.retain(|d| !ids.contains(&d.id));
            self.selected_data.clear();
            self.refresh_stats();
            self.succeed("Données supprimées avec succès");
        }
    }

    // settings

    pub async fn save_settings(&mut self, form: &AdminSettings) {
        if let Err(e) = form.validate() {
            self.fail("sauvegarde paramètres", &e);
            return;
        }

        self.is_saving = true;
        let result = self.api.save_settings(form).await;
        self.is_saving = false;

        if self.settle("sauvegarde paramètres", result).is_some() {
            self.succeed("Paramètres sauvegardés");
        }
    }
}
