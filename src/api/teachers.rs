use super::{payload, RestBackend, SchoolApi};
use crate::{
    error::SlateResult,
    models::{Course, Leave, LeaveRequest, NoteUpdate, Teacher},
};
use http::Method;

impl<B: RestBackend> SchoolApi<B> {
    pub async fn list_teachers(&self) -> SlateResult<Vec<Teacher>> {
        self.list(&self.admin("/enseignants")).await
    }

    pub async fn get_teacher(&self, id: i64) -> SlateResult<Teacher> {
        self.one(Method::GET, &self.admin(format!("/enseignants/{id}")), None)
            .await
    }

    pub async fn create_teacher(&self, teacher: &Teacher) -> SlateResult<Teacher> {
        self.write(Method::POST, &self.admin("/enseignants"), teacher)
            .await
    }

    pub async fn update_teacher(&self, id: i64, teacher: &Teacher) -> SlateResult<Teacher> {
        self.write(Method::PUT, &self.admin(format!("/enseignants/{id}")), teacher)
            .await
    }

    pub async fn delete_teacher(&self, id: i64) -> SlateResult<()> {
        self.unit(Method::DELETE, &self.admin(format!("/enseignants/{id}")), None)
            .await
    }

    // teacher space

    pub async fn teacher_leaves(&self, teacher_id: i64) -> SlateResult<Vec<Leave>> {
        self.list(&format!("/enseignants/{teacher_id}/conges")).await
    }

    pub async fn submit_leave(&self, request: &LeaveRequest) -> SlateResult<Leave> {
        self.one(Method::POST, "/enseignants/conges", Some(payload(request)?))
            .await
    }

    pub async fn update_own_info(&self, teacher: &Teacher) -> SlateResult<Teacher> {
        self.write(Method::PUT, &format!("/enseignants/{}", teacher.id), teacher)
            .await
    }

    pub async fn teacher_courses(&self, teacher_id: i64) -> SlateResult<Vec<Course>> {
        self.list(&format!("/enseignants/{teacher_id}/cours")).await
    }

    pub async fn update_grade(&self, teacher_id: i64, update: &NoteUpdate) -> SlateResult<()> {
        self.unit(
            Method::PUT,
            &format!(
                "/enseignants/{teacher_id}/cours/{}/etudiant/{}/note",
                update.cours_id, update.student_id
            ),
            Some(payload(update)?),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{backend::fake::ScriptedBackend, tests::api};
    use serde_json::json;

    #[tokio::test]
    async fn teacher_space_paths() {
        let backend = ScriptedBackend::new()
            .on(Method::GET, "/enseignants/7/cours", json!([{"id": 1, "nom": "Chimie", "enseignant": {"id": 7}}]))
            .on(Method::PUT, "/enseignants/7/cours/1/etudiant/12/note", json!(null))
            .on(
                Method::POST,
                "/enseignants/conges",
                json!({"id": 30, "teacherId": 7, "startDate": "2024-05-02", "endDate": "2024-05-03", "status": "pending"}),
            );
        let api = api(&backend);

        let courses = api.teacher_courses(7).await.unwrap();
        assert_eq!(courses[0].enseignant_id, Some(7));

        api.update_grade(
            7,
            &NoteUpdate {
                student_id: 12,
                cours_id: 1,
                kind: "examen".into(),
                note: 14.5,
            },
        )
        .await
        .unwrap();
        assert_eq!(
            backend.calls()[1].body,
            Some(json!({"studentId": 12, "coursId": 1, "type": "examen", "note": 14.5}))
        );

        let leave = api
            .submit_leave(&LeaveRequest::new(
                7,
                "2024-05-02".into(),
                "2024-05-03".into(),
                "Formation".into(),
            ))
            .await
            .unwrap();
        assert_eq!(leave.id, 30);
        assert_eq!(leave.enseignant_id, Some(7));
        assert!(leave.is_pending());
    }
}
