use super::{empty_body, RestBackend, SchoolApi};
use crate::{error::SlateResult, models::Student};
use http::Method;

impl<B: RestBackend> SchoolApi<B> {
    pub async fn list_students(&self) -> SlateResult<Vec<Student>> {
        self.list(&self.admin("/etudiants")).await
    }

    pub async fn get_student(&self, id: i64) -> SlateResult<Student> {
        self.one(Method::GET, &self.admin(format!("/etudiants/{id}")), None)
            .await
    }

    pub async fn create_student(&self, student: &Student) -> SlateResult<Student> {
        self.write(Method::POST, &self.admin("/etudiants"), &student.to_payload())
            .await
    }

    pub async fn update_student(&self, id: i64, student: &Student) -> SlateResult<Student> {
        self.write(
            Method::PUT,
            &self.admin(format!("/etudiants/{id}")),
            &student.to_payload(),
        )
        .await
    }

    pub async fn delete_student(&self, id: i64) -> SlateResult<()> {
        self.unit(Method::DELETE, &self.admin(format!("/etudiants/{id}")), None)
            .await
    }

    pub async fn lock_student(&self, id: i64) -> SlateResult<()> {
        self.unit(
            Method::PATCH,
            &self.admin(format!("/etudiants/{id}/lock")),
            empty_body(),
        )
        .await
    }

    pub async fn unlock_student(&self, id: i64) -> SlateResult<()> {
        self.unit(
            Method::PATCH,
            &self.admin(format!("/etudiants/{id}/unlock")),
            empty_body(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::api::{backend::fake::ScriptedBackend, tests::api};
    use crate::models::{ClassRef, StudentStatus};
    use http::Method;
    use serde_json::json;

    #[tokio::test]
    async fn list_reads_the_wrapped_envelope() {
        let backend = ScriptedBackend::new().on(
            Method::GET,
            "/admin/etudiants",
            json!({"success": true, "data": [
                {"id": 1, "nom": "Martin", "status": "active", "classe": "6ème A", "absences": 2},
                {"id": 2, "nom": "Bernard", "status": "locked", "absences": [{"id": 3}]}
            ]}),
        );
        let students = api(&backend).list_students().await.unwrap();

        assert_eq!(students.len(), 2);
        assert_eq!(students[0].classe, Some(ClassRef::Name("6ème A".into())));
        assert_eq!(students[1].status, StudentStatus::Locked);
        assert_eq!(students[1].absences, 1);
    }

    #[tokio::test]
    async fn lock_and_unlock_send_an_empty_body() {
        let backend = ScriptedBackend::new()
            .on(Method::PATCH, "/admin/etudiants/5/lock", json!(null))
            .on(Method::PATCH, "/admin/etudiants/5/unlock", json!({"success": true}));
        let api = api(&backend);

        api.lock_student(5).await.unwrap();
        api.unlock_student(5).await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].body, Some(json!({})));
    }

    #[tokio::test]
    async fn created_student_comes_back_with_its_id() {
        let backend = ScriptedBackend::new().on(
            Method::POST,
            "/admin/etudiants",
            json!({"success": true, "data": {"id": 42, "nom": "Petit", "prenom": "Léo"}}),
        );
        let student = crate::models::Student {
            nom: "Petit".into(),
            prenom: "Léo".into(),
            notes: Some(vec![]),
            ..Default::default()
        };

        let created = api(&backend).create_student(&student).await.unwrap();
        assert_eq!(created.id, 42);
        assert_eq!(backend.calls()[0].body.as_ref().unwrap()["notes"], json!(null));
    }
}
