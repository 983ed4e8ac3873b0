use super::{empty_body, RestBackend, SchoolApi};
use crate::{error::SlateResult, models::Note};
use http::Method;

impl<B: RestBackend> SchoolApi<B> {
    pub async fn add_grade(&self, student_id: i64, course_id: i64, note: &Note) -> SlateResult<Note> {
        self.write(
            Method::POST,
            &self.admin(format!("/etudiants/{student_id}/cours/{course_id}/notes")),
            note,
        )
        .await
    }

    pub async fn delete_grade(&self, student_id: i64, note_id: i64) -> SlateResult<()> {
        self.unit(
            Method::DELETE,
            &self.admin(format!("/etudiants/{student_id}/notes/{note_id}")),
            None,
        )
        .await
    }

    pub async fn justify_absence(&self, student_id: i64, absence_id: i64) -> SlateResult<()> {
        self.unit(
            Method::PUT,
            &self.admin(format!(
                "/etudiants/{student_id}/absences/{absence_id}/justifier"
            )),
            empty_body(),
        )
        .await
    }

    pub async fn delete_absence(&self, student_id: i64, absence_id: i64) -> SlateResult<()> {
        self.unit(
            Method::DELETE,
            &self.admin(format!("/etudiants/{student_id}/absences/{absence_id}")),
            None,
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
    async fn grade_and_absence_paths() {
        let backend = ScriptedBackend::new()
            .on(
                Method::POST,
                "/admin/etudiants/3/cours/5/notes",
                json!({"success": true, "data": {"id": 11, "valeur": 16.5, "type": "TP"}}),
            )
            .on(Method::DELETE, "/admin/etudiants/3/notes/11", json!(null))
            .on(Method::PUT, "/admin/etudiants/3/absences/2/justifier", json!({"id": 2, "justifiee": true}))
            .on(Method::DELETE, "/admin/etudiants/3/absences/2", json!(null));
        let api = api(&backend);

        let note = api
            .add_grade(
                3,
                5,
                &Note {
                    valeur: 16.5,
                    kind: Some("TP".into()),
                    ..Note::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(note.id, 11);
        assert_eq!(note.kind.as_deref(), Some("TP"));

        api.delete_grade(3, 11).await.unwrap();
        api.justify_absence(3, 2).await.unwrap();
        api.delete_absence(3, 2).await.unwrap();
        assert_eq!(backend.calls().len(), 4);
    }
}
