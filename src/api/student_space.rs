//! Endpoints the student-facing screens use, outside the admin prefix.

use super::{payload, RestBackend, SchoolApi};
use crate::{
    error::SlateResult,
    models::{Absence, Course, Note, Student},
};
use http::Method;
use serde::Serialize;
use serde_json::{json, Value};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherEmail {
    pub teacher_email: String,
    pub subject: String,
    pub message: String,
}

/// Plain-text endpoints answer with a JSON string, or an envelope with a
/// `message`/`data` in it.
fn text_of(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        Value::Object(map) => map
            .get("data")
            .or_else(|| map.get("message"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    }
}

impl<B: RestBackend> SchoolApi<B> {
    pub async fn students_in_class(&self, class_id: i64) -> SlateResult<Vec<Student>> {
        self.list(&format!("/etudiants/classe/{class_id}")).await
    }

    pub async fn send_email_to_teacher(
        &self,
        student_id: i64,
        email: &TeacherEmail,
    ) -> SlateResult<String> {
        let raw = self
            .call(
                Method::POST,
                &format!("/etudiants/{student_id}/send-email"),
                Some(payload(email)?),
            )
            .await?;
        Ok(text_of(&raw))
    }

    pub async fn student_email(&self, student_id: i64) -> SlateResult<String> {
        let raw = self
            .call(Method::GET, &format!("/etudiants/{student_id}/email"), None)
            .await?;
        Ok(text_of(&raw))
    }

    pub async fn student_courses(&self, student_id: i64) -> SlateResult<Vec<Course>> {
        self.list(&format!("/etudiants/{student_id}/cours")).await
    }

    pub async fn student_grades(&self, student_id: i64) -> SlateResult<Vec<Note>> {
        self.list(&format!("/etudiants/{student_id}/notes")).await
    }

    pub async fn student_absences(&self, student_id: i64) -> SlateResult<Vec<Absence>> {
        self.list(&format!("/etudiants/{student_id}/absences")).await
    }

    pub async fn all_courses(&self) -> SlateResult<Vec<Course>> {
        self.list("/etudiants/all/cours").await
    }

    pub async fn submit_justification(
        &self,
        student_id: i64,
        absence_id: i64,
        justification: &str,
    ) -> SlateResult<()> {
        self.unit(
            Method::POST,
            &format!("/etudiants/{student_id}/absences/{absence_id}/justifier"),
            Some(json!({ "justification": justification })),
        )
        .await
    }

    // the student portal, keyed by student id
    pub async fn portal_courses(&self, student_id: i64) -> SlateResult<Vec<Course>> {
        self.list(&format!("/student/courses/{student_id}")).await
    }

    pub async fn portal_absences(&self, student_id: i64) -> SlateResult<Vec<Absence>> {
        self.list(&format!("/student/absences/{student_id}")).await
    }

    pub async fn portal_grades(&self, student_id: i64) -> SlateResult<Vec<Note>> {
        self.list(&format!("/student/grades/{student_id}")).await
    }
}
