use super::{empty_body, payload, RestBackend, SchoolApi};
use crate::{
    error::{RejectedSnafu, SlateResult},
    envelope::{normalize_one, rejection},
    models::Meeting,
};
use http::Method;
use serde_json::Value;

impl<B: RestBackend> SchoolApi<B> {
    pub async fn list_meetings(&self) -> SlateResult<Vec<Meeting>> {
        self.list(&self.admin("/reunions")).await
    }

    pub async fn get_meeting(&self, id: i64) -> SlateResult<Meeting> {
        self.one(Method::GET, &self.admin(format!("/reunions/{id}")), None)
            .await
    }

    /// Creating a meeting always asks the server to notify the participants.
    pub async fn create_meeting(&self, meeting: &Meeting) -> SlateResult<Meeting> {
        let mut body = payload(meeting)?;
        if let Value::Object(map) = &mut body {
            map.remove("id");
            map.insert("notifyTeachers".into(), Value::Bool(true));
        }

        let raw = self
            .call(Method::POST, &self.admin("/reunions"), Some(body))
            .await?;
        if let Some(message) = rejection(&raw) {
            return RejectedSnafu { message }.fail();
        }
        Ok(normalize_one(&raw).unwrap_or_else(|| meeting.clone()))
    }

    pub async fn update_meeting(&self, id: i64, meeting: &Meeting) -> SlateResult<Meeting> {
        self.write(Method::PUT, &self.admin(format!("/reunions/{id}")), meeting)
            .await
    }

    pub async fn delete_meeting(&self, id: i64) -> SlateResult<()> {
        self.unit(Method::DELETE, &self.admin(format!("/reunions/{id}")), None)
            .await
    }

    pub async fn cancel_meeting(&self, id: i64) -> SlateResult<()> {
        self.unit(
            Method::PATCH,
            &self.admin(format!("/reunions/{id}/cancel")),
            empty_body(),
        )
        .await
    }

    pub async fn send_meeting_email(&self, id: i64) -> SlateResult<()> {
        self.unit(
            Method::POST,
            &self.admin(format!("/reunions/{id}/send-email")),
            empty_body(),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{backend::fake::ScriptedBackend, tests::api};
    use crate::models::MeetingStatus;
    use serde_json::json;

    #[tokio::test]
    async fn create_asks_for_notification() {
        let backend = ScriptedBackend::new().on(
            Method::POST,
            "/admin/reunions",
            json!({"success": true, "data": {"id": 6, "sujet": "Conseil de classe", "lieu": "Salle B"}}),
        );
        let meeting = Meeting {
            title: "Conseil de classe".into(),
            date: "2025-01-20T14:00:00+00:00".into(),
            room: "Salle B".into(),
            participants: vec![1, 2],
            ..Meeting::default()
        };

        let created = api(&backend).create_meeting(&meeting).await.unwrap();
        assert_eq!(created.id, 6);
        assert_eq!(created.room, "Salle B");

        let body = backend.calls()[0].body.clone().unwrap();
        assert_eq!(body["notifyTeachers"], true);
        assert_eq!(body["status"], "planned");
        assert!(body.get("id").is_none());
    }

    #[tokio::test]
    async fn cancel_and_mail() {
        let backend = ScriptedBackend::new()
            .on(Method::PATCH, "/admin/reunions/6/cancel", json!(null))
            .on(Method::POST, "/admin/reunions/6/send-email", json!(null))
            .on(Method::GET, "/admin/reunions/6", json!({"id": 6, "status": "CANCELLED"}));
        let api = api(&backend);

        api.cancel_meeting(6).await.unwrap();
        api.send_meeting_email(6).await.unwrap();
        assert_eq!(
            api.get_meeting(6).await.unwrap().status,
            MeetingStatus::Cancelled
        );
    }
}
