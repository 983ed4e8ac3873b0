use super::{empty_body, RestBackend, SchoolApi};
use crate::{
    error::SlateResult,
    models::{Leave, LeaveStatus},
};
use http::Method;
use serde_json::json;

/// The teacher-side status endpoint speaks English.
fn status_word(status: LeaveStatus) -> &'static str {
    match status {
        LeaveStatus::Pending => "pending",
        LeaveStatus::Approved => "approved",
        LeaveStatus::Rejected => "rejected",
    }
}

impl<B: RestBackend> SchoolApi<B> {
    pub async fn list_leaves(&self) -> SlateResult<Vec<Leave>> {
        self.list(&self.admin("/conges")).await
    }

    pub async fn pending_leaves(&self) -> SlateResult<Vec<Leave>> {
        self.list(&self.admin("/conges/en-attente")).await
    }

    pub async fn get_leave(&self, id: i64) -> SlateResult<Leave> {
        self.one(Method::GET, &self.admin(format!("/conges/{id}")), None)
            .await
    }

    /// Filed on behalf of a teacher when the form names one.
    pub async fn create_leave(&self, leave: &Leave) -> SlateResult<Leave> {
        let path = match leave.enseignant_id {
            Some(teacher_id) => self.admin(format!("/conges/{teacher_id}")),
            None => self.admin("/conges"),
        };
        self.write(Method::POST, &path, leave).await
    }

    pub async fn update_leave(&self, id: i64, leave: &Leave) -> SlateResult<Leave> {
        self.write(Method::PUT, &self.admin(format!("/conges/{id}")), leave)
            .await
    }

    pub async fn delete_leave(&self, id: i64) -> SlateResult<()> {
        self.unit(Method::DELETE, &self.admin(format!("/conges/{id}")), None)
            .await
    }

    pub async fn approve_leave(&self, id: i64) -> SlateResult<()> {
        self.unit(
            Method::PUT,
            &self.admin(format!("/conges/{id}/approve")),
            empty_body(),
        )
        .await
    }

    pub async fn reject_leave(&self, id: i64, reason: &str) -> SlateResult<()> {
        self.unit(
            Method::PUT,
            &self.admin(format!("/conges/{id}/reject")),
            Some(json!({ "raison": reason })),
        )
        .await
    }

    pub async fn set_leave_status(&self, id: i64, status: LeaveStatus) -> SlateResult<()> {
        self.unit(
            Method::PATCH,
            &format!("/conges/{id}/status"),
            Some(json!({ "status": status_word(status) })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{backend::fake::ScriptedBackend, tests::api};

    #[tokio::test]
    async fn create_goes_under_the_teacher() {
        let backend = ScriptedBackend::new()
            .on(Method::POST, "/admin/conges/4", json!({"data": {"id": 17, "statut": "EN_ATTENTE"}}))
            .on(Method::POST, "/admin/conges", json!(null));
        let api = api(&backend);

        let named = Leave {
            kind: "Maladie".into(),
            enseignant_id: Some(4),
            ..Leave::default()
        };
        assert_eq!(api.create_leave(&named).await.unwrap().id, 17);

        let unnamed = Leave {
            kind: "Annuel".into(),
            ..Leave::default()
        };
        assert_eq!(api.create_leave(&unnamed).await.unwrap(), unnamed);

        let body = backend.calls()[0].body.clone().unwrap();
        assert_eq!(body["type"], "Maladie");
        assert_eq!(body["statut"], "en_attente");
    }

    #[tokio::test]
    async fn decisions() {
        let backend = ScriptedBackend::new()
            .on(Method::PUT, "/admin/conges/8/approve", json!({"success": true}))
            .on(Method::PUT, "/admin/conges/9/reject", json!(null))
            .on(Method::PATCH, "/conges/9/status", json!(null))
            .on(Method::GET, "/admin/conges/en-attente", json!([{"id": 10}, {"id": 11}]));
        let api = api(&backend);

        api.approve_leave(8).await.unwrap();
        api.reject_leave(9, "Effectif insuffisant").await.unwrap();
        api.set_leave_status(9, LeaveStatus::Rejected).await.unwrap();
        assert_eq!(api.pending_leaves().await.unwrap().len(), 2);

        let calls = backend.calls();
        assert_eq!(calls[1].body, Some(json!({"raison": "Effectif insuffisant"})));
        assert_eq!(calls[2].body, Some(json!({"status": "rejected"})));
    }
}
