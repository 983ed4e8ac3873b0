//! Free-form admin records, account settings and absence alerts.

use super::{payload, RestBackend, SchoolApi};
use crate::{
    error::SlateResult,
    models::{AdditionalData, AdminSettings},
};
use http::Method;
use serde_json::json;

impl<B: RestBackend> SchoolApi<B> {
    pub async fn list_additional_data(&self) -> SlateResult<Vec<AdditionalData>> {
        self.list(&self.admin("/additional-data")).await
    }

    pub async fn create_additional_data(&self, data: &AdditionalData) -> SlateResult<AdditionalData> {
        self.write(Method::POST, &self.admin("/additional-data"), data)
            .await
    }

    pub async fn update_additional_data(
        &self,
        id: i64,
        data: &AdditionalData,
    ) -> SlateResult<AdditionalData> {
        self.write(
            Method::PUT,
            &self.admin(format!("/additional-data/{id}")),
            data,
        )
        .await
    }

    pub async fn delete_additional_data(&self, id: i64) -> SlateResult<()> {
        self.unit(
            Method::DELETE,
            &self.admin(format!("/additional-data/{id}")),
            None,
        )
        .await
    }

    pub async fn save_settings(&self, settings: &AdminSettings) -> SlateResult<()> {
        self.unit(
            Method::POST,
            &self.admin("/settings"),
            Some(payload(settings)?),
        )
        .await
    }

    pub async fn send_absence_alerts(&self, student_ids: &[i64]) -> SlateResult<()> {
        self.unit(
            Method::POST,
            &self.admin("/send-absence-alerts"),
            Some(json!({ "studentIds": student_ids })),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{backend::fake::ScriptedBackend, tests::api};

    #[tokio::test]
    async fn additional_data_defaults_its_category() {
        let backend = ScriptedBackend::new().on(
            Method::GET,
            "/admin/additional-data",
            json!({"data": [{"id": 1, "title": "Budget", "value": 1200.5, "category": null}]}),
        );
        let data = api(&backend).list_additional_data().await.unwrap();
        assert_eq!(data[0].category, "default");
    }

    #[tokio::test]
    async fn alerts_and_settings_bodies() {
        let backend = ScriptedBackend::new()
            .on(Method::POST, "/admin/send-absence-alerts", json!({"success": true}))
            .on(Method::POST, "/admin/settings", json!(null));
        let api = api(&backend);

        api.send_absence_alerts(&[3, 8]).await.unwrap();
        api.save_settings(&AdminSettings {
            email: "direction@ecole.fr".into(),
            ..AdminSettings::default()
        })
        .await
        .unwrap();

        let calls = backend.calls();
        assert_eq!(calls[0].body, Some(json!({"studentIds": [3, 8]})));
        assert_eq!(
            calls[1].body,
            Some(json!({"email": "direction@ecole.fr", "currentPassword": "", "newPassword": ""}))
        );
    }
}
