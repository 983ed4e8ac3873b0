//! One method per REST endpoint. Nothing in here keeps state; the dashboard
//! decides what to do with the answers.

pub mod accounts;
pub mod backend;
pub mod classes;
pub mod grades;
pub mod leaves;
pub mod meetings;
pub mod records;
pub mod student_space;
pub mod students;
pub mod teachers;

pub use backend::{HttpBackend, RestBackend};

use crate::{
    envelope::{normalize, normalize_one, rejection},
    error::{RejectedSnafu, SerdeJsonAction, SerdeJsonSnafu, SlateResult, UnexpectedShapeSnafu},
    models::ApiRecord,
};
use http::Method;
use serde::Serialize;
use serde_json::Value;
use snafu::{OptionExt, ResultExt};

#[derive(Clone, Debug)]
pub struct SchoolApi<B> {
    backend: B,
    admin: String,
}

impl<B: RestBackend> SchoolApi<B> {
    pub fn new(backend: B, admin_prefix: &str) -> Self {
        Self {
            backend,
            admin: admin_prefix.trim_end_matches('/').to_string(),
        }
    }

    fn admin(&self, path: impl AsRef<str>) -> String {
        format!("{}{}", self.admin, path.as_ref())
    }

    #[instrument(level = "debug", skip(self, body))]
    async fn call(&self, method: Method, path: &str, body: Option<Value>) -> SlateResult<Value> {
        self.backend.send(method, path, body).await
    }

    /// `{success: false}` is an error; any other shape is read as a list.
    async fn list<T: ApiRecord>(&self, path: &str) -> SlateResult<Vec<T>> {
        let raw = self.call(Method::GET, path, None).await?;
        if let Some(message) = rejection(&raw) {
            return RejectedSnafu { message }.fail();
        }
        Ok(normalize(&raw))
    }

    /// A single record, wrapped or not. `{success: false}` is an error here
    /// rather than an empty answer.
    async fn one<T: ApiRecord>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> SlateResult<T> {
        let raw = self.call(method, path, body).await?;
        if let Some(message) = rejection(&raw) {
            return RejectedSnafu { message }.fail();
        }

        normalize_one(&raw).context(UnexpectedShapeSnafu { what: T::KIND, path })
    }

    /// Writes that send a record and usually get it back. Some endpoints
    /// answer with nothing, in which case the record we sent stands in.
    async fn write<T: ApiRecord + Serialize + Clone>(
        &self,
        method: Method,
        path: &str,
        record: &T,
    ) -> SlateResult<T> {
        let raw = self.call(method, path, Some(payload(record)?)).await?;
        if let Some(message) = rejection(&raw) {
            return RejectedSnafu { message }.fail();
        }

        Ok(normalize_one(&raw).unwrap_or_else(|| {
            debug!(%path, kind = T::KIND, "No record in response, keeping what was sent");
            record.clone()
        }))
    }

    /// For endpoints whose answer we don't read, beyond a refusal.
    async fn unit(&self, method: Method, path: &str, body: Option<Value>) -> SlateResult<()> {
        let raw = self.call(method, path, body).await?;
        match rejection(&raw) {
            Some(message) => RejectedSnafu { message }.fail(),
            None => Ok(()),
        }
    }
}

pub(crate) fn payload<T: Serialize + ?Sized>(value: &T) -> SlateResult<Value> {
    serde_json::to_value(value).context(SerdeJsonSnafu {
        action: SerdeJsonAction::EncodingPayload,
    })
}

/// Action endpoints that take a body but ignore it.
fn empty_body() -> Option<Value> {
    Some(Value::Object(serde_json::Map::new()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{backend::fake::ScriptedBackend, *};
    use crate::{error::SlateError, models::Teacher};
    use http::StatusCode;
    use serde_json::json;
    use std::sync::Arc;

    pub(crate) fn api(backend: &Arc<ScriptedBackend>) -> SchoolApi<Arc<ScriptedBackend>> {
        SchoolApi::new(Arc::clone(backend), "/admin")
    }

    #[tokio::test]
    async fn single_records_must_be_there() {
        let backend = ScriptedBackend::new()
            .on(Method::GET, "/admin/enseignants/1", json!({"data": {"id": 1}}))
            .on(Method::GET, "/admin/enseignants/2", json!({"success": true, "data": null}))
            .on(
                Method::GET,
                "/admin/enseignants/3",
                json!({"success": false, "message": "Introuvable"}),
            );
        let api = api(&backend);

        assert_eq!(api.get_teacher(1).await.unwrap().id, 1);
        assert!(matches!(
            api.get_teacher(2).await,
            Err(SlateError::UnexpectedShape { .. })
        ));
        match api.get_teacher(3).await {
            Err(SlateError::Rejected { message }) => assert_eq!(message, "Introuvable"),
            other => panic!("{other:?}"),
        }
    }

    #[tokio::test]
    async fn writes_fall_back_to_what_was_sent() {
        let backend = ScriptedBackend::new().on(Method::PUT, "/admin/enseignants/4", Value::Null);
        let api = api(&backend);
        let teacher = Teacher {
            id: 4,
            nom: "Petit".into(),
            ..Teacher::default()
        };

        let saved = api.update_teacher(4, &teacher).await.unwrap();
        assert_eq!(saved, teacher);
        assert_eq!(backend.calls()[0].body.as_ref().unwrap()["nom"], "Petit");
    }

    #[tokio::test]
    async fn http_failures_carry_the_server_message() {
        let backend = ScriptedBackend::new().fail(
            Method::DELETE,
            "/admin/etudiants/9",
            StatusCode::CONFLICT,
            json!({"message": "Étudiant inscrit à un cours"}),
        );
        let err = api(&backend).delete_student(9).await.unwrap_err();

        assert_eq!(err.user_message(), "Étudiant inscrit à un cours");
        assert_eq!(err.kind(), crate::error::ErrorKind::Client);
    }

    #[tokio::test]
    async fn refused_lists_are_errors() {
        let backend = ScriptedBackend::new()
            .on(
                Method::GET,
                "/admin/classes",
                json!({"success": false, "message": "Accès refusé", "data": [{"id": 1}]}),
            )
            .on(Method::GET, "/admin/conges", json!({"success": false}));
        let api = api(&backend);

        match api.list_classes().await {
            Err(SlateError::Rejected { message }) => assert_eq!(message, "Accès refusé"),
            other => panic!("{other:?}"),
        }
        assert_eq!(
            api.list_leaves().await.unwrap_err().user_message(),
            "Format de réponse invalide"
        );
    }

    #[tokio::test]
    async fn admin_prefix_is_applied_once() {
        let backend = ScriptedBackend::new().on(Method::GET, "/admin/classes", json!([]));
        let api = SchoolApi::new(Arc::clone(&backend), "/admin/");

        assert!(api.list_classes().await.unwrap().is_empty());
        assert_eq!(backend.calls_to(&Method::GET, "/admin/classes"), 1);
    }
}
