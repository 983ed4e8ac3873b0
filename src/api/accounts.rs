use super::{payload, RestBackend, SchoolApi};
use crate::{
    auth::{LoginDetails, RegisterDetails},
    error::SlateResult,
};
use http::Method;
use serde_json::{json, Value};

impl<B: RestBackend> SchoolApi<B> {
    /// The raw answer: the login endpoint has no settled shape, so
    /// [`crate::auth`] works out the user from it.
    pub async fn login(&self, details: &LoginDetails) -> SlateResult<Value> {
        let body = json!({
            "username": details.username.trim(),
            "password": details.password,
            "role": details.role.as_str(),
        });
        self.call(Method::POST, "/auth/login", Some(body)).await
    }

    pub async fn register(&self, details: &RegisterDetails) -> SlateResult<Value> {
        self.call(Method::POST, "/auth/register", Some(payload(details)?))
            .await
    }
}
