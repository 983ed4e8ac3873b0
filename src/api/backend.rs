use crate::error::{message_from_body, ReqwestAction, ReqwestSnafu, SlateError, SlateResult};
use http::Method;
use reqwest::Client;
use serde_json::Value;
use snafu::ResultExt;
use std::sync::Arc;

/// Where requests actually go. Paths are relative to the API root.
#[async_trait]
pub trait RestBackend: Send + Sync {
    /// The decoded body on 2xx (`null` when empty, a JSON string when the
    /// server sent plain text), [`SlateError::Status`] otherwise.
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> SlateResult<Value>;
}

#[async_trait]
impl<B: RestBackend + ?Sized> RestBackend for Arc<B> {
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> SlateResult<Value> {
        (**self).send(method, path, body).await
    }
}

#[derive(Clone, Debug)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str) -> SlateResult<Self> {
        let client = Client::builder().build().context(ReqwestSnafu {
            action: ReqwestAction::BuildingClient,
        })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl RestBackend for HttpBackend {
    async fn send(&self, method: Method, path: &str, body: Option<Value>) -> SlateResult<Value> {
        let url = format!("{}{path}", self.base_url);

        let mut request = self.client.request(method.clone(), &url);
        if let Some(body) = &body {
            request = request.json(body);
        }

        let response = request.send().await.with_context(|_e| ReqwestSnafu {
            action: ReqwestAction::Sending {
                method: method.clone(),
                path: path.to_string(),
            },
        })?;
        let status = response.status();
        let text = response.text().await.with_context(|_e| ReqwestSnafu {
            action: ReqwestAction::ReadingBody {
                method: method.clone(),
                path: path.to_string(),
            },
        })?;

        debug!(%method, %path, %status, "Got response");

        let parsed = if text.trim().is_empty() {
            None
        } else {
            serde_json::from_str::<Value>(&text).ok()
        };

        if !status.is_success() {
            let message = message_from_body(status, &text, parsed.as_ref());
            return Err(SlateError::Status {
                method,
                path: path.to_string(),
                status,
                message,
                body: parsed,
            });
        }

        Ok(match parsed {
            Some(value) => value,
            None if text.trim().is_empty() => Value::Null,
            None => Value::String(text),
        })
    }
}
