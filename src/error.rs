use http::{Method, StatusCode};
use serde_json::Value;
use snafu::Snafu;
use std::path::PathBuf;

pub type SlateResult<T> = Result<T, SlateError>;

#[derive(Debug)]
pub enum ReqwestAction {
    BuildingClient,
    Sending { method: Method, path: String },
    ReadingBody { method: Method, path: String },
}

#[derive(Debug)]
pub enum SerdeJsonAction {
    EncodingPayload,
    DecodingResponse { path: String },
    EncodingCacheEntry(String),
    EncodingSession,
    DecodingSession,
}

#[derive(Debug)]
pub enum IOAction {
    CreatingDirectory(PathBuf),
    ReadingFile(PathBuf),
    WritingToFile(PathBuf),
    DeletingFile(PathBuf),
    ReadingDirectory(PathBuf),
}

/// Which record was being sent when a required field turned out to be empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Student,
    Teacher,
    Meeting,
    Leave,
    AdditionalData,
    Settings,
    Login,
    Register,
}

/// Where a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// no HTTP status at all: connection refused, CORS, DNS...
    Transport,
    /// 4xx
    Client,
    /// 5xx
    Server,
    /// caught before anything was sent, or a response we couldn't read
    Local,
}

#[derive(Snafu, Debug)]
#[snafu(visibility(pub))]
pub enum SlateError {
    //external errors
    #[snafu(display("Error reqwest-ing: {source:?} whilst trying to {action:?}"))]
    Reqwest {
        source: reqwest::Error,
        action: ReqwestAction,
    },
    #[snafu(display("{method} {path} failed with {status}: {message}"))]
    Status {
        method: Method,
        path: String,
        status: StatusCode,
        message: String,
        body: Option<Value>,
    },
    #[snafu(display("JSON error: {source:?} whilst trying to {action:?}"))]
    SerdeJson {
        source: serde_json::Error,
        action: SerdeJsonAction,
    },
    #[snafu(display("IO Error: {source:?} doing {action:?}"))]
    IO {
        source: std::io::Error,
        action: IOAction,
    },
    #[snafu(display("Error loading settings: {source:?}"), context(false))]
    Config { source: config::ConfigError },
    #[snafu(display("Error parsing date {original:?} - {source:?}"))]
    ParseDate {
        source: chrono::ParseError,
        original: String,
    },
    #[snafu(display("Error parsing email address {original:?}: {source:?}"))]
    InvalidEmail {
        source: email_address::Error,
        original: String,
    },

    // internal errors
    #[snafu(display("The field {field} is required ({form:?})"))]
    MissingField { form: FormKind, field: &'static str },
    #[snafu(display("Passwords do not match"))]
    PasswordMismatch,
    #[snafu(display("Leave starts on {start} but ends on {end}"))]
    InvalidDateRange { start: String, end: String },
    #[snafu(display("Mark {mark} is outside 0..=20"))]
    MarkOutOfRange { mark: f64 },
    #[snafu(display("Expected {what} in the response from {path}"))]
    UnexpectedShape { what: &'static str, path: String },
    #[snafu(display("Server refused the request: {message}"))]
    Rejected { message: String },
    #[snafu(display("Nothing selected to {action}"))]
    NothingSelected { action: &'static str },
}

impl SlateError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Reqwest { source, .. } => match source.status() {
                Some(status) if status.is_server_error() => ErrorKind::Server,
                Some(status) if status.is_client_error() => ErrorKind::Client,
                _ => ErrorKind::Transport,
            },
            Self::Status { status, .. } if status.is_server_error() => ErrorKind::Server,
            Self::Status { .. } => ErrorKind::Client,
            _ => ErrorKind::Local,
        }
    }

    /// Best-effort text for a notice. HTTP failures give the server's own
    /// message where it sent one.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } | Self::Rejected { message } => message.clone(),
            Self::Reqwest { source, .. } => match source.status() {
                Some(status) => status_line(status),
                None => "0 Unknown Error".to_string(),
            },
            Self::MissingField { field, .. } => format!("Le champ {field} est requis"),
            Self::PasswordMismatch => "Les mots de passe ne correspondent pas".to_string(),
            Self::NothingSelected { .. } => "Sélectionnez au moins un élément".to_string(),
            other => other.to_string(),
        }
    }
}

fn status_line(status: StatusCode) -> String {
    format!(
        "{} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown Error")
    )
}

/// Pulls a readable message out of an error body: a JSON `message` field, a
/// bare JSON string, any non-empty text, or failing all that the status line.
#[must_use]
pub fn message_from_body(status: StatusCode, raw: &str, parsed: Option<&Value>) -> String {
    match parsed {
        Some(Value::Object(map)) => {
            if let Some(Value::String(message)) = map.get("message") {
                if !message.is_empty() {
                    return message.clone();
                }
            }
        }
        Some(Value::String(message)) if !message.is_empty() => return message.clone(),
        _ => {
            let trimmed = raw.trim();
            if !trimmed.is_empty() && parsed.is_none() {
                return trimmed.to_string();
            }
        }
    }

    status_line(status)
}
