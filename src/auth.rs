pub mod session_store;

use self::session_store::SessionStore;
use crate::{
    api::{RestBackend, SchoolApi},
    envelope::rejection,
    error::{
        FormKind, InvalidEmailSnafu, RejectedSnafu, SlateError, SlateResult, UnexpectedShapeSnafu,
    },
    models::{filled, require, Validate},
    state::storage::KeyValueStore,
};
use email_address::EmailAddress;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use snafu::{OptionExt, ResultExt};
use std::str::FromStr;
use strum::EnumString;

/// Roles come in English or French depending on who typed them; we always
/// keep the French form. Anything unrecognised is kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(from = "String", into = "String")]
pub enum Role {
    #[strum(serialize = "etudiant", serialize = "student")]
    Student,
    #[strum(serialize = "enseignant", serialize = "teacher")]
    Teacher,
    #[strum(serialize = "admin", serialize = "administrator")]
    Admin,
    #[strum(default)]
    Other(String),
}

impl Role {
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Student => "etudiant",
            Self::Teacher => "enseignant",
            Self::Admin => "admin",
            Self::Other(other) => other,
        }
    }

    /// Which screen a freshly logged-in user lands on.
    #[must_use]
    pub fn home(&self) -> &'static str {
        match self {
            Self::Student => "/student",
            Self::Teacher => "/teacher",
            Self::Admin => "/admin",
            Self::Other(_) => "/",
        }
    }

    /// Never fails: unknown spellings become [`Role::Other`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self::from(raw.to_string())
    }

    fn is_blank(&self) -> bool {
        matches!(self, Self::Other(other) if other.trim().is_empty())
    }
}

impl From<String> for Role {
    fn from(value: String) -> Self {
        match value.trim().parse() {
            Ok(role) => role,
            Err(_) => Self::Other(value),
        }
    }
}


impl From<Role> for String {
    fn from(value: Role) -> Self {
        value.as_str().to_string()
    }
}

/// Whoever is logged in. The API sends more than we read, so the rest is
/// kept alongside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionUser {
    pub username: String,
    pub role: Role,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct LoginDetails {
    pub username: String,
    pub password: String,
    pub role: Role,
    pub remember_me: bool,
}

impl Validate for LoginDetails {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::Login, "username", filled(&self.username))?;
        require(FormKind::Login, "password", filled(&self.password))?;
        require(FormKind::Login, "role", !self.role.is_blank())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterDetails {
    pub username: String,
    pub password: String,
    #[serde(skip)]
    pub confirm_password: String,
    pub email: String,
    pub role: Role,
}

impl Validate for RegisterDetails {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::Register, "username", filled(&self.username))?;
        require(FormKind::Register, "password", filled(&self.password))?;
        require(
            FormKind::Register,
            "confirmPassword",
            filled(&self.confirm_password),
        )?;
        require(FormKind::Register, "email", filled(&self.email))?;
        require(FormKind::Register, "role", !self.role.is_blank())?;

        if self.password != self.confirm_password {
            return Err(SlateError::PasswordMismatch);
        }

        EmailAddress::from_str(self.email.trim()).context(InvalidEmailSnafu {
            original: self.email.clone(),
        })?;
        Ok(())
    }
}

/// Works out who logged in from whatever the login endpoint answered.
pub fn session_from_response(raw: &Value, entered: &LoginDetails) -> SlateResult<SessionUser> {
    if raw.is_null() {
        return Ok(SessionUser {
            username: entered.username.trim().to_string(),
            role: entered.role.clone(),
            extra: Map::new(),
        });
    }
    if let Some(message) = rejection(raw) {
        return RejectedSnafu { message }.fail();
    }

    let user = ["user", "data"]
        .into_iter()
        .filter_map(|key| raw.get(key))
        .find(|v| v.is_object())
        .unwrap_or(raw)
        .as_object()
        .context(UnexpectedShapeSnafu {
            what: "utilisateur",
            path: "/auth/login",
        })?;

    let text = |key: &str| {
        user.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    };
    let role = text("role")
        .or_else(|| text("userRole"))
        .or_else(|| {
            user.get("roles")
                .and_then(|roles| roles.get(0))
                .and_then(Value::as_str)
        })
        .map_or_else(|| entered.role.clone(), Role::parse);
    let username = text("username").unwrap_or(entered.username.trim()).to_string();

    let mut extra = user.clone();
    extra.remove("username");
    extra.remove("role");

    Ok(SessionUser {
        username,
        role,
        extra,
    })
}

pub async fn login<B: RestBackend, S: KeyValueStore>(
    api: &SchoolApi<B>,
    sessions: &SessionStore<S>,
    details: &LoginDetails,
) -> SlateResult<SessionUser> {
    details.validate()?;

    let raw = api.login(details).await?;
    let user = session_from_response(&raw, details)?;
    info!(username = %user.username, role = user.role.as_str(), "Logged in");

    sessions.store_session(&user, details.remember_me).await?;
    Ok(user)
}

pub async fn register<B: RestBackend>(
    api: &SchoolApi<B>,
    details: &RegisterDetails,
) -> SlateResult<()> {
    details.validate()?;

    let raw = api.register(details).await?;
    if let Some(message) = rejection(&raw) {
        return RejectedSnafu { message }.fail();
    }
    info!(username = %details.username, "Registered");
    Ok(())
}

pub async fn logout<S: KeyValueStore>(sessions: &SessionStore<S>) -> SlateResult<()> {
    sessions.destroy_session().await
}
