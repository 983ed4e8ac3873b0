use super::{filled, require, Validate};
use crate::error::{FormKind, InvalidEmailSnafu, SlateError, SlateResult};
use email_address::EmailAddress;
use serde::Serialize;
use snafu::ResultExt;
use std::str::FromStr;

/// The admin's own account settings form.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSettings {
    pub email: String,
    pub current_password: String,
    pub new_password: String,
    #[serde(skip)]
    pub confirm_password: String,
}

impl Validate for AdminSettings {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::Settings, "email", filled(&self.email))?;
        EmailAddress::from_str(self.email.trim()).context(InvalidEmailSnafu {
            original: self.email.clone(),
        })?;

        if self.new_password != self.confirm_password {
            return Err(SlateError::PasswordMismatch);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confirmation_is_never_sent() {
        let settings = AdminSettings {
            email: "direction@ecole.fr".into(),
            current_password: "ancien".into(),
            new_password: "nouveau".into(),
            confirm_password: "nouveau".into(),
        };
        assert!(settings.validate().is_ok());

        let body = serde_json::to_value(&settings).unwrap();
        assert_eq!(body["newPassword"], "nouveau");
        assert!(body.get("confirmPassword").is_none());
    }

    #[test]
    fn mismatched_or_missing() {
        let mut settings = AdminSettings {
            email: "direction@ecole.fr".into(),
            new_password: "a".into(),
            confirm_password: "b".into(),
            ..AdminSettings::default()
        };
        assert!(matches!(settings.validate(), Err(SlateError::PasswordMismatch)));

        settings.email = "   ".into();
        assert!(matches!(
            settings.validate(),
            Err(SlateError::MissingField { field: "email", .. })
        ));

        settings.email = "pas-une-adresse".into();
        assert!(matches!(settings.validate(), Err(SlateError::InvalidEmail { .. })));
    }
}
