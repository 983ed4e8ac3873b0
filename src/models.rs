pub mod absence;
pub mod additional_data;
pub mod class;
pub mod course;
pub mod leave;
pub mod meeting;
pub mod note;
pub mod settings;
pub mod student;
pub mod teacher;

pub use absence::Absence;
pub use additional_data::AdditionalData;
pub use class::{Class, ClassRef};
pub use course::Course;
pub use leave::{Leave, LeaveRequest, LeaveStatus};
pub use meeting::{Meeting, MeetingStatus};
pub use note::{Note, NoteUpdate};
pub use settings::AdminSettings;
pub use student::{Student, StudentStatus};
pub use teacher::{Teacher, TeacherStatus};

use crate::error::{FormKind, SlateError, SlateResult};
use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// A record the REST API hands back. Reading one never looks at the envelope;
/// that is [`crate::envelope`]'s job.
pub trait ApiRecord: DeserializeOwned {
    const KIND: &'static str;

    fn id(&self) -> i64;

    /// Fill in whatever the API left out, after deserialising.
    #[must_use]
    fn tidy(self) -> Self {
        self
    }

    fn from_api(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value).map(Self::tidy)
    }
}

/// Something the user fills in and we check before sending.
pub trait Validate {
    fn validate(&self) -> SlateResult<()>;
}

pub(crate) fn require(form: FormKind, field: &'static str, present: bool) -> SlateResult<()> {
    if present {
        Ok(())
    } else {
        Err(SlateError::MissingField { form, field })
    }
}

pub(crate) fn filled(s: &str) -> bool {
    !s.trim().is_empty()
}

/// `null` reads as the default, same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Status strings come in French, English, upper and lower case depending on
/// which endpoint answered, so unknown spellings fall back to the default.
macro_rules! lenient_status {
    ($t:ty) => {
        impl From<Option<String>> for $t {
            fn from(value: Option<String>) -> Self {
                value
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or_default()
            }
        }
    };
}
pub(crate) use lenient_status;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nulls_become_defaults() {
        let student = Student::from_api(&json!({
            "id": 4, "nom": null, "prenom": "Lina", "email": null, "status": null
        }))
        .unwrap();

        assert_eq!(student.id, 4);
        assert_eq!(student.nom, "");
        assert_eq!(student.prenom, "Lina");
        assert_eq!(student.status, StudentStatus::Active);
    }

    #[test]
    fn unknown_status_is_default() {
        let leave = Leave::from_api(&json!({"id": 1, "statut": "peut-être"})).unwrap();
        assert_eq!(leave.statut, LeaveStatus::Pending);
    }
}
