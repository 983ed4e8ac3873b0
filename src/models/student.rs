use super::{
    filled, lenient_status, null_as_default, require, ApiRecord, ClassRef, Course, Note, Teacher,
    Validate,
};
use crate::error::{FormKind, SlateResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::{EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum StudentStatus {
    #[default]
    #[strum(to_string = "active", serialize = "actif")]
    Active,
    #[strum(to_string = "locked", serialize = "verrouille", serialize = "inactive")]
    Locked,
}

lenient_status!(StudentStatus);

impl StudentStatus {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Active => Self::Locked,
            Self::Locked => Self::Active,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Student {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub version: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub nom: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prenom: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    pub status: StudentStatus,
    pub classe: Option<ClassRef>,
    pub date_naissance: Option<String>,
    pub niveau_scolaire: Option<String>,
    pub notes: Option<Vec<Note>>,
    pub cours: Option<Vec<Course>>,
    pub enseignant: Option<Box<Teacher>>,
    #[serde(deserialize_with = "absence_count")]
    pub absences: u32,
}

/// The student list sends a count, the detail endpoints send the absences
/// themselves. Either way we keep the count.
fn absence_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .map_or(0, |n| u32::try_from(n).unwrap_or(u32::MAX)),
        Value::Array(list) => u32::try_from(list.len()).unwrap_or(u32::MAX),
        _ => 0,
    })
}

impl Student {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }

    #[must_use]
    pub fn class_name(&self) -> Option<&str> {
        self.classe.as_ref().and_then(ClassRef::name)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == StudentStatus::Active
    }

    /// What gets PUT/POSTed: relations are owned by the server.
    #[must_use]
    pub fn to_payload(&self) -> Self {
        Self {
            notes: None,
            cours: None,
            enseignant: None,
            ..self.clone()
        }
    }
}

impl ApiRecord for Student {
    const KIND: &'static str = "étudiant";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Validate for Student {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::Student, "nom", filled(&self.nom))?;
        require(FormKind::Student, "prenom", filled(&self.prenom))?;
        require(FormKind::Student, "email", filled(&self.email))
    }
}
