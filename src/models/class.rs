use super::{null_as_default, ApiRecord, Student, Teacher};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Class {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub nom: String,
    pub niveau: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub enseignants: Vec<Teacher>,
    #[serde(deserialize_with = "null_as_default")]
    pub etudiants: Vec<Student>,
}

impl ApiRecord for Class {
    const KIND: &'static str = "classe";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Students carry their class either as a bare name or as the whole record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassRef {
    Name(String),
    Record(Box<Class>),
}

impl ClassRef {
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        let name = match self {
            Self::Name(name) => name.as_str(),
            Self::Record(class) => class.nom.as_str(),
        };
        (!name.trim().is_empty()).then_some(name)
    }
}
