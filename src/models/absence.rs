use super::{null_as_default, ApiRecord, Course, Student};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Absence {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    pub date: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub justifiee: bool,
    pub justification: Option<String>,
    pub etudiant: Option<Box<Student>>,
    pub cours: Option<Course>,
}

impl ApiRecord for Absence {
    const KIND: &'static str = "absence";

    fn id(&self) -> i64 {
        self.id
    }
}
