use super::{null_as_default, ApiRecord, Course, Student};
use serde::{Deserialize, Serialize};

/// A grade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Note {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub valeur: f64,
    pub date: Option<String>,
    pub matiere: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub etudiant: Option<Box<Student>>,
    pub cours: Option<Course>,
}

impl ApiRecord for Note {
    const KIND: &'static str = "note";

    fn id(&self) -> i64 {
        self.id
    }
}

/// Body of the teacher-side grade update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteUpdate {
    pub student_id: i64,
    pub cours_id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub note: f64,
}
