use super::{null_as_default, ApiRecord, Teacher};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Course {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(alias = "name", deserialize_with = "null_as_default")]
    pub nom: String,
    pub description: Option<String>,
    pub enseignant_id: Option<i64>,
    pub enseignant: Option<Box<Teacher>>,
    pub classe: Option<String>,
}

impl ApiRecord for Course {
    const KIND: &'static str = "cours";

    fn id(&self) -> i64 {
        self.id
    }

    fn tidy(mut self) -> Self {
        if self.enseignant_id.is_none() {
            self.enseignant_id = self.enseignant.as_ref().map(|t| t.id);
        }
        if self.nom.trim().is_empty() {
            self.nom = "Cours sans nom".into();
        }
        self
    }
}
