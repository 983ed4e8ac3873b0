use super::{filled, lenient_status, null_as_default, require, ApiRecord, Validate};
use crate::error::{FormKind, SlateResult};
use serde::{Deserialize, Serialize};
use strum::{EnumString, IntoStaticStr};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum TeacherStatus {
    #[default]
    #[strum(to_string = "active", serialize = "actif")]
    Active,
    #[strum(to_string = "inactive", serialize = "inactif")]
    Inactive,
    #[strum(to_string = "on_leave", serialize = "en_conge")]
    OnLeave,
}

lenient_status!(TeacherStatus);

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Teacher {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub version: i64,
    #[serde(alias = "name", deserialize_with = "null_as_default")]
    pub nom: String,
    #[serde(deserialize_with = "null_as_default")]
    pub prenom: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub matieres: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub nb_annee_experience: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub nb_classe: u32,
    #[serde(alias = "statutConge")]
    pub status: TeacherStatus,
}

impl Teacher {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

impl ApiRecord for Teacher {
    const KIND: &'static str = "enseignant";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Validate for Teacher {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::Teacher, "nom", filled(&self.nom))?;
        require(FormKind::Teacher, "prenom", filled(&self.prenom))?;
        require(FormKind::Teacher, "email", filled(&self.email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn admin_and_dashboard_shapes() {
        let dashboard = Teacher::from_api(&json!({
            "id": 3, "nom": "Durand", "prenom": "Paul", "email": "p.durand@ecole.fr",
            "matieres": ["Maths"], "nbAnneeExperience": 12, "status": "inactive"
        }))
        .unwrap();
        assert_eq!(dashboard.nb_annee_experience, 12);
        assert_eq!(dashboard.status, TeacherStatus::Inactive);
        assert_eq!(dashboard.full_name(), "Paul Durand");

        let admin = Teacher::from_api(&json!({
            "id": 4, "name": "Petit", "statutConge": "EN_CONGE", "matieres": null
        }))
        .unwrap();
        assert_eq!(admin.nom, "Petit");
        assert_eq!(admin.status, TeacherStatus::OnLeave);
        assert!(admin.matieres.is_empty());
    }
}
