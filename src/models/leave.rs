use super::{filled, lenient_status, null_as_default, require, ApiRecord, Teacher, Validate};
use crate::error::{FormKind, ParseDateSnafu, SlateError, SlateResult};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use strum::{EnumString, IntoStaticStr};

pub const LEAVE_TYPES: [&str; 5] = ["Annuel", "Maladie", "Maternité", "Paternité", "Formation"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum LeaveStatus {
    #[default]
    #[strum(to_string = "en_attente", serialize = "pending")]
    Pending,
    #[strum(to_string = "approuve", serialize = "approved")]
    Approved,
    #[strum(to_string = "rejete", serialize = "rejected")]
    Rejected,
}

lenient_status!(LeaveStatus);

/// A leave request ("congé").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Leave {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(rename = "type", deserialize_with = "null_as_default")]
    pub kind: String,
    #[serde(alias = "reason", deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(alias = "startDate", deserialize_with = "null_as_default")]
    pub date_debut: String,
    #[serde(alias = "endDate", deserialize_with = "null_as_default")]
    pub date_fin: String,
    #[serde(alias = "status")]
    pub statut: LeaveStatus,
    pub motif_rejet: Option<String>,
    #[serde(alias = "teacherId")]
    pub enseignant_id: Option<i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub enseignant_nom: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enseignant: Option<Box<Teacher>>,
}

impl Leave {
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.statut == LeaveStatus::Pending
    }
}

impl ApiRecord for Leave {
    const KIND: &'static str = "congé";

    fn id(&self) -> i64 {
        self.id
    }

    fn tidy(mut self) -> Self {
        if let Some(teacher) = &self.enseignant {
            if self.enseignant_id.is_none() {
                self.enseignant_id = Some(teacher.id);
            }
            if self.enseignant_nom.is_empty() {
                self.enseignant_nom = teacher.full_name();
            }
        }
        self
    }
}

impl Validate for Leave {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::Leave, "type", filled(&self.kind))?;
        require(FormKind::Leave, "dateDebut", filled(&self.date_debut))?;
        require(FormKind::Leave, "dateFin", filled(&self.date_fin))?;
        require(
            FormKind::Leave,
            "enseignantId",
            self.enseignant_id.is_some_and(|id| id != 0),
        )?;
        check_date_range(&self.date_debut, &self.date_fin)
    }
}

/// What a teacher submits from their own space.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    pub teacher_id: i64,
    pub start_date: String,
    pub end_date: String,
    pub reason: String,
    pub status: &'static str,
}

impl LeaveRequest {
    #[must_use]
    pub fn new(teacher_id: i64, start_date: String, end_date: String, reason: String) -> Self {
        Self {
            teacher_id,
            start_date,
            end_date,
            reason,
            status: "pending",
        }
    }
}

impl Validate for LeaveRequest {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::Leave, "startDate", filled(&self.start_date))?;
        require(FormKind::Leave, "endDate", filled(&self.end_date))?;
        require(FormKind::Leave, "reason", filled(&self.reason))?;
        check_date_range(&self.start_date, &self.end_date)
    }
}

/// Accepts `YYYY-MM-DD` with or without a time part after it.
pub fn parse_day(raw: &str) -> SlateResult<NaiveDate> {
    let raw = raw.trim();
    let day = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").context(ParseDateSnafu {
        original: raw.to_string(),
    })
}

fn check_date_range(start: &str, end: &str) -> SlateResult<()> {
    if parse_day(start)? <= parse_day(end)? {
        Ok(())
    } else {
        Err(SlateError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        })
    }
}
