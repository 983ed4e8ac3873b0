use super::{filled, lenient_status, null_as_default, require, ApiRecord, Validate};
use crate::error::{FormKind, ParseDateSnafu, SlateResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use strum::{EnumString, IntoStaticStr};

pub const MEETING_ROOMS: [&str; 4] = ["Salle A", "Salle B", "Salle C", "Amphithéâtre"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, IntoStaticStr, Serialize, Deserialize,
)]
#[strum(ascii_case_insensitive)]
#[serde(from = "Option<String>", into = "&'static str")]
pub enum MeetingStatus {
    #[default]
    #[strum(to_string = "planned", serialize = "planifiee")]
    Planned,
    #[strum(to_string = "completed", serialize = "terminee")]
    Completed,
    #[strum(to_string = "cancelled", serialize = "annulee", serialize = "canceled")]
    Cancelled,
}

lenient_status!(MeetingStatus);

/// A staff meeting ("réunion").
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meeting {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(alias = "sujet", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(alias = "dateHeure", deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(alias = "lieu", deserialize_with = "null_as_default")]
    pub room: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub participants: Vec<i64>,
    pub status: MeetingStatus,
}

impl ApiRecord for Meeting {
    const KIND: &'static str = "réunion";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Validate for Meeting {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::Meeting, "title", filled(&self.title))?;
        require(FormKind::Meeting, "date", filled(&self.date))?;
        require(FormKind::Meeting, "room", filled(&self.room))?;
        require(FormKind::Meeting, "participants", !self.participants.is_empty())
    }
}

/// Meeting times are sent as UTC RFC 3339. Form input without an offset
/// (`2025-01-20T14:00`, with or without seconds, or just a day) is read as UTC.
pub fn normalize_date(raw: &str) -> SlateResult<String> {
    let raw = raw.trim();
    let utc = match DateTime::parse_from_rfc3339(raw) {
        Ok(with_offset) => with_offset.with_timezone(&Utc),
        Err(_) => ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map_or_else(
                || {
                    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .map(|day| day.and_time(NaiveTime::MIN))
                },
                Ok,
            )
            .context(ParseDateSnafu {
                original: raw.to_string(),
            })?
            .and_utc(),
    };

    Ok(utc.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn admin_field_names_are_accepted() {
        let meeting = Meeting::from_api(&json!({
            "id": 2, "sujet": "Conseil de classe", "dateHeure": "2025-06-02T17:00:00",
            "lieu": "Salle B", "participants": null
        }))
        .unwrap();

        assert_eq!(meeting.title, "Conseil de classe");
        assert_eq!(meeting.room, "Salle B");
        assert_eq!(meeting.status, MeetingStatus::Planned);
        assert!(meeting.participants.is_empty());
        assert!(meeting.validate().is_err());
    }

    #[test]
    fn dates_become_utc() {
        assert_eq!(
            normalize_date("2025-01-20T14:00").unwrap(),
            "2025-01-20T14:00:00.000Z"
        );
        assert_eq!(
            normalize_date("2025-01-20T14:00:00+01:00").unwrap(),
            "2025-01-20T13:00:00.000Z"
        );
        assert_eq!(
            normalize_date("2025-01-20").unwrap(),
            "2025-01-20T00:00:00.000Z"
        );
        assert!(normalize_date("lundi prochain").is_err());
    }
}
