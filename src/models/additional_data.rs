use super::{filled, null_as_default, require, ApiRecord, Validate};
use crate::error::{FormKind, SlateResult};
use serde::{Deserialize, Serialize};

pub const CATEGORIES: [&str; 4] = ["default", "important", "normal", "urgent"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdditionalData {
    #[serde(deserialize_with = "null_as_default")]
    pub id: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub value: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    pub description: Option<String>,
}

impl ApiRecord for AdditionalData {
    const KIND: &'static str = "donnée";

    fn id(&self) -> i64 {
        self.id
    }

    fn tidy(mut self) -> Self {
        if self.category.trim().is_empty() {
            self.category = CATEGORIES[0].into();
        }
        self
    }
}

impl Validate for AdditionalData {
    fn validate(&self) -> SlateResult<()> {
        require(FormKind::AdditionalData, "title", filled(&self.title))
    }
}

/// The next id for a locally built record: one past the largest, or 1.
#[must_use]
pub fn next_id<T: ApiRecord>(items: &[T]) -> i64 {
    items.iter().map(ApiRecord::id).max().map_or(1, |max| max.saturating_add(1))
}
