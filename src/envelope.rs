//! The API isn't consistent about how it wraps things: some endpoints answer
//! with a bare array, some with `{success, data, message}`, some with the
//! record itself. Everything that reads a response goes through here.

use crate::models::ApiRecord;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Envelope<'a> {
    /// `[...]`
    List(&'a [Value]),
    /// `{"data": [...]}`
    Wrapped(&'a [Value]),
    /// `{"data": {...}}`
    WrappedOne(&'a Value),
    /// a record on its own
    Single(&'a Value),
    /// an envelope with nothing usable in it, or `"success": false`
    Rejected { message: Option<&'a str> },
    /// `null`, or a scalar
    Empty,
}

impl<'a> Envelope<'a> {
    #[must_use]
    pub fn of(raw: &'a Value) -> Self {
        match raw {
            Value::Array(items) => Self::List(items),
            Value::Object(map) if is_envelope(map) => Self::unwrap(map),
            Value::Object(_) => Self::Single(raw),
            _ => Self::Empty,
        }
    }

    fn unwrap(map: &'a Map<String, Value>) -> Self {
        let message = map.get("message").and_then(Value::as_str);
        if map.get("success").and_then(Value::as_bool) == Some(false) {
            return Self::Rejected { message };
        }

        match map.get("data") {
            Some(Value::Array(items)) => Self::Wrapped(items),
            Some(data @ Value::Object(_)) => Self::WrappedOne(data),
            _ => Self::Rejected { message },
        }
    }

    /// The raw records inside, however they were wrapped.
    #[must_use]
    pub fn records(&self) -> &'a [Value] {
        match *self {
            Self::List(items) | Self::Wrapped(items) => items,
            Self::WrappedOne(one) | Self::Single(one) => std::slice::from_ref(one),
            Self::Rejected { .. } | Self::Empty => &[],
        }
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.contains_key("data") || map.contains_key("success")
        // a record won't be just a message
        || (map.len() == 1 && map.contains_key("message"))
}

/// Map every record in `raw` through `mapper`. Never fails: anything
/// unreadable is logged and left out, so the worst case is an empty list.
pub fn normalize_with<T, F>(raw: &Value, what: &str, mut mapper: F) -> Vec<T>
where
    F: FnMut(&Value) -> Option<T>,
{
    let envelope = Envelope::of(raw);
    match envelope {
        Envelope::Rejected { message } => {
            error!(%what, ?message, "Response carried no data");
        }
        Envelope::Empty if !raw.is_null() => {
            error!(%what, ?raw, "Unexpected response shape");
        }
        _ => trace!(%what, ?envelope, "Normalizing response"),
    }

    envelope.records().iter().filter_map(&mut mapper).collect()
}

#[must_use]
pub fn normalize<T: ApiRecord>(raw: &Value) -> Vec<T> {
    normalize_with(raw, T::KIND, |value| match T::from_api(value) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(?e, ?value, kind = T::KIND, "Skipping unreadable record");
            None
        }
    })
}

/// For endpoints that hand back one record: `data` if it's there, else the
/// body itself.
#[must_use]
pub fn normalize_one<T: ApiRecord>(raw: &Value) -> Option<T> {
    normalize::<T>(raw).into_iter().next()
}

/// The `message` of an explicit `{success: false}` answer. An envelope that
/// is merely empty isn't a refusal.
#[must_use]
pub fn rejection(raw: &Value) -> Option<String> {
    let refused = raw.get("success").and_then(Value::as_bool) == Some(false);
    match Envelope::of(raw) {
        Envelope::Rejected { message } if refused => Some(
            message
                .unwrap_or("Format de réponse invalide")
                .to_string(),
        ),
        _ => None,
    }
}

/// The `message` of an envelope, whatever else it holds.
#[must_use]
pub fn message(raw: &Value) -> Option<&str> {
    raw.get("message").and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Meeting, Student, Teacher};
    use serde_json::json;

    #[test]
    fn bare_array() {
        let students: Vec<Student> = normalize(&json!([{"id": 1, "nom": "A"}]));
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, 1);
        assert_eq!(students[0].nom, "A");
    }

    #[test]
    fn wrapped_array() {
        let students: Vec<Student> = normalize(&json!({"success": true, "data": [{"id": 2}]}));
        assert_eq!(students.len(), 1);
        assert_eq!(students[0].id, 2);
    }

    #[test]
    fn wrapped_object() {
        let teachers: Vec<Teacher> =
            normalize(&json!({"success": true, "data": {"id": 5, "nom": "Roux"}}));
        assert_eq!(teachers.len(), 1);
        assert_eq!(teachers[0].nom, "Roux");
    }

    #[test]
    fn plain_object() {
        let meetings: Vec<Meeting> = normalize(&json!({"id": 3, "title": "Rentrée"}));
        assert_eq!(meetings.len(), 1);
        assert_eq!(meetings[0].title, "Rentrée");
    }

    #[test]
    fn nothing_to_map() {
        for raw in [
            json!(null),
            json!({"success": false}),
            json!({"success": false, "message": "Accès refusé", "data": [{"id": 1}]}),
            json!({"success": true, "data": null}),
            json!({"message": "Aucun résultat"}),
            json!(42),
            json!("oops"),
        ] {
            let students: Vec<Student> = normalize(&raw);
            assert!(students.is_empty(), "{raw}");
        }
    }

    #[test]
    fn unreadable_elements_are_skipped() {
        let students: Vec<Student> = normalize(&json!([{"id": 1}, {"id": "not a number"}, 7]));
        assert_eq!(students.len(), 1);
    }

    #[test]
    fn mapper_sees_every_element() {
        let mut seen = 0;
        let ids = normalize_with(&json!({"data": [{"id": 1}, {"id": 2}, {"id": 3}]}), "ids", |v| {
            seen += 1;
            v.get("id").and_then(Value::as_i64)
        });
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(seen, 3);
    }

    #[test]
    fn discriminator() {
        let array = json!([]);
        assert_eq!(Envelope::of(&array), Envelope::List(&[]));
        assert_eq!(
            Envelope::of(&json!({"success": false, "message": "non"})),
            Envelope::Rejected {
                message: Some("non")
            }
        );
        assert_eq!(
            rejection(&json!({"success": false})).as_deref(),
            Some("Format de réponse invalide")
        );
        assert!(rejection(&json!([])).is_none());
        assert!(rejection(&json!({"message": "Supprimé"})).is_none());
        assert_eq!(message(&json!({"message": "Supprimé"})), Some("Supprimé"));
    }

    #[test]
    fn single_record_endpoints() {
        let wrapped: Option<Teacher> = normalize_one(&json!({"data": {"id": 8}}));
        let bare: Option<Teacher> = normalize_one(&json!({"id": 9}));
        assert_eq!(wrapped.map(|t| t.id), Some(8));
        assert_eq!(bare.map(|t| t.id), Some(9));
        assert!(normalize_one::<Teacher>(&Value::Null).is_none());
    }
}
