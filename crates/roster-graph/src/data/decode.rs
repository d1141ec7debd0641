//! Explicit decoding of generic graph records into typed records.
//!
//! Every field is checked for presence and type so a malformed node becomes
//! a `DecodeError` naming the field instead of a half-filled object.

use serde_json::Value;

use super::entities::{ActivityRecord, GraphRecord, PersonRecord};
use super::errors::DecodeError;

const PERSON: &str = "Person";
const ACTIVITY: &str = "Activity";

/// Decode a person record, including its optional nested activity.
pub fn decode_person(record: &GraphRecord) -> Result<PersonRecord, DecodeError> {
    let id = required_id(record, PERSON)?;
    let name = required_string(record, PERSON, "name")?;
    let role = optional_string(record, PERSON, "role")?;

    let activity = match record.get("activity") {
        None | Some(Value::Null) => None,
        Some(Value::Object(inner)) => Some(decode_activity(inner)?),
        Some(other) => {
            return Err(DecodeError::WrongType {
                entity: PERSON,
                field: "activity",
                expected: "object",
                found: type_name(other),
            })
        }
    };

    Ok(PersonRecord {
        id,
        name,
        role,
        activity,
    })
}

/// Decode an activity sub-record.
pub fn decode_activity(record: &GraphRecord) -> Result<ActivityRecord, DecodeError> {
    Ok(ActivityRecord {
        id: required_id(record, ACTIVITY)?,
        name: required_string(record, ACTIVITY, "name")?,
    })
}

// Node ids are stored as integers but exposed as strings.
fn required_id(record: &GraphRecord, entity: &'static str) -> Result<String, DecodeError> {
    match record.get("id") {
        None | Some(Value::Null) => Err(DecodeError::MissingField { entity, field: "id" }),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(n.to_string()),
        Some(other) => Err(DecodeError::WrongType {
            entity,
            field: "id",
            expected: "integer or string",
            found: type_name(other),
        }),
    }
}

fn required_string(
    record: &GraphRecord,
    entity: &'static str,
    field: &'static str,
) -> Result<String, DecodeError> {
    optional_string(record, entity, field)?.ok_or(DecodeError::MissingField { entity, field })
}

fn optional_string(
    record: &GraphRecord,
    entity: &'static str,
    field: &'static str,
) -> Result<Option<String>, DecodeError> {
    match record.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(DecodeError::WrongType {
            entity,
            field,
            expected: "string",
            found: type_name(other),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_f64() => "float",
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(value: Value) -> GraphRecord {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    #[test]
    fn test_decode_person_with_activity() {
        let person = decode_person(&record(json!({
            "id": 1,
            "name": "Ada",
            "role": "engineer",
            "activity": { "id": 10, "name": "chess" }
        })))
        .unwrap();

        assert_eq!(
            person,
            PersonRecord::new("1", "Ada", Some("engineer")).with_activity("10", "chess")
        );
    }

    #[test]
    fn test_decode_person_null_activity_is_none() {
        let person = decode_person(&record(json!({
            "id": "2", "name": "Grace", "role": null, "activity": null
        })))
        .unwrap();

        assert_eq!(person.activity, None);
        assert_eq!(person.role, None);
        assert_eq!(person.id, "2");
    }

    #[test]
    fn test_decode_person_missing_name() {
        let err = decode_person(&record(json!({ "id": 3 }))).unwrap_err();
        assert_eq!(
            err,
            DecodeError::MissingField { entity: "Person", field: "name" }
        );
    }

    #[test]
    fn test_decode_person_float_id_rejected() {
        let err = decode_person(&record(json!({ "id": 1.5, "name": "x" }))).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::WrongType { field: "id", found: "float", .. }
        ));
    }

    #[test]
    fn test_decode_partial_activity_rejected() {
        let err = decode_person(&record(json!({
            "id": 4, "name": "Linus", "activity": { "id": 7 }
        })))
        .unwrap_err();

        assert_eq!(
            err,
            DecodeError::MissingField { entity: "Activity", field: "name" }
        );
    }

    #[test]
    fn test_decode_activity_wrong_shape() {
        let err = decode_person(&record(json!({
            "id": 5, "name": "Ken", "activity": ["not", "an", "object"]
        })))
        .unwrap_err();

        assert!(matches!(
            err,
            DecodeError::WrongType { field: "activity", found: "array", .. }
        ));
    }
}
