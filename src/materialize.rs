//! Parses completed text into a raw value tree and merges it against the
//! schema: present values are coerced and validated, absent fields fall back
//! to their defaults, unions resolve by structural kind.

use serde_json::Value as RawValue;

use crate::defaults;
use crate::error::{StreamError, StreamResult};
use crate::schema::{PrimitiveKind, SchemaModel, TypeDescriptor};
use crate::value::{JsonKind, StreamValue};

pub(crate) fn materialize(completed: &str, schema: &SchemaModel) -> StreamResult<StreamValue> {
    let raw: RawValue = serde_json::from_str(completed)
        .map_err(|e| StreamError::Parse(format!("completed text is not valid JSON: {e}")))?;
    from_raw(&raw, schema.root())
}

fn from_raw(raw: &RawValue, ty: &TypeDescriptor) -> StreamResult<StreamValue> {
    match ty {
        TypeDescriptor::Primitive(kind) => from_primitive(raw, *kind),
        TypeDescriptor::Optional(inner) => {
            if raw.is_null() {
                Ok(StreamValue::Null)
            } else {
                from_raw(raw, inner)
            }
        }
        TypeDescriptor::Union(variants) => {
            // First declared variant whose structural kind matches wins.
            let variant = variants
                .iter()
                .find(|variant| kind_matches(variant, raw))
                .ok_or_else(|| {
                    StreamError::Validation(format!(
                        "no union variant matches {} value",
                        raw_kind(raw)
                    ))
                })?;
            from_raw(raw, variant)
        }
        TypeDescriptor::List(element) => {
            let items = raw
                .as_array()
                .ok_or_else(|| kind_error(JsonKind::Array, raw))?;
            items
                .iter()
                .map(|item| from_raw(item, element))
                .collect::<StreamResult<Vec<_>>>()
                .map(StreamValue::Array)
        }
        TypeDescriptor::Object(fields) => {
            let map = raw
                .as_object()
                .ok_or_else(|| kind_error(JsonKind::Object, raw))?;
            let mut out = indexmap::IndexMap::with_capacity(fields.len());
            for (name, field) in fields {
                let value = match map.get(name) {
                    Some(present) => from_raw(present, &field.ty).map_err(|e| e.in_field(name))?,
                    // Absent fields take the field's skeleton value.
                    None => defaults::synthesize_field(field).map_err(|e| e.in_field(name))?,
                };
                out.insert(name.clone(), value);
            }
            Ok(StreamValue::Object(out))
        }
    }
}

fn from_primitive(raw: &RawValue, kind: PrimitiveKind) -> StreamResult<StreamValue> {
    match kind {
        PrimitiveKind::String => raw
            .as_str()
            .map(|s| StreamValue::String(s.to_string()))
            .ok_or_else(|| kind_error(JsonKind::String, raw)),
        PrimitiveKind::Boolean => raw
            .as_bool()
            .map(StreamValue::Boolean)
            .ok_or_else(|| kind_error(JsonKind::Boolean, raw)),
        PrimitiveKind::Null => {
            if raw.is_null() {
                Ok(StreamValue::Null)
            } else {
                Err(kind_error(JsonKind::Null, raw))
            }
        }
        PrimitiveKind::Float => raw
            .as_f64()
            .map(StreamValue::Float)
            .ok_or_else(|| kind_error(JsonKind::Number, raw)),
        PrimitiveKind::Integer => {
            if let Some(i) = raw.as_i64() {
                Ok(StreamValue::Integer(i))
            } else if let Some(f) = raw.as_f64() {
                // Integer leaves tolerate a zero fractional part, within i64
                // range only. The upper bound is exclusive: i64::MAX as f64
                // rounds up to 2^63, which does not fit.
                if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
                    Ok(StreamValue::Integer(f as i64))
                } else {
                    Err(StreamError::Validation(format!(
                        "number {f} is not representable as an integer"
                    )))
                }
            } else {
                Err(kind_error(JsonKind::Number, raw))
            }
        }
    }
}

fn kind_matches(ty: &TypeDescriptor, raw: &RawValue) -> bool {
    match ty {
        TypeDescriptor::Primitive(PrimitiveKind::String) => raw.is_string(),
        TypeDescriptor::Primitive(PrimitiveKind::Integer | PrimitiveKind::Float) => raw.is_number(),
        TypeDescriptor::Primitive(PrimitiveKind::Boolean) => raw.is_boolean(),
        TypeDescriptor::Primitive(PrimitiveKind::Null) => raw.is_null(),
        TypeDescriptor::List(_) => raw.is_array(),
        TypeDescriptor::Object(_) => raw.is_object(),
        TypeDescriptor::Optional(inner) => raw.is_null() || kind_matches(inner, raw),
        TypeDescriptor::Union(variants) => variants.iter().any(|v| kind_matches(v, raw)),
    }
}

fn raw_kind(raw: &RawValue) -> JsonKind {
    match raw {
        RawValue::Null => JsonKind::Null,
        RawValue::Bool(_) => JsonKind::Boolean,
        RawValue::Number(_) => JsonKind::Number,
        RawValue::String(_) => JsonKind::String,
        RawValue::Array(_) => JsonKind::Array,
        RawValue::Object(_) => JsonKind::Object,
    }
}

fn kind_error(expected: JsonKind, raw: &RawValue) -> StreamError {
    StreamError::Validation(format!("expected {expected} but found {}", raw_kind(raw)))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::schema::FieldDescriptor;

    fn model(ty: TypeDescriptor) -> SchemaModel {
        SchemaModel::build(ty).unwrap()
    }

    fn task_count_schema() -> SchemaModel {
        model(TypeDescriptor::object([
            ("task", FieldDescriptor::new(TypeDescriptor::string())),
            (
                "count",
                FieldDescriptor::new(TypeDescriptor::integer())
                    .with_default(StreamValue::Integer(7)),
            ),
        ]))
    }

    #[test]
    fn absent_fields_fall_back_to_defaults() {
        let instance = materialize("{\"task\":\"go\"}", &task_count_schema()).unwrap();
        assert_eq!(instance["task"], StreamValue::String("go".into()));
        assert_eq!(instance["count"], StreamValue::Integer(7));
    }

    #[test]
    fn kind_conflicts_are_validation_errors() {
        let err = materialize("{\"count\":\"x\"}", &task_count_schema()).unwrap_err();
        assert!(matches!(err, StreamError::Validation(_)), "got {err}");
    }

    #[test]
    fn unions_resolve_to_the_first_matching_variant() {
        let schema = model(TypeDescriptor::object([(
            "u",
            FieldDescriptor::new(TypeDescriptor::union([
                TypeDescriptor::integer(),
                TypeDescriptor::string(),
            ])),
        )]));
        let instance = materialize("{\"u\": 3}", &schema).unwrap();
        assert_eq!(instance["u"], StreamValue::Integer(3));
        let instance = materialize("{\"u\": \"x\"}", &schema).unwrap();
        assert_eq!(instance["u"], StreamValue::String("x".into()));
        let err = materialize("{\"u\": true}", &schema).unwrap_err();
        assert!(matches!(err, StreamError::Validation(_)), "got {err}");
    }

    #[test]
    fn integers_tolerate_zero_fractions_only() {
        let schema = task_count_schema();
        let instance = materialize("{\"count\": 12.0}", &schema).unwrap();
        assert_eq!(instance["count"], StreamValue::Integer(12));
        let err = materialize("{\"count\": 12.5}", &schema).unwrap_err();
        assert!(matches!(err, StreamError::Validation(_)), "got {err}");
    }

    #[test]
    fn integers_reject_out_of_range_floats() {
        let schema = task_count_schema();
        for text in ["{\"count\": 1e30}", "{\"count\": -1e30}"] {
            let err = materialize(text, &schema).unwrap_err();
            assert!(matches!(err, StreamError::Validation(_)), "got {err}");
        }
    }

    #[test]
    fn broken_text_is_a_parse_error() {
        let err = materialize("{\"task\":", &task_count_schema()).unwrap_err();
        assert!(matches!(err, StreamError::Parse(_)), "got {err}");
    }

    #[test]
    fn nested_lists_of_objects_materialize_with_defaults() {
        let element = TypeDescriptor::object([
            ("name", FieldDescriptor::new(TypeDescriptor::string())),
            (
                "n",
                FieldDescriptor::new(TypeDescriptor::integer())
                    .with_stream_default(StreamValue::Integer(0)),
            ),
        ]);
        let schema = model(TypeDescriptor::object([(
            "items",
            FieldDescriptor::new(TypeDescriptor::list(element)),
        )]));
        let instance = materialize("{\"items\":[{\"name\":\"a\"},{\"n\":4}]}", &schema).unwrap();
        assert_eq!(instance["items"][0]["n"], StreamValue::Integer(0));
        assert_eq!(instance["items"][1]["name"], StreamValue::String(String::new()));
        assert_eq!(instance["items"][1]["n"], StreamValue::Integer(4));
    }
}
