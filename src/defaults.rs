//! Default skeleton synthesis: every field of the target structure has a
//! well-defined value before any of it has streamed.

use indexmap::IndexMap;

use crate::error::{StreamError, StreamResult};
use crate::schema::{FieldDescriptor, PrimitiveKind, TypeDescriptor};
use crate::value::StreamValue;

/// Checks that every object field reachable through `ty` can be defaulted,
/// including objects nested under lists, unions and optionals. Bare numeric
/// leaves used as list elements or union variants are exempt; they never act
/// as a merge base on their own.
pub(crate) fn validate(ty: &TypeDescriptor) -> StreamResult<()> {
    match ty {
        TypeDescriptor::Primitive(_) => Ok(()),
        TypeDescriptor::List(element) => validate(element),
        TypeDescriptor::Optional(inner) => validate(inner),
        TypeDescriptor::Union(variants) => variants.iter().try_for_each(validate),
        TypeDescriptor::Object(fields) => {
            for (name, field) in fields {
                synthesize_field(field).map_err(|e| e.in_field(name))?;
                validate(&field.ty).map_err(|e| e.in_field(name))?;
            }
            Ok(())
        }
    }
}

/// The default value for a single field: the explicit default first, then
/// the stream default, then the type's own rule.
pub(crate) fn synthesize_field(field: &FieldDescriptor) -> StreamResult<StreamValue> {
    if let Some(value) = &field.default {
        Ok(value.clone())
    } else if let Some(value) = &field.stream_default {
        Ok(value.clone())
    } else {
        synthesize(&field.ty)
    }
}

/// The default value for a type with no caller-supplied default. Numeric and
/// boolean leaves are never implicitly zeroed; they fail instead.
pub(crate) fn synthesize(ty: &TypeDescriptor) -> StreamResult<StreamValue> {
    match ty {
        TypeDescriptor::Primitive(PrimitiveKind::String) => Ok(StreamValue::String(String::new())),
        TypeDescriptor::Primitive(PrimitiveKind::Null) => Ok(StreamValue::Null),
        TypeDescriptor::Primitive(kind) => Err(StreamError::Schema(format!(
            "a {kind} leaf needs an explicit or stream default"
        ))),
        TypeDescriptor::List(_) => Ok(StreamValue::Array(Vec::new())),
        TypeDescriptor::Optional(_) => Ok(StreamValue::Null),
        TypeDescriptor::Object(fields) => {
            let mut skeleton = IndexMap::with_capacity(fields.len());
            for (name, field) in fields {
                let value = synthesize_field(field).map_err(|e| e.in_field(name))?;
                skeleton.insert(name.clone(), value);
            }
            Ok(StreamValue::Object(skeleton))
        }
        TypeDescriptor::Union(variants) => {
            let nullable = variants.iter().any(|variant| {
                matches!(
                    variant,
                    TypeDescriptor::Primitive(PrimitiveKind::Null) | TypeDescriptor::Optional(_)
                )
            });
            if nullable {
                return Ok(StreamValue::Null);
            }
            // Priority: first string variant, then first list variant, then
            // the first declared variant under its own rule.
            let chosen = variants
                .iter()
                .find(|v| matches!(v, TypeDescriptor::Primitive(PrimitiveKind::String)))
                .or_else(|| variants.iter().find(|v| matches!(v, TypeDescriptor::List(_))))
                .or_else(|| variants.first())
                .ok_or_else(|| {
                    StreamError::Schema("an empty union cannot be defaulted".to_string())
                })?;
            synthesize(chosen)
        }
    }
}
