//! Build-once schema descriptors: an explicit tagged type tree constructed
//! through a builder API, validated when the [`SchemaModel`] is built. No
//! type introspection happens at parse time.

use std::fmt;

use indexmap::IndexMap;

use crate::defaults;
use crate::error::StreamResult;
use crate::value::StreamValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveKind {
    String,
    Integer,
    Float,
    Boolean,
    Null,
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Float => "float",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Null => "null",
        };
        f.write_str(name)
    }
}

/// Description of a target type: primitives, lists, nested objects with
/// ordered fields, ordered unions and optionals.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeDescriptor {
    Primitive(PrimitiveKind),
    List(Box<TypeDescriptor>),
    Object(IndexMap<String, FieldDescriptor>),
    Union(Vec<TypeDescriptor>),
    Optional(Box<TypeDescriptor>),
}

impl TypeDescriptor {
    pub fn string() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::String)
    }

    pub fn integer() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Integer)
    }

    pub fn float() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Float)
    }

    pub fn boolean() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Boolean)
    }

    pub fn null() -> TypeDescriptor {
        TypeDescriptor::Primitive(PrimitiveKind::Null)
    }

    pub fn list(element: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::List(Box::new(element))
    }

    pub fn object<K, I>(fields: I) -> TypeDescriptor
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, FieldDescriptor)>,
    {
        TypeDescriptor::Object(
            fields
                .into_iter()
                .map(|(name, field)| (name.into(), field))
                .collect(),
        )
    }

    pub fn union(variants: impl IntoIterator<Item = TypeDescriptor>) -> TypeDescriptor {
        TypeDescriptor::Union(variants.into_iter().collect())
    }

    pub fn optional(inner: TypeDescriptor) -> TypeDescriptor {
        TypeDescriptor::Optional(Box::new(inner))
    }
}

/// One named field of an object type.
///
/// The explicit default takes precedence over the stream default; the stream
/// default exists so callers can pick a placeholder that does not degrade
/// generation quality, distinct from the field's structural default.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub ty: TypeDescriptor,
    pub default: Option<StreamValue>,
    pub stream_default: Option<StreamValue>,
    pub required: bool,
}

impl FieldDescriptor {
    pub fn new(ty: TypeDescriptor) -> FieldDescriptor {
        FieldDescriptor {
            ty,
            default: None,
            stream_default: None,
            required: true,
        }
    }

    pub fn with_default(mut self, value: StreamValue) -> FieldDescriptor {
        self.default = Some(value);
        self
    }

    pub fn with_stream_default(mut self, value: StreamValue) -> FieldDescriptor {
        self.stream_default = Some(value);
        self
    }

    pub fn required(mut self, required: bool) -> FieldDescriptor {
        self.required = required;
        self
    }
}

/// A validated type tree plus its cached default skeleton.
///
/// Building fails if any numeric or boolean leaf that can end up as a merge
/// base lacks both an explicit and a stream default; afterwards every
/// materialized instance is guaranteed fully populated. Immutable once built.
#[derive(Debug, Clone)]
pub struct SchemaModel {
    root: TypeDescriptor,
    skeleton: StreamValue,
}

impl SchemaModel {
    pub fn build(root: TypeDescriptor) -> StreamResult<SchemaModel> {
        defaults::validate(&root)?;
        let skeleton = defaults::synthesize(&root)?;
        Ok(SchemaModel { root, skeleton })
    }

    pub fn root(&self) -> &TypeDescriptor {
        &self.root
    }

    /// The fully defaulted instance used as the merge base for partially
    /// streamed data. Callers clone it; it is never handed out mutably.
    pub fn skeleton(&self) -> &StreamValue {
        &self.skeleton
    }
}
