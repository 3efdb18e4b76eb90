use std::fmt;
use std::ops::Index;

use indexmap::IndexMap;

/// A concrete value tree shaped exactly like a schema's type tree.
///
/// Every field of the declared structure is always present; "missing" is not
/// representable. Data that has not streamed yet holds its default instead.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<StreamValue>),
    Object(IndexMap<String, StreamValue>),
}

/// The structural JSON kind of a value, used for union dispatch and error
/// messages. Integers and floats share the `Number` kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for JsonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonKind::Null => "null",
            JsonKind::Boolean => "boolean",
            JsonKind::Number => "number",
            JsonKind::String => "string",
            JsonKind::Array => "array",
            JsonKind::Object => "object",
        };
        f.write_str(name)
    }
}

macro_rules! is_xxx {
    ($name:ident, $variant:pat) => {
        pub fn $name(&self) -> bool {
            matches!(self, $variant)
        }
    };
}

impl StreamValue {
    pub fn kind(&self) -> JsonKind {
        match self {
            StreamValue::Null => JsonKind::Null,
            StreamValue::Boolean(_) => JsonKind::Boolean,
            StreamValue::Integer(_) | StreamValue::Float(_) => JsonKind::Number,
            StreamValue::String(_) => JsonKind::String,
            StreamValue::Array(_) => JsonKind::Array,
            StreamValue::Object(_) => JsonKind::Object,
        }
    }

    is_xxx!(is_null, StreamValue::Null);
    is_xxx!(is_boolean, StreamValue::Boolean(_));
    is_xxx!(is_number, StreamValue::Integer(_) | StreamValue::Float(_));
    is_xxx!(is_string, StreamValue::String(_));
    is_xxx!(is_array, StreamValue::Array(_));
    is_xxx!(is_object, StreamValue::Object(_));

    pub fn as_str(&self) -> Option<&str> {
        match self {
            StreamValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[StreamValue]> {
        match self {
            StreamValue::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, StreamValue>> {
        match self {
            StreamValue::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

impl<'a> Index<&'a str> for StreamValue {
    type Output = StreamValue;

    fn index(&self, key: &'a str) -> &Self::Output {
        let fields = match self {
            StreamValue::Object(fields) => fields,
            _ => panic!(
                "Attempted to access an object with key '{}' but the value was {:?}",
                key, self
            ),
        };

        match fields.get(key) {
            Some(value) => value,
            None => panic!("Key '{}' was not found in {:?}", key, self),
        }
    }
}

impl Index<usize> for StreamValue {
    type Output = StreamValue;

    fn index(&self, index: usize) -> &Self::Output {
        let items = match self {
            StreamValue::Array(items) => items,
            _ => panic!(
                "Attempted to access an array with index {} but the value was {:?}",
                index, self,
            ),
        };
        &items[index]
    }
}
