//! Materializes typed values from a JSON document that arrives as a sequence
//! of text fragments, e.g. token by token from a generative model, without
//! waiting for the full document.
//!
//! A [`StreamParser`] is built once from a [`TypeDescriptor`] describing the
//! target structure. Every call to [`StreamParser::parse_chunk`] appends a
//! fragment, completes the buffered prefix into valid JSON (via the
//! `json-completion` crate), and merges the parsed data over a fully
//! defaulted skeleton, so every field of every returned instance has a
//! well-defined value from the first meaningful parse. In delta mode the
//! parser instead returns bandwidth-minimal views carrying only what is new
//! since the last emission: growing strings emit their fresh suffix,
//! unchanged fields collapse to neutral markers.
//!
//! ```
//! use delta_stream::{FieldDescriptor, StreamParser, StreamValue, TypeDescriptor};
//!
//! # fn main() {
//! let schema = TypeDescriptor::object([
//!     ("task", FieldDescriptor::new(TypeDescriptor::string())),
//!     ("is_boring", FieldDescriptor::new(TypeDescriptor::optional(TypeDescriptor::boolean()))),
//! ]);
//! let mut parser = StreamParser::new(schema, false).unwrap();
//!
//! // A half-streamed key carries no information yet.
//! assert!(parser.parse_chunk("{\"ta").unwrap().is_none());
//!
//! // As soon as a value prefix is unambiguous, a fully populated instance
//! // materializes; fields that have not streamed hold their defaults.
//! let instance = parser.parse_chunk("sk\": \"stu").unwrap().unwrap();
//! assert_eq!(instance["task"], StreamValue::String("stu".into()));
//! assert_eq!(instance["is_boring"], StreamValue::Null);
//!
//! let instance = parser.parse_chunk("dy\", \"is_boring\": true}").unwrap().unwrap();
//! assert_eq!(instance["task"], StreamValue::String("study".into()));
//! assert_eq!(instance["is_boring"], StreamValue::Boolean(true));
//! # }
//! ```

mod defaults;
mod delta;
mod error;
mod materialize;
mod parser;
mod schema;
mod value;

pub use error::{StreamError, StreamResult};
pub use parser::StreamParser;
pub use schema::{FieldDescriptor, PrimitiveKind, SchemaModel, TypeDescriptor};
pub use value::{JsonKind, StreamValue};

pub use json_completion::JsonCompleter;
