//! The stream parser orchestrator: owns all cross-call state and composes
//! completion, materialization and delta computation into `parse_chunk`.

use json_completion::JsonCompleter;

use crate::delta::DeltaComputer;
use crate::error::StreamResult;
use crate::materialize;
use crate::schema::{SchemaModel, TypeDescriptor};
use crate::value::StreamValue;

/// Incrementally materializes a typed value from a JSON document arriving as
/// a sequence of text fragments.
///
/// One instance corresponds to exactly one logical stream and must be driven
/// by a single caller sequence; concurrent calls are not synchronized
/// internally. All mutable state (buffer, completer stack, emission cursors,
/// last instance) is exclusively owned by the instance.
pub struct StreamParser {
    schema: SchemaModel,
    delta_mode: bool,
    completer: JsonCompleter,
    last: StreamValue,
    deltas: DeltaComputer,
}

impl StreamParser {
    /// Builds the schema, failing fast if a numeric or boolean leaf lacks a
    /// default, and seeds the parser with the default skeleton.
    pub fn new(descriptor: TypeDescriptor, delta_mode: bool) -> StreamResult<StreamParser> {
        let schema = SchemaModel::build(descriptor)?;
        let last = schema.skeleton().clone();
        Ok(StreamParser {
            schema,
            delta_mode,
            completer: JsonCompleter::new(),
            last,
            deltas: DeltaComputer::new(),
        })
    }

    pub fn schema(&self) -> &SchemaModel {
        &self.schema
    }

    /// Consumes the next fragment and returns the freshly materialized
    /// instance (or, in delta mode, the delta view carrying only what is new
    /// since the last emission). Returns `Ok(None)` when the fragment adds
    /// no newly decodable information.
    pub fn parse_chunk(&mut self, fragment: &str) -> StreamResult<Option<StreamValue>> {
        self.completer.push_str(fragment);
        let completed = self.completer.complete();
        if completed.trim().is_empty() {
            return Ok(None);
        }
        let instance = materialize::materialize(&completed, &self.schema)?;
        if instance == self.last {
            return Ok(None);
        }
        let result = if self.delta_mode {
            self.deltas.diff(&instance)
        } else {
            instance.clone()
        };
        self.last = instance;
        Ok(Some(result))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::StreamError;
    use crate::schema::FieldDescriptor;

    fn task_schema() -> TypeDescriptor {
        TypeDescriptor::object([
            ("task", FieldDescriptor::new(TypeDescriptor::string())),
            (
                "is_boring",
                FieldDescriptor::new(TypeDescriptor::optional(TypeDescriptor::boolean())),
            ),
        ])
    }

    #[test]
    fn absent_until_a_value_prefix_is_unambiguous() {
        let mut parser = StreamParser::new(task_schema(), false).unwrap();
        // A half-streamed key, then the rest of it, then the colon: none of
        // these decode to anything beyond the defaults.
        assert!(parser.parse_chunk("{\"ta").unwrap().is_none());
        assert!(parser.parse_chunk("sk").unwrap().is_none());
        assert!(parser.parse_chunk("\":").unwrap().is_none());

        let instance = parser.parse_chunk("\"s").unwrap().unwrap();
        assert_eq!(instance["task"], StreamValue::String("s".into()));
        assert_eq!(instance["is_boring"], StreamValue::Null);

        let instance = parser
            .parse_chunk("tudy\",\"is_boring\": true}")
            .unwrap()
            .unwrap();
        assert_eq!(instance["task"], StreamValue::String("study".into()));
        assert_eq!(instance["is_boring"], StreamValue::Boolean(true));
    }

    #[test]
    fn schema_rejection_happens_at_construction() {
        let schema =
            TypeDescriptor::object([("n", FieldDescriptor::new(TypeDescriptor::integer()))]);
        assert!(matches!(
            StreamParser::new(schema, false),
            Err(StreamError::Schema(_))
        ));
    }

    #[test]
    fn unresolved_literals_make_no_progress() {
        let mut parser = StreamParser::new(task_schema(), false).unwrap();
        parser.parse_chunk("{\"task\":\"x\"").unwrap().unwrap();
        assert!(parser.parse_chunk(",\"is_boring\": tru").unwrap().is_none());
        let instance = parser.parse_chunk("e").unwrap().unwrap();
        assert_eq!(instance["is_boring"], StreamValue::Boolean(true));
    }

    #[test]
    fn delta_mode_emits_string_suffixes() {
        let schema = TypeDescriptor::object([
            ("title", FieldDescriptor::new(TypeDescriptor::string())),
            (
                "pages",
                FieldDescriptor::new(TypeDescriptor::integer())
                    .with_default(StreamValue::Integer(0)),
            ),
        ]);
        let mut parser = StreamParser::new(schema, true).unwrap();

        let delta = parser.parse_chunk("{\"title\": \"T").unwrap().unwrap();
        assert_eq!(delta["title"], StreamValue::String("T".into()));
        assert_eq!(delta["pages"], StreamValue::Integer(0));

        let delta = parser.parse_chunk("h").unwrap().unwrap();
        assert_eq!(delta["title"], StreamValue::String("h".into()));

        let delta = parser.parse_chunk("e").unwrap().unwrap();
        assert_eq!(delta["title"], StreamValue::String("e".into()));

        // The closing quote and brace decode nothing new.
        assert!(parser.parse_chunk("\"}").unwrap().is_none());
    }

    #[test]
    fn delta_mode_reverts_finished_list_indices_to_neutral() {
        let schema = TypeDescriptor::object([(
            "tags",
            FieldDescriptor::new(TypeDescriptor::list(TypeDescriptor::string())),
        )]);
        let mut parser = StreamParser::new(schema, true).unwrap();

        let delta = parser.parse_chunk("{\"tags\":[\"ab").unwrap().unwrap();
        assert_eq!(
            delta["tags"],
            StreamValue::Array(vec![StreamValue::String("ab".into())])
        );

        let delta = parser.parse_chunk("c\",\"d").unwrap().unwrap();
        assert_eq!(
            delta["tags"],
            StreamValue::Array(vec![
                StreamValue::String("c".into()),
                StreamValue::String("d".into()),
            ])
        );

        let delta = parser.parse_chunk("e\"]}").unwrap().unwrap();
        assert_eq!(
            delta["tags"],
            StreamValue::Array(vec![
                StreamValue::String(String::new()),
                StreamValue::String("e".into()),
            ])
        );
    }
}
