//! Minimal per-field delta views, computed against per-path emission
//! cursors rather than raw value equality.

use std::fmt::Write;

use rustc_hash::FxHashMap;

use crate::value::StreamValue;

/// Computes delta views of successive materialized instances.
///
/// A cursor records the text already emitted for a field path, so a string
/// fragment is sent at most once as long as the value grows monotonically;
/// a value the cursor text is no longer a prefix of is re-emitted in full.
/// Numbers, booleans and null have no partial representation and are always
/// re-emitted; unchanged strings and fully-emitted list elements collapse to
/// neutral markers.
#[derive(Debug, Default)]
pub(crate) struct DeltaComputer {
    cursors: FxHashMap<String, String>,
}

impl DeltaComputer {
    pub fn new() -> DeltaComputer {
        DeltaComputer {
            cursors: FxHashMap::default(),
        }
    }

    /// Produces the delta view for `current`, advancing the emission
    /// cursors of every string reachable in it.
    pub fn diff(&mut self, current: &StreamValue) -> StreamValue {
        let mut path = String::new();
        self.diff_value(&mut path, current)
    }

    fn diff_value(&mut self, path: &mut String, current: &StreamValue) -> StreamValue {
        match current {
            StreamValue::String(s) => {
                let suffix = match self.cursors.get(path.as_str()) {
                    Some(emitted) if s.starts_with(emitted.as_str()) => {
                        s[emitted.len()..].to_string()
                    }
                    _ => s.clone(),
                };
                self.cursors.insert(path.clone(), s.clone());
                StreamValue::String(suffix)
            }
            StreamValue::Array(items) => StreamValue::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        let parent = path.len();
                        let _ = write!(path, "/{index}");
                        let delta = self.diff_value(path, item);
                        path.truncate(parent);
                        delta
                    })
                    .collect(),
            ),
            StreamValue::Object(fields) => StreamValue::Object(
                fields
                    .iter()
                    .map(|(name, value)| {
                        let parent = path.len();
                        path.push('/');
                        // RFC 6901 escaping keeps a field named "a/0" from
                        // sharing a cursor with element 0 of a list field "a".
                        for c in name.chars() {
                            match c {
                                '~' => path.push_str("~0"),
                                '/' => path.push_str("~1"),
                                c => path.push(c),
                            }
                        }
                        let delta = self.diff_value(path, value);
                        path.truncate(parent);
                        (name.clone(), delta)
                    })
                    .collect(),
            ),
            // No partial representation; re-emitted in full whenever present.
            scalar => scalar.clone(),
        }
    }
}

#[cfg(test)]
mod test {
    use indexmap::IndexMap;

    use super::*;

    fn obj(pairs: &[(&str, StreamValue)]) -> StreamValue {
        StreamValue::Object(
            pairs
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect::<IndexMap<_, _>>(),
        )
    }

    fn s(text: &str) -> StreamValue {
        StreamValue::String(text.to_string())
    }

    #[test]
    fn first_emission_sends_full_values() {
        let mut deltas = DeltaComputer::new();
        let current = obj(&[("a", StreamValue::Integer(1)), ("b", s("xyz"))]);
        assert_eq!(deltas.diff(&current), current);
    }

    #[test]
    fn unchanged_strings_collapse_to_empty() {
        let mut deltas = DeltaComputer::new();
        let current = obj(&[("s", s("abc"))]);
        deltas.diff(&current);
        assert_eq!(deltas.diff(&current), obj(&[("s", s(""))]));
    }

    #[test]
    fn string_growth_emits_the_suffix_only() {
        let mut deltas = DeltaComputer::new();
        deltas.diff(&obj(&[("s", s("abc"))]));
        assert_eq!(
            deltas.diff(&obj(&[("s", s("abcdef"))])),
            obj(&[("s", s("def"))])
        );
    }

    #[test]
    fn non_monotonic_strings_are_re_emitted_in_full() {
        let mut deltas = DeltaComputer::new();
        deltas.diff(&obj(&[("s", s("xyz"))]));
        assert_eq!(deltas.diff(&obj(&[("s", s("abc"))])), obj(&[("s", s("abc"))]));
    }

    #[test]
    fn scalars_are_always_re_emitted() {
        let mut deltas = DeltaComputer::new();
        let current = obj(&[
            ("a", StreamValue::Integer(1)),
            ("b", StreamValue::Boolean(true)),
            ("c", StreamValue::Null),
        ]);
        deltas.diff(&current);
        assert_eq!(deltas.diff(&current), current);
    }

    #[test]
    fn list_elements_diff_independently() {
        let mut deltas = DeltaComputer::new();
        deltas.diff(&obj(&[(
            "l",
            StreamValue::Array(vec![s("abc"), StreamValue::Integer(1)]),
        )]));
        assert_eq!(
            deltas.diff(&obj(&[(
                "l",
                StreamValue::Array(vec![s("abcdef"), StreamValue::Integer(2)]),
            )])),
            obj(&[("l", StreamValue::Array(vec![s("def"), StreamValue::Integer(2)]))])
        );
    }

    #[test]
    fn appended_list_indices_are_first_emissions() {
        let mut deltas = DeltaComputer::new();
        deltas.diff(&obj(&[("l", StreamValue::Array(vec![s("a")]))]));
        assert_eq!(
            deltas.diff(&obj(&[("l", StreamValue::Array(vec![s("a"), s("b")]))])),
            obj(&[("l", StreamValue::Array(vec![s(""), s("b")]))])
        );
    }

    #[test]
    fn separator_characters_in_field_names_do_not_collide() {
        let mut deltas = DeltaComputer::new();
        let current = obj(&[
            ("a", StreamValue::Array(vec![s("ab")])),
            ("a/0", s("abz")),
        ]);
        // Both paths are first emissions; a shared cursor would leak "ab"
        // into the second field's suffix.
        assert_eq!(deltas.diff(&current), current);
        assert_eq!(
            deltas.diff(&current),
            obj(&[("a", StreamValue::Array(vec![s("")])), ("a/0", s(""))])
        );
    }

    #[test]
    fn nested_objects_recurse() {
        let mut deltas = DeltaComputer::new();
        deltas.diff(&obj(&[("d", obj(&[("s", s("a"))]))]));
        assert_eq!(
            deltas.diff(&obj(&[("d", obj(&[("s", s("ab"))]))])),
            obj(&[("d", obj(&[("s", s("b"))]))])
        );
    }
}
