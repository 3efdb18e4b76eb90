//! An append-only state machine over a partial JSON document which, on
//! demand, completes the buffered prefix into syntactically valid JSON.
//!
//! This is the low-level half of streaming JSON materialization: callers feed
//! in text fragments as they arrive (for example token by token from a
//! generative model) and can ask at any point for the valid JSON document the
//! prefix already commits to. Open strings are closed, trailing numbers keep
//! their longest standalone prefix, half-spelled literals and dangling keys
//! are discarded, and every open array or object is closed innermost first.
//!
//! ```
//! use json_completion::JsonCompleter;
//!
//! # fn main() {
//! let mut completer = JsonCompleter::new();
//! completer.push_str("{\"items\": [\"a\", \"b");
//! assert_eq!(completer.complete(), "{\"items\": [\"a\", \"b\"]}");
//! completer.push_str("\", 12");
//! assert_eq!(completer.complete(), "{\"items\": [\"a\", \"b\", 12]}");
//! # }
//! ```

mod completer;
mod state;

pub use completer::*;
