//! Internal state of the completer: the scope stack and the token currently
//! being consumed, advanced once per appended character.

/// Kind of an open container scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScopeKind {
    Object,
    Array,
}

/// What the innermost scope expects next.
///
/// Objects cycle through `Key -> Colon -> Value -> CommaOrClose`; arrays only
/// use `Value` and `CommaOrClose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Awaiting {
    Key,
    Colon,
    Value,
    CommaOrClose,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Scope {
    pub kind: ScopeKind,
    pub awaiting: Awaiting,
    /// Byte offset of the earliest text to discard if the member currently
    /// being assembled cannot be completed: the preceding comma, or the
    /// member's first character.
    pub member_start: Option<usize>,
}

impl Scope {
    pub fn open(kind: ScopeKind) -> Scope {
        let awaiting = match kind {
            ScopeKind::Object => Awaiting::Key,
            ScopeKind::Array => Awaiting::Value,
        };
        Scope {
            kind,
            awaiting,
            member_start: None,
        }
    }
}

/// Progress through a backslash escape inside a string.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Escape {
    None,
    /// A backslash has been consumed; the offset is the backslash's position.
    Started(usize),
    /// Inside a `\uXXXX` escape with `remaining` hex digits outstanding.
    /// `value` accumulates the code unit consumed so far.
    Unicode {
        backslash: usize,
        remaining: u8,
        value: u16,
    },
}

/// The token currently being consumed, if any.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TokenState {
    None,
    String {
        is_key: bool,
        escape: Escape,
        /// Backslash offset of a fully consumed `\uXXXX` high surrogate whose
        /// low half has not arrived yet. The string cannot be closed after it;
        /// completion truncates back to this offset instead.
        pending_surrogate: Option<usize>,
    },
    /// A number or a `true`/`false`/`null` literal starting at `start`.
    Scalar { start: usize },
}
