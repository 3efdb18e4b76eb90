use smallvec::SmallVec;

use crate::state::{Awaiting, Escape, Scope, ScopeKind, TokenState};

// Note: char::is_whitespace is not usable here because JSON only treats
// space, newline, carriage return and tab as whitespace.
fn is_json_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\n' | '\r' | '\t')
}

/// An append-only character-level state machine over a partial JSON document.
///
/// Characters are fed in with [`push_str`](JsonCompleter::push_str); at any
/// point [`complete`](JsonCompleter::complete) derives the syntactically
/// valid JSON text representing everything the buffered prefix already
/// commits to. The completer never rejects input; it assumes the stream is a
/// prefix of a well-formed document and only tracks what is unambiguous.
pub struct JsonCompleter {
    buf: String,
    scopes: SmallVec<[Scope; 8]>,
    token: TokenState,
}

impl JsonCompleter {
    pub fn new() -> Self {
        JsonCompleter {
            buf: String::new(),
            scopes: SmallVec::new(),
            token: TokenState::None,
        }
    }

    /// The raw text buffered so far.
    pub fn buffer(&self) -> &str {
        &self.buf
    }

    /// Appends a fragment, advancing the state machine one character at a
    /// time.
    pub fn push_str(&mut self, fragment: &str) {
        for c in fragment.chars() {
            self.push_char(c);
        }
    }

    pub fn push_char(&mut self, c: char) {
        let offset = self.buf.len();
        match self.token {
            TokenState::String {
                is_key,
                escape,
                pending_surrogate,
            } => match escape {
                Escape::None => match c {
                    '\\' => {
                        self.token = TokenState::String {
                            is_key,
                            escape: Escape::Started(offset),
                            pending_surrogate,
                        };
                    }
                    '"' => {
                        self.token = TokenState::None;
                        self.string_closed(is_key);
                    }
                    _ => {}
                },
                Escape::Started(backslash) => {
                    let escape = if c == 'u' {
                        Escape::Unicode {
                            backslash,
                            remaining: 4,
                            value: 0,
                        }
                    } else {
                        Escape::None
                    };
                    self.token = TokenState::String {
                        is_key,
                        escape,
                        pending_surrogate,
                    };
                }
                Escape::Unicode {
                    backslash,
                    remaining,
                    value,
                } => {
                    let value = (value << 4) | c.to_digit(16).unwrap_or(0) as u16;
                    if remaining > 1 {
                        self.token = TokenState::String {
                            is_key,
                            escape: Escape::Unicode {
                                backslash,
                                remaining: remaining - 1,
                                value,
                            },
                            pending_surrogate,
                        };
                    } else {
                        // The escape is fully consumed. A high surrogate still
                        // cannot end the string until its low half arrives.
                        let pending_surrogate = match value {
                            0xD800..=0xDBFF => Some(pending_surrogate.unwrap_or(backslash)),
                            _ => None,
                        };
                        self.token = TokenState::String {
                            is_key,
                            escape: Escape::None,
                            pending_surrogate,
                        };
                    }
                }
            },
            TokenState::Scalar { .. } => match c {
                ',' | '}' | ']' => {
                    self.token = TokenState::None;
                    self.value_closed();
                    self.structural(c, offset);
                }
                c if is_json_whitespace(c) => {
                    self.token = TokenState::None;
                    self.value_closed();
                }
                _ => {}
            },
            TokenState::None => self.structural(c, offset),
        }
        self.buf.push(c);
    }

    fn structural(&mut self, c: char, offset: usize) {
        match c {
            '{' => self.scopes.push(Scope::open(ScopeKind::Object)),
            '[' => self.scopes.push(Scope::open(ScopeKind::Array)),
            '}' | ']' => {
                self.scopes.pop();
                self.value_closed();
            }
            ',' => {
                if let Some(top) = self.scopes.last_mut() {
                    top.awaiting = match top.kind {
                        ScopeKind::Object => Awaiting::Key,
                        ScopeKind::Array => Awaiting::Value,
                    };
                    top.member_start = Some(offset);
                }
            }
            ':' => {
                if let Some(top) = self.scopes.last_mut() {
                    if top.kind == ScopeKind::Object {
                        top.awaiting = Awaiting::Value;
                    }
                }
            }
            '"' => {
                let mut is_key = false;
                if let Some(top) = self.scopes.last_mut() {
                    if top.kind == ScopeKind::Object && top.awaiting == Awaiting::Key {
                        is_key = true;
                        if top.member_start.is_none() {
                            top.member_start = Some(offset);
                        }
                    }
                }
                self.token = TokenState::String {
                    is_key,
                    escape: Escape::None,
                    pending_surrogate: None,
                };
            }
            c if is_json_whitespace(c) => {}
            _ => {
                if let Some(top) = self.scopes.last_mut() {
                    if top.member_start.is_none() {
                        top.member_start = Some(offset);
                    }
                }
                self.token = TokenState::Scalar { start: offset };
            }
        }
    }

    fn string_closed(&mut self, is_key: bool) {
        if is_key {
            if let Some(top) = self.scopes.last_mut() {
                top.awaiting = Awaiting::Colon;
            }
        } else {
            self.value_closed();
        }
    }

    fn value_closed(&mut self) {
        if let Some(top) = self.scopes.last_mut() {
            top.awaiting = Awaiting::CommaOrClose;
            top.member_start = None;
        }
    }

    fn dangling_member_start(&self) -> Option<usize> {
        self.scopes.last().and_then(|scope| scope.member_start)
    }

    /// Derives the best-effort syntactically valid JSON text for the current
    /// buffer. Pure given the current state; calling it repeatedly has no
    /// side effects.
    ///
    /// An open string is closed with a quote, truncating back past any
    /// half-consumed escape sequence or unpaired high surrogate escape (a
    /// string cannot validly end between the halves of a surrogate pair).
    /// A trailing number keeps its longest
    /// standalone prefix. Tokens that carry no information yet (a partial
    /// key, a bare literal prefix, a lone minus sign) are discarded together
    /// with the dangling member text that introduced them. Finally every open
    /// scope is closed, innermost first. An empty return means the buffer
    /// commits to nothing yet.
    pub fn complete(&self) -> String {
        let mut end = self.buf.len();
        let mut close_quote = false;

        match self.token {
            TokenState::String { is_key: true, .. } => {
                end = self.dangling_member_start().unwrap_or(end);
            }
            TokenState::String {
                is_key: false,
                escape,
                pending_surrogate,
            } => {
                end = match escape {
                    Escape::Started(backslash) | Escape::Unicode { backslash, .. } => {
                        pending_surrogate.unwrap_or(backslash)
                    }
                    Escape::None => pending_surrogate.unwrap_or(end),
                };
                close_quote = true;
            }
            TokenState::Scalar { start } => match standalone_scalar_len(&self.buf[start..]) {
                Some(len) => end = start + len,
                None => end = self.dangling_member_start().unwrap_or(start),
            },
            TokenState::None => {
                if let Some(top) = self.scopes.last() {
                    if top.awaiting != Awaiting::CommaOrClose {
                        if let Some(start) = top.member_start {
                            end = start;
                        }
                    }
                }
            }
        }

        let mut out = String::with_capacity(end + self.scopes.len() + 1);
        out.push_str(&self.buf[..end]);
        if close_quote {
            out.push('"');
        }
        for scope in self.scopes.iter().rev() {
            out.push(match scope.kind {
                ScopeKind::Object => '}',
                ScopeKind::Array => ']',
            });
        }
        out
    }
}

impl Default for JsonCompleter {
    fn default() -> Self {
        JsonCompleter::new()
    }
}

/// Length of the longest prefix of `token` that can stand alone as a
/// complete JSON scalar, if any. A literal spelled out only partially carries
/// no information and is dropped; a number is trimmed back past trailing
/// characters that cannot end it.
fn standalone_scalar_len(token: &str) -> Option<usize> {
    match token.chars().next() {
        Some('t') => (token == "true").then_some(4),
        Some('f') => (token == "false").then_some(5),
        Some('n') => (token == "null").then_some(4),
        _ => {
            let trimmed = token.trim_end_matches(['-', '+', '.', 'e', 'E']);
            (!trimmed.is_empty()).then_some(trimmed.len())
        }
    }
}
