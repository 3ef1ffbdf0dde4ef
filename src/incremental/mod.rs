//! Incremental re-parsing.
//!
//! After an edit, the top-level statements that end well before the edited
//! region are carried over from the previous tree, together with their
//! diagnostics, and only the remainder of the file is lexed and parsed again.
//! The outcome is always the tree a full parse of the edited text produces.

pub mod incremental;
