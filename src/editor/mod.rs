//! Editor pane text buffer.
//!
//! A rope-backed buffer with a single cursor. The buffer only edits text;
//! recording history snapshots is the caller's job, driven by the `bool`
//! each editing method returns.

mod buffer;

pub use buffer::{Cursor, Direction, EditorBuffer};
