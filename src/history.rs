//! Linear edit history.
//!
//! Every edit stores a full snapshot of the document. Undo walks the index
//! backwards without touching the snapshots; the next edit after an undo
//! truncates everything past the index before appending. There is no redo.

/// Snapshot history with a cursor into it.
///
/// The entry list is never empty and `index` always points at a valid
/// entry.
///
/// # Example
///
/// ```
/// use markpad::history::EditHistory;
///
/// let mut history = EditHistory::new("A");
/// history.apply_edit("AB");
/// history.apply_edit("ABC");
/// assert_eq!(history.undo(), Some("AB"));
/// history.apply_edit("X");
/// assert_eq!(history.entries(), ["A", "AB", "X"]);
/// assert_eq!(history.index(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditHistory {
    entries: Vec<String>,
    index: usize,
}

impl EditHistory {
    /// Start a history seeded with the initial document.
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            entries: vec![seed.into()],
            index: 0,
        }
    }

    /// The snapshot currently displayed.
    pub fn current(&self) -> &str {
        // index < entries.len() is upheld by every mutation below
        &self.entries[self.index]
    }

    pub const fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history holds at least the seed document.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub const fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Record a new snapshot after the current one.
    ///
    /// Entries beyond the current index are dropped first, so stepping back
    /// and then editing permanently discards the old future.
    pub fn apply_edit(&mut self, new_text: impl Into<String>) -> &str {
        let discarded = self.entries.len() - (self.index + 1);
        self.entries.truncate(self.index + 1);
        self.entries.push(new_text.into());
        self.index = self.entries.len() - 1;
        tracing::debug!(
            index = self.index,
            len = self.entries.len(),
            discarded,
            "history.apply_edit"
        );
        self.current()
    }

    /// Step back one snapshot.
    ///
    /// Returns the newly current text, or `None` when already at the seed.
    pub fn undo(&mut self) -> Option<&str> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        tracing::debug!(index = self.index, len = self.entries.len(), "history.undo");
        Some(self.current())
    }

    /// Record text that arrived from outside the editor (file upload).
    ///
    /// Same truncate-then-append policy as [`EditHistory::apply_edit`].
    pub fn load_external_text(&mut self, text: impl Into<String>) -> &str {
        let text = text.into();
        tracing::info!(bytes = text.len(), "history.load_external_text");
        self.apply_edit(text)
    }
}
