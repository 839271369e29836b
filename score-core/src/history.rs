/// Linear undo/redo timeline over snapshots.
///
/// Recording after an undo discards every entry past the cursor, so redo is
/// only ever available along the most recent branch.
#[derive(Debug, Clone)]
pub struct HistoryLog<T> {
    entries: Vec<T>,
    cursor: Option<usize>,
}

impl<T: Clone> HistoryLog<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: None,
        }
    }

    /// History whose only entry is `snapshot`; nothing to undo yet
    pub fn seeded(snapshot: T) -> Self {
        Self {
            entries: vec![snapshot],
            cursor: Some(0),
        }
    }

    pub fn record(&mut self, snapshot: T) {
        let keep = self.cursor.map_or(0, |cursor| cursor + 1);
        self.entries.truncate(keep);
        self.entries.push(snapshot);
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn undo(&mut self) -> Option<T> {
        let cursor = self.cursor.filter(|&c| c > 0)? - 1;
        self.cursor = Some(cursor);
        self.entries.get(cursor).cloned()
    }

    pub fn redo(&mut self) -> Option<T> {
        let next = self.cursor? + 1;
        if next >= self.entries.len() {
            return None;
        }
        self.cursor = Some(next);
        self.entries.get(next).cloned()
    }

    pub fn can_undo(&self) -> bool {
        self.cursor.is_some_and(|c| c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.is_some_and(|c| c + 1 < self.entries.len())
    }

    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T: Clone> Default for HistoryLog<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_history() {
        let mut history: HistoryLog<&str> = HistoryLog::new();
        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.current(), None);
    }

    #[test]
    fn test_first_record_is_not_undoable() {
        let mut history = HistoryLog::new();
        history.record("s0");
        assert_eq!(history.cursor(), Some(0));
        assert!(!history.can_undo());
        assert_eq!(history.undo(), None);
        assert_eq!(history.current(), Some(&"s0"));
    }

    #[test]
    fn test_undo_redo_round_trip() {
        let mut history = HistoryLog::seeded("s0");
        history.record("s1");
        history.record("s2");

        assert_eq!(history.undo(), Some("s1"));
        assert_eq!(history.undo(), Some("s0"));
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), Some(0));

        assert_eq!(history.redo(), Some("s1"));
        assert_eq!(history.redo(), Some("s2"));
        assert_eq!(history.redo(), None);
        assert_eq!(history.cursor(), Some(2));
    }

    #[test]
    fn test_record_after_undo_discards_branch() {
        let mut history = HistoryLog::new();
        history.record("s1");
        history.record("s2");
        assert_eq!(history.undo(), Some("s1"));

        history.record("s3");
        assert!(!history.can_redo());
        assert_eq!(history.redo(), None);
        assert_eq!(history.len(), 2);
        assert_eq!(history.undo(), Some("s1"));
        assert_eq!(history.redo(), Some("s3"));
    }

    #[test]
    fn test_flags_follow_cursor() {
        let mut history = HistoryLog::seeded(0);
        history.record(1);
        assert!(history.can_undo());
        assert!(!history.can_redo());

        history.undo();
        assert!(!history.can_undo());
        assert!(history.can_redo());
    }
}
