/// Maximum number of undo snapshots retained per editor. When the stack is
/// full the oldest snapshot is evicted.
pub const HISTORY_LIMIT: usize = 20;

/// Bounded stack of full-state snapshots. There is no redo: undoing pops the
/// most recent snapshot and discards the current state.
#[derive(Clone, Debug)]
pub struct History<S> {
    snapshots: Vec<S>,
}

impl<S> Default for History<S> {
    fn default() -> Self {
        Self {
            snapshots: Vec::new(),
        }
    }
}

impl<S> History<S> {
    pub fn push(&mut self, snapshot: S) {
        self.snapshots.push(snapshot);
        if self.snapshots.len() > HISTORY_LIMIT {
            let overflow = self.snapshots.len() - HISTORY_LIMIT;
            self.snapshots.drain(0..overflow);
        }
    }

    pub fn undo(&mut self) -> Option<S> {
        self.snapshots.pop()
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_pops_most_recent_first() {
        let mut history = History::default();
        history.push(1);
        history.push(2);
        history.push(3);
        assert_eq!(history.undo(), Some(3));
        assert_eq!(history.undo(), Some(2));
        assert_eq!(history.undo(), Some(1));
        assert_eq!(history.undo(), None);
    }

    #[test]
    fn stack_is_bounded_and_evicts_oldest() {
        let mut history = History::default();
        for i in 0..(HISTORY_LIMIT + 5) {
            history.push(i);
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history.undo(), Some(HISTORY_LIMIT + 4));
        let mut last = None;
        while let Some(s) = history.undo() {
            last = Some(s);
        }
        assert_eq!(last, Some(5));
    }

    #[test]
    fn empty_stack_reports_empty() {
        let mut history: History<u32> = History::default();
        assert!(history.is_empty());
        assert_eq!(history.undo(), None);
        history.push(7);
        assert!(!history.is_empty());
    }
}
