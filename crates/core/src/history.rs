//! Undo/redo snapshot stacks for the stroke list under edit
//!
//! Bounded-depth stacks of deep-copied stroke-list snapshots. History is
//! scoped to one page; navigating to another page resets it. Full deep
//! copies are fine at per-page stroke counts.

use note_model::Stroke;

/// Default bound on undo/redo depth.
pub const DEFAULT_HISTORY_DEPTH: usize = 30;

/// Snapshot stacks for one page's stroke list.
#[derive(Debug)]
pub struct StrokeHistory {
    undo: Vec<Vec<Stroke>>,
    redo: Vec<Vec<Stroke>>,
    depth: usize,
}

impl StrokeHistory {
    pub fn new() -> Self {
        Self::with_depth(DEFAULT_HISTORY_DEPTH)
    }

    pub fn with_depth(depth: usize) -> Self {
        Self { undo: Vec::new(), redo: Vec::new(), depth }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Record a completed stroke or erase action.
    ///
    /// Pushes a deep copy of the *pre-action* list and clears the redo
    /// stack; any redoable future is invalidated by a new action. The oldest
    /// snapshot is dropped once the depth bound is hit.
    pub fn record(&mut self, pre_action: &[Stroke]) {
        self.undo.push(pre_action.to_vec());
        if self.undo.len() > self.depth {
            self.undo.remove(0);
        }
        self.redo.clear();
    }

    /// Restore the most recent snapshot into `current`.
    ///
    /// Returns `false` (leaving `current` untouched) when there is nothing
    /// to undo.
    pub fn undo(&mut self, current: &mut Vec<Stroke>) -> bool {
        let Some(snapshot) = self.undo.pop() else {
            return false;
        };
        self.redo.push(current.clone());
        *current = snapshot;
        true
    }

    /// Symmetric counterpart of [`undo`](Self::undo).
    pub fn redo(&mut self, current: &mut Vec<Stroke>) -> bool {
        let Some(snapshot) = self.redo.pop() else {
            return false;
        };
        self.undo.push(current.clone());
        *current = snapshot;
        true
    }

    /// Drop both stacks. Called when navigating to another page; history
    /// never spans pages.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for StrokeHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use note_model::{Point, StrokeMode};

    fn stroke(x: f32) -> Stroke {
        Stroke::new(vec![Point::new(x, 0.0)], 2.0, 0xFF000000, StrokeMode::Pen).expect("stroke")
    }

    #[test]
    fn test_undo_then_redo_restores_both_states() {
        let mut history = StrokeHistory::new();
        let before = vec![stroke(1.0)];
        let mut current = before.clone();

        history.record(&current);
        current.push(stroke(2.0));
        let after = current.clone();

        assert!(history.undo(&mut current));
        assert_eq!(current, before);

        assert!(history.redo(&mut current));
        assert_eq!(current, after);
    }

    #[test]
    fn test_undo_on_empty_stack_is_noop() {
        let mut history = StrokeHistory::new();
        let mut current = vec![stroke(1.0)];
        assert!(!history.undo(&mut current));
        assert_eq!(current, vec![stroke(1.0)]);
    }

    #[test]
    fn test_new_action_clears_redo() {
        let mut history = StrokeHistory::new();
        let mut current = vec![stroke(1.0)];

        history.record(&current);
        current.push(stroke(2.0));
        history.undo(&mut current);
        assert!(history.can_redo());

        history.record(&current);
        current.push(stroke(3.0));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_depth_bound_drops_oldest_snapshot() {
        let mut history = StrokeHistory::with_depth(2);
        let mut current: Vec<Stroke> = Vec::new();

        for i in 0..4 {
            history.record(&current);
            current.push(stroke(i as f32));
        }

        assert!(history.undo(&mut current));
        assert!(history.undo(&mut current));
        assert!(!history.undo(&mut current));
        // Oldest two snapshots were evicted; we land on the state after the
        // second action, not the empty list.
        assert_eq!(current.len(), 2);
    }

    #[test]
    fn test_arbitrary_draw_erase_sequence_is_symmetric() {
        let mut history = StrokeHistory::new();
        let mut current: Vec<Stroke> = Vec::new();
        let mut states = vec![current.clone()];

        // Mixed sequence: draw, draw, erase, draw.
        for (action, x) in [("draw", 1.0), ("draw", 2.0), ("erase", 0.0), ("draw", 3.0)] {
            history.record(&current);
            match action {
                "draw" => current.push(stroke(x)),
                _ => {
                    current.remove(0);
                }
            }
            states.push(current.clone());
        }

        for expected in states.iter().rev().skip(1) {
            assert!(history.undo(&mut current));
            assert_eq!(&current, expected);
        }
        for expected in states.iter().skip(1) {
            assert!(history.redo(&mut current));
            assert_eq!(&current, expected);
        }
    }
}
