//! Undo/redo bookkeeping for annotation edits.
//!
//! Two stacks and an append-only log. Recording a new action forgets any
//! redo branch; undone actions stay in the log.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct ActionHistory<A> {
    undo: VecDeque<A>,
    redo: Vec<A>,
    log: Vec<A>,
    capacity: Option<usize>,
}

impl<A> Default for ActionHistory<A> {
    fn default() -> Self {
        Self {
            undo: VecDeque::new(),
            redo: Vec::new(),
            log: Vec::new(),
            capacity: None,
        }
    }
}

impl<A: Clone> ActionHistory<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the undo stack; the oldest entry is dropped once full. A
    /// capacity of zero disables undo entirely.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn record(&mut self, action: A) {
        self.log.push(action.clone());
        self.redo.clear();
        self.push_undo(action);
    }

    pub fn undo(&mut self) -> Option<&A> {
        let action = self.undo.pop_back()?;
        self.redo.push(action);
        self.redo.last()
    }

    pub fn redo(&mut self) -> Option<&A> {
        let action = self.redo.pop()?;
        self.push_undo(action);
        self.undo.back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// The last `count` recorded actions, oldest first.
    pub fn recent(&self, count: usize) -> &[A] {
        let start = self.log.len().saturating_sub(count);
        &self.log[start..]
    }

    pub fn len(&self) -> usize {
        self.log.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.is_empty()
    }

    fn push_undo(&mut self, action: A) {
        if self.capacity == Some(0) {
            return;
        }
        self.undo.push_back(action);
        if let Some(capacity) = self.capacity {
            while self.undo.len() > capacity {
                self.undo.pop_front();
            }
        }
    }
}
