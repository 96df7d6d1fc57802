use std::fmt;
use uuid::Uuid;

/// Identity of one version of a session's active path. Navigation history is
/// only meaningful within a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimelineKey {
    pub session_id: Uuid,
    pub path_version: i32,
}

type NodeSelectCallback = Box<dyn FnMut(Uuid) + Send>;

/// Step selection over the active path with undo/redo of visited nodes.
pub struct TimelineNavigator {
    key: TimelineKey,
    current_path: Vec<Uuid>,
    selected_step: usize,
    undo_stack: Vec<Uuid>,
    redo_stack: Vec<Uuid>,
    on_node_select: Option<NodeSelectCallback>,
}

impl fmt::Debug for TimelineNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimelineNavigator")
            .field("key", &self.key)
            .field("current_path", &self.current_path)
            .field("selected_step", &self.selected_step)
            .field("undo_stack", &self.undo_stack)
            .field("redo_stack", &self.redo_stack)
            .finish_non_exhaustive()
    }
}

impl TimelineNavigator {
    pub fn new(key: TimelineKey, current_path: Vec<Uuid>) -> Self {
        TimelineNavigator {
            key,
            current_path,
            selected_step: 0,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            on_node_select: None,
        }
    }

    /// Start with the last step of the path selected.
    pub fn at_latest(mut self) -> Self {
        self.selected_step = self.current_path.len().saturating_sub(1);
        self
    }

    pub fn on_node_select(mut self, callback: impl FnMut(Uuid) + Send + 'static) -> Self {
        self.on_node_select = Some(Box::new(callback));
        self
    }

    pub fn key(&self) -> TimelineKey {
        self.key
    }

    pub fn current_path(&self) -> &[Uuid] {
        &self.current_path
    }

    pub fn is_empty(&self) -> bool {
        self.current_path.is_empty()
    }

    pub fn selected_step(&self) -> usize {
        self.selected_step
    }

    pub fn selected_node(&self) -> Option<Uuid> {
        self.current_path.get(self.selected_step).copied()
    }

    pub fn undo_stack(&self) -> &[Uuid] {
        &self.undo_stack
    }

    pub fn redo_stack(&self) -> &[Uuid] {
        &self.redo_stack
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Move to `index`. Repeating the current step is still recorded.
    pub fn select_step(&mut self, index: usize) -> Option<Uuid> {
        let node_id = self.current_path.get(index).copied()?;

        if let Some(current) = self.selected_node() {
            self.undo_stack.push(current);
        }
        self.redo_stack.clear();
        self.selected_step = index;
        self.notify(node_id);

        Some(node_id)
    }

    /// Return to the previously visited node. An entry whose node is no longer
    /// on the path is discarded without moving.
    pub fn undo(&mut self) -> Option<Uuid> {
        let node_id = self.undo_stack.pop()?;
        let index = self.index_of(node_id)?;

        if let Some(current) = self.selected_node() {
            self.redo_stack.push(current);
        }
        self.selected_step = index;
        self.notify(node_id);

        Some(node_id)
    }

    pub fn redo(&mut self) -> Option<Uuid> {
        let node_id = self.redo_stack.pop()?;
        let index = self.index_of(node_id)?;

        if let Some(current) = self.selected_node() {
            self.undo_stack.push(current);
        }
        self.selected_step = index;
        self.notify(node_id);

        Some(node_id)
    }

    /// Adopt a freshly loaded path. Same key keeps the history; a new key
    /// (another session or path version) starts over.
    pub fn sync(&mut self, key: TimelineKey, current_path: Vec<Uuid>) {
        if key != self.key {
            self.reset(key, current_path);
            return;
        }
        self.selected_step = self
            .selected_step
            .min(current_path.len().saturating_sub(1));
        self.current_path = current_path;
    }

    /// Replace path and key, select the latest step and forget all history.
    pub fn reset(&mut self, key: TimelineKey, current_path: Vec<Uuid>) {
        self.key = key;
        self.clear_history();
        self.selected_step = current_path.len().saturating_sub(1);
        self.current_path = current_path;
    }

    /// Drop undo/redo history, keeping path and selection.
    pub fn clear_history(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    fn index_of(&self, node_id: Uuid) -> Option<usize> {
        self.current_path.iter().position(|id| *id == node_id)
    }

    fn notify(&mut self, node_id: Uuid) {
        if let Some(callback) = self.on_node_select.as_mut() {
            callback(node_id);
        }
    }
}
