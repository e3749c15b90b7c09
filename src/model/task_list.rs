use crate::model::task::Task;

/// The ordered list of tasks. Order is display order.
///
/// Mutations go through `ops::list_ops` so that every structural change
/// reports a `ListChange` to the presentation layer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    pub(crate) tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        TaskList { tasks: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn get(&self, position: usize) -> Option<&Task> {
        self.tasks.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }

    /// Task texts in display order
    pub fn texts(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.text.as_str()).collect()
    }
}
