use tracing::debug;

use crate::task::Task;

/// The in-memory ordered collection of all tasks currently known to the UI.
/// Mutators are total: an id with no matching task is silently a no-op.
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Replaces the store wholesale; used once after the initial fetch.
    pub fn load(&mut self, tasks: Vec<Task>) {
        debug!(count = tasks.len(), "loading task store");
        self.tasks = tasks;
    }

    /// Adds one task to the end; used after a remote create confirms.
    pub fn append(&mut self, task: Task) {
        debug!(id = task.id, "appending task");
        self.tasks.push(task);
    }

    /// Updates only the title of the matching task; `completed` and all
    /// other fields are left unchanged.
    pub fn replace_title(&mut self, id: u64, title: &str) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            debug!(id, title, "replacing task title");
            task.title = title.to_string();
        }
    }

    pub fn toggle_completed(&mut self, id: u64) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.completed = !task.completed;
            debug!(id, completed = task.completed, "toggled task");
        }
    }

    pub fn remove(&mut self, id: u64) {
        self.tasks.retain(|task| task.id != id);
    }

    pub fn complete_all(&mut self) {
        for task in &mut self.tasks {
            task.completed = true;
        }
    }

    pub fn clear_completed(&mut self) {
        self.tasks.retain(|task| !task.completed);
    }

    /// Count of completed tasks over the full store, independent of any
    /// active filter.
    pub fn completed_count(&self) -> usize {
        self.tasks.iter().filter(|task| task.completed).count()
    }

    pub fn total_count(&self) -> usize {
        self.tasks.len()
    }
}
