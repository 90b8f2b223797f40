use tracing::{debug, error, info, warn};

use crate::service::TaskService;
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};
use crate::view::{self, FilterMode};

/// Outcome toast for a user action. Remote failures become `Error` notices;
/// invalid local input produces no notice at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    fn success(text: &str) -> Self {
        Self::Success(text.to_string())
    }

    fn error(text: &str) -> Self {
        Self::Error(text.to_string())
    }
}

/// Owns all widget state explicitly: the store, the input buffer, the
/// editing reference, the filter mode, and the loading flag. Network calls
/// go through the service; results come back as pure store mutations.
#[derive(Debug)]
pub struct Controller<S> {
    service: S,
    store: TaskStore,
    input: String,
    editing: Option<u64>,
    filter: FilterMode,
    loading: bool,
    limit: u32,
}

impl<S: TaskService> Controller<S> {
    pub fn new(service: S, limit: u32, filter: FilterMode) -> Self {
        Self {
            service,
            store: TaskStore::new(),
            input: String::new(),
            editing: None,
            filter,
            loading: true,
            limit,
        }
    }

    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn editing(&self) -> Option<u64> {
        self.editing
    }

    pub fn filter(&self) -> FilterMode {
        self.filter
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn visible(&self) -> Vec<&Task> {
        view::visible(&self.store, self.filter)
    }

    pub fn completed_count(&self) -> usize {
        self.store.completed_count()
    }

    pub fn total_count(&self) -> usize {
        self.store.total_count()
    }

    /// Label of the dual-purpose primary action.
    pub fn primary_label(&self) -> &'static str {
        if self.editing.is_some() { "Update" } else { "Add" }
    }

    /// Fetches the initial list. Failures are logged and swallowed; the
    /// loading flag clears regardless, leaving an empty store visible.
    #[tracing::instrument(skip(self))]
    pub async fn refresh(&mut self) {
        match self.service.list(self.limit).await {
            Ok(tasks) => {
                info!(count = tasks.len(), "fetched initial task list");
                self.store.load(tasks);
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "error fetching tasks");
            }
        }
        self.loading = false;
    }

    pub fn set_input(&mut self, text: &str) {
        self.input = text.to_string();
    }

    /// Switches the primary action to update mode and pre-loads the task's
    /// title into the input buffer. An unknown id is a no-op.
    pub fn begin_edit(&mut self, id: u64) {
        let Some(task) = self.store.get(id) else {
            debug!(id, "edit requested for unknown task");
            return;
        };
        self.input = task.title.clone();
        self.editing = Some(id);
    }

    /// Switches back to add mode, clearing the editing reference and the
    /// input buffer.
    pub fn begin_add(&mut self) {
        self.editing = None;
        self.input.clear();
    }

    /// The primary action: create when no task is being edited, update
    /// otherwise.
    pub async fn submit(&mut self) -> Option<Notice> {
        match self.editing {
            None => self.create_task().await,
            Some(id) => self.update_task(id).await,
        }
    }

    #[tracing::instrument(skip(self))]
    async fn create_task(&mut self) -> Option<Notice> {
        if self.input.trim().is_empty() {
            return None;
        }

        let draft = TaskDraft::titled(self.input.clone());
        match self.service.create(&draft).await {
            Ok(task) => {
                info!(id = task.id, "task added");
                self.store.append(task);
                self.input.clear();
                Some(Notice::success("Task added successfully"))
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "error adding task");
                Some(Notice::error("Error adding task"))
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn update_task(&mut self, id: u64) -> Option<Notice> {
        if self.input.trim().is_empty() {
            return None;
        }

        let draft = TaskDraft::titled(self.input.clone());
        match self.service.update(id, &draft).await {
            Ok(updated) => {
                // Only the echoed title is applied; the completed flag the
                // draft carried is ignored on the way back.
                info!(id, "task updated");
                self.store.replace_title(id, &updated.title);
                self.input.clear();
                self.editing = None;
                Some(Notice::success("Task updated successfully"))
            }
            Err(err) => {
                error!(error = %format!("{err:#}"), "error updating task");
                Some(Notice::error("Error updating task"))
            }
        }
    }

    pub fn toggle(&mut self, id: u64) {
        self.store.toggle_completed(id);
    }

    /// Local-only: the remote record is never deleted.
    pub fn delete(&mut self, id: u64) -> Notice {
        self.store.remove(id);
        Notice::success("Task deleted successfully")
    }

    pub fn complete_all(&mut self) {
        self.store.complete_all();
    }

    pub fn clear_completed(&mut self) {
        self.store.clear_completed();
    }

    pub fn set_filter(&mut self, mode: FilterMode) {
        self.filter = mode;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::{Controller, Notice};
    use crate::service::TaskService;
    use crate::task::{Task, TaskDraft};
    use crate::view::FilterMode;

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        List(u32),
        Create(String),
        Update(u64, String),
    }

    /// Scripted stand-in for the remote service: records every call and
    /// echoes drafts back with server-assigned ids.
    struct Scripted {
        calls: RefCell<Vec<Call>>,
        initial: Vec<Task>,
        next_id: RefCell<u64>,
        fail: bool,
    }

    impl Scripted {
        fn with_initial(initial: Vec<Task>) -> Self {
            Self {
                calls: RefCell::new(vec![]),
                initial,
                next_id: RefCell::new(100),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                calls: RefCell::new(vec![]),
                initial: vec![],
                next_id: RefCell::new(100),
                fail: true,
            }
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.borrow().clone()
        }
    }

    impl TaskService for &Scripted {
        async fn list(&self, limit: u32) -> anyhow::Result<Vec<Task>> {
            self.calls.borrow_mut().push(Call::List(limit));
            if self.fail {
                anyhow::bail!("transport down");
            }
            Ok(self.initial.clone())
        }

        async fn create(&self, draft: &TaskDraft) -> anyhow::Result<Task> {
            self.calls
                .borrow_mut()
                .push(Call::Create(draft.title.clone()));
            if self.fail {
                anyhow::bail!("transport down");
            }
            let mut next_id = self.next_id.borrow_mut();
            *next_id += 1;
            Ok(Task::new(*next_id, draft.title.clone(), false))
        }

        async fn update(&self, id: u64, draft: &TaskDraft) -> anyhow::Result<Task> {
            self.calls
                .borrow_mut()
                .push(Call::Update(id, draft.title.clone()));
            if self.fail {
                anyhow::bail!("transport down");
            }
            Ok(Task::new(id, draft.title.clone(), false))
        }
    }

    fn two_tasks() -> Vec<Task> {
        vec![Task::new(1, "a", false), Task::new(2, "b", true)]
    }

    #[tokio::test]
    async fn refresh_loads_tasks_and_clears_loading() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);

        assert!(widget.is_loading());
        widget.refresh().await;

        assert!(!widget.is_loading());
        assert_eq!(widget.total_count(), 2);
        assert_eq!(service.calls(), vec![Call::List(4)]);
    }

    #[tokio::test]
    async fn refresh_failure_still_clears_loading() {
        let service = Scripted::failing();
        let mut widget = Controller::new(&service, 4, FilterMode::All);

        widget.refresh().await;

        assert!(!widget.is_loading());
        assert_eq!(widget.total_count(), 0);
    }

    #[tokio::test]
    async fn create_appends_echoed_task_and_clears_buffer() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;

        widget.set_input("write tests");
        let notice = widget.submit().await;

        assert_eq!(
            notice,
            Some(Notice::Success("Task added successfully".to_string()))
        );
        assert_eq!(widget.total_count(), 3);
        let added = widget.store().tasks().last().expect("appended task");
        assert_eq!(added.title, "write tests");
        assert_eq!(added.id, 101);
        assert!(widget.input().is_empty());
    }

    #[tokio::test]
    async fn blank_input_never_reaches_the_service() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;
        let calls_after_mount = service.calls().len();

        widget.set_input("");
        assert_eq!(widget.submit().await, None);

        widget.set_input("   ");
        assert_eq!(widget.submit().await, None);

        widget.begin_edit(2);
        widget.set_input("   ");
        assert_eq!(widget.submit().await, None);

        assert_eq!(service.calls().len(), calls_after_mount);
        assert_eq!(widget.total_count(), 2);
    }

    #[tokio::test]
    async fn edit_then_submit_updates_not_creates() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;

        widget.begin_edit(2);
        assert_eq!(widget.input(), "b");
        assert_eq!(widget.primary_label(), "Update");

        widget.set_input("b revised");
        let notice = widget.submit().await;

        assert_eq!(
            notice,
            Some(Notice::Success("Task updated successfully".to_string()))
        );
        assert_eq!(
            service.calls().last(),
            Some(&Call::Update(2, "b revised".to_string()))
        );
        assert_eq!(widget.store().get(2).expect("task 2").title, "b revised");
        assert_eq!(widget.editing(), None);
        assert_eq!(widget.primary_label(), "Add");
    }

    #[tokio::test]
    async fn update_preserves_prior_completed_flag() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;

        // Task 2 is completed; the update draft carries completed:false but
        // the response handler must not apply it.
        widget.begin_edit(2);
        widget.set_input("still done");
        widget.submit().await;

        let task = widget.store().get(2).expect("task 2");
        assert_eq!(task.title, "still done");
        assert!(task.completed);
    }

    #[tokio::test]
    async fn create_failure_leaves_store_unmodified() {
        let service = Scripted::failing();
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;

        widget.set_input("doomed");
        let notice = widget.submit().await;

        assert_eq!(
            notice,
            Some(Notice::Error("Error adding task".to_string()))
        );
        assert_eq!(widget.total_count(), 0);
        // The buffer survives so the user can retry.
        assert_eq!(widget.input(), "doomed");
    }

    #[tokio::test]
    async fn update_failure_retains_buffer_and_editing_ref() {
        let failing = Scripted::failing();
        let mut widget = Controller::new(&failing, 4, FilterMode::All);
        widget.refresh().await;
        widget.store_mut_for_tests().load(two_tasks());

        widget.begin_edit(1);
        widget.set_input("retry me");
        let notice = widget.submit().await;

        assert_eq!(
            notice,
            Some(Notice::Error("Error updating task".to_string()))
        );
        assert_eq!(widget.editing(), Some(1));
        assert_eq!(widget.input(), "retry me");
        assert_eq!(widget.store().get(1).expect("task 1").title, "a");
    }

    #[tokio::test]
    async fn begin_edit_of_unknown_id_is_a_no_op() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;

        widget.set_input("draft in progress");
        widget.begin_edit(99);

        assert_eq!(widget.editing(), None);
        assert_eq!(widget.input(), "draft in progress");
    }

    #[tokio::test]
    async fn begin_add_clears_editing_state() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;

        widget.begin_edit(1);
        widget.begin_add();

        assert_eq!(widget.editing(), None);
        assert!(widget.input().is_empty());
    }

    #[tokio::test]
    async fn delete_is_local_and_always_toasts() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;
        let calls_after_mount = service.calls().len();

        let notice = widget.delete(1);
        assert_eq!(
            notice,
            Notice::Success("Task deleted successfully".to_string())
        );
        assert_eq!(widget.total_count(), 1);

        // Deleting an id that is already gone still reports success.
        let notice = widget.delete(1);
        assert_eq!(
            notice,
            Notice::Success("Task deleted successfully".to_string())
        );

        assert_eq!(service.calls().len(), calls_after_mount);
    }

    #[tokio::test]
    async fn filtered_view_respects_mode_and_counters_do_not() {
        let service = Scripted::with_initial(two_tasks());
        let mut widget = Controller::new(&service, 4, FilterMode::All);
        widget.refresh().await;

        widget.set_filter(FilterMode::Completed);
        let rows = widget.visible();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 2);
        assert_eq!(widget.completed_count(), 1);
        assert_eq!(widget.total_count(), 2);

        widget.complete_all();
        widget.set_filter(FilterMode::Uncompleted);
        assert!(widget.visible().is_empty());
    }

    impl<S> Controller<S> {
        fn store_mut_for_tests(&mut self) -> &mut crate::store::TaskStore {
            &mut self.store
        }
    }
}
