use crate::task::{Task, TaskDraft};

/// The remote list/record contract: list, create, update. The service never
/// touches UI state; callers apply results through store mutators. There is
/// no delete operation — deletion is a purely local effect.
#[allow(async_fn_in_trait)]
pub trait TaskService {
    async fn list(&self, limit: u32) -> anyhow::Result<Vec<Task>>;

    async fn create(&self, draft: &TaskDraft) -> anyhow::Result<Task>;

    async fn update(&self, id: u64, draft: &TaskDraft) -> anyhow::Result<Task>;
}
