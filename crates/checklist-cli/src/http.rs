use anyhow::Context;
use checklist_core::service::TaskService;
use checklist_core::task::{Task, TaskDraft};
use tracing::debug;

/// reqwest-backed implementation of the task service. Calls run to
/// completion or transport failure; there is no retry and no timeout.
#[derive(Debug, Clone)]
pub struct HttpTaskService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskService {
    pub fn new(base_url: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .build()
            .context("failed building HTTP client")?;
        Ok(Self { client, base_url })
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }
}

impl TaskService for HttpTaskService {
    #[tracing::instrument(skip(self))]
    async fn list(&self, limit: u32) -> anyhow::Result<Vec<Task>> {
        let url = self.todos_url();
        let response = self
            .client
            .get(&url)
            .query(&[("_limit", limit)])
            .send()
            .await
            .with_context(|| format!("failed requesting {url}"))?
            .error_for_status()
            .context("task list request failed")?;

        let tasks: Vec<Task> = response
            .json()
            .await
            .context("failed parsing task list response")?;
        debug!(count = tasks.len(), "listed remote tasks");
        Ok(tasks)
    }

    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create(&self, draft: &TaskDraft) -> anyhow::Result<Task> {
        let url = self.todos_url();
        let response = self
            .client
            .post(&url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("failed posting to {url}"))?
            .error_for_status()
            .context("task create request failed")?;

        response
            .json()
            .await
            .context("failed parsing created task response")
    }

    #[tracing::instrument(skip(self, draft), fields(title = %draft.title))]
    async fn update(&self, id: u64, draft: &TaskDraft) -> anyhow::Result<Task> {
        let url = format!("{}/{id}", self.todos_url());
        let response = self
            .client
            .put(&url)
            .json(draft)
            .send()
            .await
            .with_context(|| format!("failed putting to {url}"))?
            .error_for_status()
            .context("task update request failed")?;

        response
            .json()
            .await
            .context("failed parsing updated task response")
    }
}
