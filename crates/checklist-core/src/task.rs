use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single to-do record as the remote service represents it. Fields beyond
/// the three the client consumes (e.g. `userId`) are carried in `extra` so
/// they round-trip untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,

    pub title: String,

    #[serde(default)]
    pub completed: bool,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Task {
    pub fn new(id: u64, title: impl Into<String>, completed: bool) -> Self {
        Self {
            id,
            title: title.into(),
            completed,
            extra: BTreeMap::new(),
        }
    }
}

/// Request body for create and update. Both send `completed: false`; the
/// update response handler never applies that flag back to the store.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDraft {
    pub title: String,
    pub completed: bool,
}

impl TaskDraft {
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
        }
    }
}
