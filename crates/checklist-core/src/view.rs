use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;

use crate::store::TaskStore;
use crate::task::Task;

/// Governs which tasks are rendered, never which are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    #[default]
    All,
    Completed,
    Uncompleted,
}

impl FromStr for FilterMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "completed" => Ok(Self::Completed),
            "uncompleted" => Ok(Self::Uncompleted),
            other => Err(anyhow!("unknown filter mode: {other}")),
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::All => "all",
            Self::Completed => "completed",
            Self::Uncompleted => "uncompleted",
        };
        f.write_str(name)
    }
}

/// Derives the rendered list from the store and the active filter.
pub fn visible(store: &TaskStore, mode: FilterMode) -> Vec<&Task> {
    store
        .tasks()
        .iter()
        .filter(|task| match mode {
            FilterMode::All => true,
            FilterMode::Completed => task.completed,
            FilterMode::Uncompleted => !task.completed,
        })
        .collect()
}
