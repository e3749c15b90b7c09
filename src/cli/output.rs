use serde::Serialize;

use crate::model::task::{FavoriteState, Task};
use crate::model::task_list::TaskList;
use crate::ops::list_ops::ListChange;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    /// 1-based, as accepted by `edit`, `rm` and `star`
    pub index: usize,
    pub text: String,
    pub state: FavoriteState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_index: Option<usize>,
}

#[derive(Serialize)]
#[serde(tag = "change", rename_all = "lowercase")]
pub enum ChangeJson {
    Inserted { index: usize },
    Removed { index: usize },
    Changed { index: usize },
    Moved { from: usize, to: usize },
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(position: usize, task: &Task) -> TaskJson {
    TaskJson {
        index: position + 1,
        text: task.text.clone(),
        state: task.state(),
        original_index: task.is_favorite.then_some(task.original_position + 1),
    }
}

pub fn list_to_json(list: &TaskList) -> Vec<TaskJson> {
    list.iter()
        .enumerate()
        .map(|(i, t)| task_to_json(i, t))
        .collect()
}

pub fn change_to_json(change: ListChange) -> ChangeJson {
    match change {
        ListChange::Inserted(i) => ChangeJson::Inserted { index: i + 1 },
        ListChange::Removed(i) => ChangeJson::Removed { index: i + 1 },
        ListChange::Changed(i) => ChangeJson::Changed { index: i + 1 },
        ListChange::Moved { from, to } => ChangeJson::Moved {
            from: from + 1,
            to: to + 1,
        },
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `  3 * Call mom`
pub fn format_task_line(position: usize, task: &Task) -> String {
    format!("{:>3} {} {}", position + 1, task.state().marker(), task.text)
}

pub fn format_list(list: &TaskList) -> Vec<String> {
    if list.is_empty() {
        return vec!["(no tasks)".to_string()];
    }
    list.iter()
        .enumerate()
        .map(|(i, t)| format_task_line(i, t))
        .collect()
}

/// One-line summary of a change, naming the task where it is still present
pub fn format_change(change: ListChange, list: &TaskList) -> String {
    let text = change
        .current_position()
        .and_then(|p| list.get(p))
        .map(|t| t.text.as_str())
        .unwrap_or("");
    match change {
        ListChange::Inserted(i) => format!("added {}: {}", i + 1, text),
        ListChange::Removed(i) => format!("removed {}", i + 1),
        ListChange::Changed(i) => format!("edited {}: {}", i + 1, text),
        ListChange::Moved { to, .. } => {
            let verb = match list.get(to).map(|t| t.state()) {
                Some(FavoriteState::Favorited) => "starred",
                _ => "unstarred",
            };
            format!("{} {}: {}", verb, to + 1, text)
        }
    }
}
