use crate::model::task::{FavoriteState, Task};
use crate::model::task_list::TaskList;

/// Error type for task list operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ListError {
    /// Zero-length text on append. The caller rejects the input and moves on.
    #[error("task text is empty")]
    EmptyText,
    #[error("position {position} out of range (list has {len} tasks)")]
    IndexOutOfRange { position: usize, len: usize },
}

/// What a mutation did to the list, for the presentation layer to redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Inserted(usize),
    Removed(usize),
    Changed(usize),
    Moved { from: usize, to: usize },
}

impl ListChange {
    /// The position the affected task now occupies, if it is still in the list
    pub fn current_position(self) -> Option<usize> {
        match self {
            ListChange::Inserted(i) | ListChange::Changed(i) => Some(i),
            ListChange::Moved { to, .. } => Some(to),
            ListChange::Removed(_) => None,
        }
    }
}

fn check_bounds(list: &TaskList, position: usize) -> Result<(), ListError> {
    if position >= list.tasks.len() {
        return Err(ListError::IndexOutOfRange {
            position,
            len: list.tasks.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Append a new unfavorited task at the end of the list.
///
/// Only zero-length text is rejected; whitespace-only text is kept as typed.
pub fn append(list: &mut TaskList, text: String) -> Result<ListChange, ListError> {
    if text.is_empty() {
        return Err(ListError::EmptyText);
    }
    let position = list.tasks.len();
    list.tasks.push(Task::new(text, position));
    Ok(ListChange::Inserted(position))
}

/// Remove the task at `position`. Later tasks shift down by one; their
/// stored `original_position` values are left as they were.
pub fn remove_at(list: &mut TaskList, position: usize) -> Result<(Task, ListChange), ListError> {
    check_bounds(list, position)?;
    let task = list.tasks.remove(position);
    Ok((task, ListChange::Removed(position)))
}

/// Replace the text of the task at `position`. No emptiness check here.
pub fn edit_text(list: &mut TaskList, position: usize, text: String) -> Result<ListChange, ListError> {
    check_bounds(list, position)?;
    list.tasks[position].text = text;
    Ok(ListChange::Changed(position))
}

// ---------------------------------------------------------------------------
// Favorites
// ---------------------------------------------------------------------------

/// Toggle the favorite flag of the task at `position`.
///
/// Favoriting records the current index and moves the task to the front, so
/// the most recently favorited task is always first. Unfavoriting moves the
/// task back to the recorded index. A recorded index past the end of the
/// list (because tasks were removed meanwhile) puts the task last.
pub fn toggle_favorite(
    list: &mut TaskList,
    position: usize,
) -> Result<(ListChange, FavoriteState), ListError> {
    check_bounds(list, position)?;
    let mut task = list.tasks.remove(position);

    let to = if task.is_favorite {
        task.is_favorite = false;
        let target = task.original_position;
        if target > list.tasks.len() {
            tracing::warn!(
                target_position = target,
                remaining = list.tasks.len(),
                "stale favorite position, restoring task at end of list"
            );
            list.tasks.len()
        } else {
            target
        }
    } else {
        task.is_favorite = true;
        task.original_position = position;
        0
    };

    let state = task.state();
    list.tasks.insert(to, task);
    Ok((ListChange::Moved { from: position, to }, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn list_of(texts: &[&str]) -> TaskList {
        let mut list = TaskList::new();
        for t in texts {
            append(&mut list, t.to_string()).unwrap();
        }
        list
    }

    #[test]
    fn append_adds_unfavorited_task_at_end() {
        let mut list = list_of(&["A"]);
        let change = append(&mut list, "B".into()).unwrap();
        assert_eq!(change, ListChange::Inserted(1));
        assert_eq!(list.len(), 2);
        let task = list.get(1).unwrap();
        assert_eq!(task.text, "B");
        assert!(!task.is_favorite);
    }

    #[test]
    fn append_empty_is_rejected_without_mutation() {
        let mut list = list_of(&["A"]);
        let before = list.clone();
        assert_eq!(append(&mut list, String::new()), Err(ListError::EmptyText));
        assert_eq!(list, before);
    }

    #[test]
    fn append_keeps_whitespace_only_text() {
        let mut list = TaskList::new();
        append(&mut list, "   ".into()).unwrap();
        assert_eq!(list.texts(), vec!["   "]);
    }

    #[test]
    fn remove_shifts_later_tasks_down() {
        let mut list = list_of(&["A", "B", "C", "D"]);
        let (removed, change) = remove_at(&mut list, 1).unwrap();
        assert_eq!(removed.text, "B");
        assert_eq!(change, ListChange::Removed(1));
        assert_eq!(list.texts(), vec!["A", "C", "D"]);
    }

    #[test]
    fn remove_leaves_other_snapshots_untouched() {
        let mut list = list_of(&["A", "B", "C"]);
        toggle_favorite(&mut list, 2).unwrap(); // [C, A, B]
        remove_at(&mut list, 1).unwrap(); // [C, B]
        assert_eq!(list.get(0).unwrap().original_position, 2);
    }

    #[test]
    fn remove_out_of_range() {
        let mut list = list_of(&["A"]);
        assert_eq!(
            remove_at(&mut list, 1).unwrap_err(),
            ListError::IndexOutOfRange { position: 1, len: 1 }
        );
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn edit_changes_only_text() {
        let mut list = list_of(&["A", "B", "C"]);
        toggle_favorite(&mut list, 1).unwrap(); // [B, A, C]
        let before = list.get(0).unwrap().clone();
        let change = edit_text(&mut list, 0, "new".into()).unwrap();
        assert_eq!(change, ListChange::Changed(0));
        let after = list.get(0).unwrap();
        assert_eq!(after.text, "new");
        assert_eq!(after.is_favorite, before.is_favorite);
        assert_eq!(after.original_position, before.original_position);
    }

    #[test]
    fn edit_accepts_empty_text() {
        let mut list = list_of(&["A"]);
        edit_text(&mut list, 0, String::new()).unwrap();
        assert_eq!(list.texts(), vec![""]);
    }

    #[test]
    fn edit_out_of_range() {
        let mut list = TaskList::new();
        assert!(matches!(
            edit_text(&mut list, 0, "x".into()),
            Err(ListError::IndexOutOfRange { position: 0, len: 0 })
        ));
    }

    #[test]
    fn favorite_moves_to_front_and_back() {
        let mut list = list_of(&["A", "B", "C"]);

        let (change, state) = toggle_favorite(&mut list, 1).unwrap();
        assert_eq!(change, ListChange::Moved { from: 1, to: 0 });
        assert_eq!(state, FavoriteState::Favorited);
        assert_eq!(list.texts(), vec!["B", "A", "C"]);
        let b = list.get(0).unwrap();
        assert!(b.is_favorite);
        assert_eq!(b.original_position, 1);

        let (change, state) = toggle_favorite(&mut list, 0).unwrap();
        assert_eq!(change, ListChange::Moved { from: 0, to: 1 });
        assert_eq!(state, FavoriteState::Unfavorited);
        assert_eq!(list.texts(), vec!["A", "B", "C"]);
        assert!(!list.get(1).unwrap().is_favorite);
    }

    #[test]
    fn newest_favorite_goes_first() {
        let mut list = list_of(&["A", "B", "C"]);
        toggle_favorite(&mut list, 2).unwrap();
        assert_eq!(list.texts(), vec!["C", "A", "B"]);
        toggle_favorite(&mut list, 1).unwrap();
        assert_eq!(list.texts(), vec!["A", "C", "B"]);
        assert!(list.iter().take(2).all(|t| t.is_favorite));
    }

    #[test]
    fn unfavorite_uses_snapshot_not_live_index() {
        let mut list = list_of(&["A", "B", "C", "D"]);
        toggle_favorite(&mut list, 2).unwrap(); // [C, A, B, D], C remembers 2
        remove_at(&mut list, 1).unwrap(); // [C, B, D]
        toggle_favorite(&mut list, 0).unwrap();
        assert_eq!(list.texts(), vec!["B", "D", "C"]);
    }

    #[test]
    fn stale_snapshot_past_end_restores_last() {
        let mut list = list_of(&["A", "B", "C", "D"]);
        toggle_favorite(&mut list, 3).unwrap(); // [D, A, B, C]
        remove_at(&mut list, 1).unwrap();
        remove_at(&mut list, 1).unwrap(); // [D, C]
        let (change, _) = toggle_favorite(&mut list, 0).unwrap();
        assert_eq!(change, ListChange::Moved { from: 0, to: 1 });
        assert_eq!(list.texts(), vec!["C", "D"]);
    }

    #[test]
    fn toggle_out_of_range() {
        let mut list = list_of(&["A"]);
        assert!(toggle_favorite(&mut list, 5).is_err());
        assert_eq!(list.texts(), vec!["A"]);
    }

    #[test]
    fn change_positions() {
        assert_eq!(ListChange::Inserted(2).current_position(), Some(2));
        assert_eq!(ListChange::Moved { from: 3, to: 0 }.current_position(), Some(0));
        assert_eq!(ListChange::Removed(1).current_position(), None);
    }
}
