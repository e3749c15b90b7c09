pub mod notify;

use std::collections::BTreeSet;

use crate::io::store::{StoreError, TaskStore};
use crate::model::task::Task;
use crate::model::task_list::TaskList;
use crate::ops::list_ops::{self, ListChange, ListError};

pub use notify::{Bell, Notifier, Silent};

/// Error type for session operations
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    List(#[from] ListError),
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The list changed but writing it to the store failed
    #[error("change kept in memory but not saved: {source}")]
    Unsaved {
        change: ListChange,
        source: StoreError,
    },
}

impl SessionError {
    /// True for input the user can simply retype (an empty add)
    pub fn is_rejection(&self) -> bool {
        matches!(self, SessionError::List(ListError::EmptyText))
    }

    /// The change that was applied before the error, if any
    pub fn applied_change(&self) -> Option<ListChange> {
        match self {
            SessionError::Unsaved { change, .. } => Some(*change),
            _ => None,
        }
    }
}

/// A user intent, carrying the position it targets at the time it was issued
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add { text: String },
    Edit { position: usize, text: String },
    Delete { position: usize },
    ToggleFavorite { position: usize },
}

impl Command {
    fn name(&self) -> &'static str {
        match self {
            Command::Add { .. } => "add",
            Command::Edit { .. } => "edit",
            Command::Delete { .. } => "delete",
            Command::ToggleFavorite { .. } => "toggle_favorite",
        }
    }
}

/// One user's working session: the single owned task list plus the store
/// it came from and the notifier for additions.
pub struct Session<S: TaskStore, N: Notifier> {
    list: TaskList,
    store: S,
    notifier: N,
    autosave: bool,
}

impl<S: TaskStore, N: Notifier> Session<S, N> {
    /// Load the stored texts into a fresh list, in the store's set order.
    pub fn open(store: S, notifier: N, autosave: bool) -> Result<Self, SessionError> {
        let mut list = TaskList::new();
        for text in store.load()? {
            match list_ops::append(&mut list, text) {
                Ok(_) | Err(ListError::EmptyText) => {}
                Err(e) => return Err(e.into()),
            }
        }
        tracing::debug!(tasks = list.len(), autosave, "session opened");
        Ok(Session {
            list,
            store,
            notifier,
            autosave,
        })
    }

    pub fn tasks(&self) -> &TaskList {
        &self.list
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Route a command to its list operation.
    ///
    /// The notifier fires only after a successful add. With autosave on, every
    /// successful mutation is written to the store before returning; if that
    /// write fails the list keeps the change and `SessionError::Unsaved`
    /// carries it.
    pub fn dispatch(&mut self, command: Command) -> Result<ListChange, SessionError> {
        tracing::debug!(command = command.name(), "dispatch");
        let change = match command {
            Command::Add { text } => {
                let change = list_ops::append(&mut self.list, text)?;
                if let ListChange::Inserted(i) = change
                    && let Some(task) = self.list.get(i)
                {
                    self.notifier.task_added(task);
                }
                change
            }
            Command::Edit { position, text } => list_ops::edit_text(&mut self.list, position, text)?,
            Command::Delete { position } => list_ops::remove_at(&mut self.list, position)?.1,
            Command::ToggleFavorite { position } => {
                list_ops::toggle_favorite(&mut self.list, position)?.0
            }
        };
        if self.autosave {
            let texts = self.texts();
            if let Err(source) = self.store.save(&texts) {
                tracing::warn!(error = %source, "autosave failed");
                return Err(SessionError::Unsaved { change, source });
            }
        }
        Ok(change)
    }

    /// Write the current texts to the store
    pub fn save(&mut self) -> Result<(), SessionError> {
        let texts = self.texts();
        self.store.save(&texts)?;
        Ok(())
    }

    fn texts(&self) -> BTreeSet<String> {
        self.list.iter().map(|t: &Task| t.text.clone()).collect()
    }

    /// Save and hand back the store
    pub fn close(mut self) -> Result<S, SessionError> {
        self.save()?;
        Ok(self.store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::store::MemoryStore;
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct Recorder {
        added: Vec<String>,
    }

    impl Notifier for Recorder {
        fn task_added(&mut self, task: &Task) {
            self.added.push(task.text.clone());
        }
    }

    fn session(texts: &[&str], autosave: bool) -> Session<MemoryStore, Recorder> {
        Session::open(
            MemoryStore::with_texts(texts.iter().copied()),
            Recorder::default(),
            autosave,
        )
        .unwrap()
    }

    /// Loads nothing and refuses every write
    struct ReadOnlyStore;

    impl TaskStore for ReadOnlyStore {
        fn load(&self) -> Result<BTreeSet<String>, StoreError> {
            Ok(BTreeSet::new())
        }

        fn save(&mut self, _texts: &BTreeSet<String>) -> Result<(), StoreError> {
            Err(StoreError::WriteError {
                path: "tasks.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
            })
        }
    }

    fn add(text: &str) -> Command {
        Command::Add { text: text.into() }
    }

    #[test]
    fn open_loads_stored_texts_sorted_and_unfavorited() {
        let s = session(&["b", "a", "c"], false);
        assert_eq!(s.tasks().texts(), vec!["a", "b", "c"]);
        assert!(s.tasks().iter().all(|t| !t.is_favorite));
    }

    #[test]
    fn open_skips_empty_stored_text() {
        let s = session(&["", "a"], false);
        assert_eq!(s.tasks().texts(), vec!["a"]);
    }

    #[test]
    fn add_notifies_once() {
        let mut s = session(&[], false);
        let change = s.dispatch(add("Buy milk")).unwrap();
        assert_eq!(change, ListChange::Inserted(0));
        assert_eq!(s.notifier.added, vec!["Buy milk"]);
    }

    #[test]
    fn rejected_add_does_not_notify_or_save() {
        let mut s = session(&["A"], true);
        let err = s.dispatch(add("")).unwrap_err();
        assert!(err.is_rejection());
        assert!(s.notifier.added.is_empty());
        assert_eq!(s.store().saves(), 0);
        assert_eq!(s.tasks().texts(), vec!["A"]);
    }

    #[test]
    fn out_of_range_is_not_a_rejection() {
        let mut s = session(&["A"], false);
        let err = s.dispatch(Command::Delete { position: 3 }).unwrap_err();
        assert!(!err.is_rejection());
        assert!(matches!(
            err,
            SessionError::List(ListError::IndexOutOfRange { position: 3, len: 1 })
        ));
    }

    #[test]
    fn commands_route_to_list_operations() {
        let mut s = session(&[], false);
        for t in ["A", "B", "C"] {
            s.dispatch(add(t)).unwrap();
        }

        let change = s.dispatch(Command::ToggleFavorite { position: 1 }).unwrap();
        assert_eq!(change, ListChange::Moved { from: 1, to: 0 });
        assert_eq!(s.tasks().texts(), vec!["B", "A", "C"]);

        let change = s
            .dispatch(Command::Edit {
                position: 2,
                text: "C2".into(),
            })
            .unwrap();
        assert_eq!(change, ListChange::Changed(2));

        let change = s.dispatch(Command::Delete { position: 1 }).unwrap();
        assert_eq!(change, ListChange::Removed(1));
        assert_eq!(s.tasks().texts(), vec!["B", "C2"]);

        s.dispatch(Command::ToggleFavorite { position: 0 }).unwrap();
        assert_eq!(s.tasks().texts(), vec!["C2", "B"]);
    }

    #[test]
    fn autosave_persists_every_mutation() {
        let mut s = session(&[], true);
        s.dispatch(add("A")).unwrap();
        s.dispatch(add("B")).unwrap();
        s.dispatch(Command::Delete { position: 0 }).unwrap();
        assert_eq!(s.store().saves(), 3);
        let texts: Vec<&str> = s.store().texts().iter().map(|t| t.as_str()).collect();
        assert_eq!(texts, vec!["B"]);
    }

    #[test]
    fn favorites_and_order_are_lost_on_reopen() {
        let mut s = session(&[], false);
        s.dispatch(add("zeta")).unwrap();
        s.dispatch(add("alpha")).unwrap();
        s.dispatch(add("alpha")).unwrap();
        s.dispatch(Command::ToggleFavorite { position: 0 }).unwrap();
        let store = s.close().unwrap();

        let reopened = Session::open(store, Recorder::default(), false).unwrap();
        assert_eq!(reopened.tasks().texts(), vec!["alpha", "zeta"]);
        assert!(reopened.tasks().iter().all(|t| !t.is_favorite));
    }

    #[test]
    fn failed_autosave_still_reports_the_change() {
        let mut s = Session::open(ReadOnlyStore, Recorder::default(), true).unwrap();
        let err = s.dispatch(add("A")).unwrap_err();
        assert!(!err.is_rejection());
        assert_eq!(err.applied_change(), Some(ListChange::Inserted(0)));
        assert!(matches!(
            err,
            SessionError::Unsaved {
                change: ListChange::Inserted(0),
                source: StoreError::WriteError { .. },
            }
        ));
        assert_eq!(s.tasks().texts(), vec!["A"]);
        assert_eq!(s.notifier.added, vec!["A"]);

        let err = s.dispatch(Command::ToggleFavorite { position: 0 }).unwrap_err();
        assert_eq!(err.applied_change(), Some(ListChange::Moved { from: 0, to: 0 }));
        assert!(s.tasks().get(0).is_some_and(|t| t.is_favorite));
    }

    #[test]
    fn failed_list_operation_has_no_applied_change() {
        let mut s = session(&["A"], true);
        let err = s.dispatch(Command::Delete { position: 4 }).unwrap_err();
        assert_eq!(err.applied_change(), None);
        assert_eq!(s.store().saves(), 0);
    }
}
