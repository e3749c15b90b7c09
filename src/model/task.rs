use serde::{Deserialize, Serialize};

/// Favorite state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavoriteState {
    Unfavorited,
    Favorited,
}

impl FavoriteState {
    /// The marker shown in front of a task in list output
    pub fn marker(self) -> char {
        match self {
            FavoriteState::Unfavorited => ' ',
            FavoriteState::Favorited => '*',
        }
    }
}

/// A single to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// User-visible label
    pub text: String,
    /// Whether the task has been promoted to the front of the list
    pub is_favorite: bool,
    /// Index the task occupied right before it was favorited.
    /// A snapshot; other insertions and removals do not update it.
    pub original_position: usize,
}

impl Task {
    /// Create an unfavorited task that sits at `position`
    pub fn new(text: String, position: usize) -> Self {
        Task {
            text,
            is_favorite: false,
            original_position: position,
        }
    }

    pub fn state(&self) -> FavoriteState {
        if self.is_favorite {
            FavoriteState::Favorited
        } else {
            FavoriteState::Unfavorited
        }
    }
}
