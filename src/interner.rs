use rustc_hash::FxHashMap;

use crate::error::{GraphError, Result};

/// Dense id of a commenter, assigned in first-seen order.
pub type CommenterId = u32;

/// Maps commenter names to dense integer ids.
///
/// Ids are never reused: the `n`-th distinct name resolved gets id `n - 1`.
#[derive(Debug, Default, Clone)]
pub struct CommenterInterner {
    ids: FxHashMap<String, CommenterId>,
}

impl CommenterInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails once every `CommenterId` has been handed out.
    pub fn resolve(&mut self, name: &str) -> Result<CommenterId> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }

        let id = next_id(self.ids.len())?;
        self.ids.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<CommenterId> {
        self.ids.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

fn next_id(assigned: usize) -> Result<CommenterId> {
    CommenterId::try_from(assigned).map_err(|_| GraphError::TooManyCommenters(assigned))
}
