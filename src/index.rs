use std::collections::BTreeMap;

use rustc_hash::FxHashSet;

use crate::error::{GraphError, Result};
use crate::interner::{CommenterId, CommenterInterner};

pub type CommenterSet = FxHashSet<CommenterId>;

/// Rejects identifiers that cannot be written inside a quoted DOT id.
pub fn validate_game_id(game: &str) -> Result<()> {
    if game.contains('"') {
        return Err(GraphError::UnsafeIdentifier {
            game: game.to_owned(),
        });
    }
    Ok(())
}

/// Mutable side of the game-commenter index, filled during ingestion.
///
/// Owns the commenter interner so that every name passing through
/// [`add_comment`](Self::add_comment) is resolved against the same table.
/// Call [`seal`](Self::seal) once ingestion is done.
#[derive(Debug, Default)]
pub struct CommenterIndexBuilder {
    interner: CommenterInterner,
    games: BTreeMap<String, CommenterSet>,
}

impl CommenterIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `commenter` left a comment on `game`.
    ///
    /// Identifiers are not checked here: a game with an unsafe identifier is
    /// only an error if it survives the node threshold.
    pub fn add_comment(&mut self, game: &str, commenter: &str) -> Result<()> {
        let id = self.interner.resolve(commenter)?;
        self.record(game, id);
        Ok(())
    }

    /// Inserts `commenter_id` into the set of `game`, creating it if needed.
    pub fn record(&mut self, game: &str, commenter_id: CommenterId) {
        match self.games.get_mut(game) {
            Some(set) => {
                set.insert(commenter_id);
            }
            None => {
                let mut set = CommenterSet::default();
                set.insert(commenter_id);
                self.games.insert(game.to_owned(), set);
            }
        }
    }

    pub fn interner(&self) -> &CommenterInterner {
        &self.interner
    }

    pub fn commenter_set(&self, game: &str) -> Option<&CommenterSet> {
        self.games.get(game)
    }

    pub fn commenter_count(&self, game: &str) -> usize {
        self.games.get(game).map_or(0, |set| set.len())
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    pub fn seal(self) -> CommenterIndex {
        CommenterIndex {
            commenters: self.interner.len(),
            games: self
                .games
                .into_iter()
                .map(|(id, commenters)| GameEntry { id, commenters })
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameEntry {
    pub id: String,
    pub commenters: CommenterSet,
}

impl GameEntry {
    pub fn commenter_count(&self) -> usize {
        self.commenters.len()
    }
}

/// Read-only game-commenter index, sorted by game identifier.
#[derive(Debug, Clone, Default)]
pub struct CommenterIndex {
    commenters: usize,
    games: Vec<GameEntry>,
}

impl CommenterIndex {
    pub fn games(&self) -> &[GameEntry] {
        &self.games
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }

    /// Number of distinct commenters interned while building the index.
    pub fn distinct_commenters(&self) -> usize {
        self.commenters
    }

    pub fn commenter_set(&self, game: &str) -> Option<&CommenterSet> {
        self.entry(game).map(|entry| &entry.commenters)
    }

    pub fn commenter_count(&self, game: &str) -> usize {
        self.entry(game).map_or(0, GameEntry::commenter_count)
    }

    fn entry(&self, game: &str) -> Option<&GameEntry> {
        self.games
            .binary_search_by(|entry| entry.id.as_str().cmp(game))
            .ok()
            .map(|i| &self.games[i])
    }
}
