//! Loads a dump of comment pages into a [`CommenterIndexBuilder`].
//!
//! The input root holds two trees of JSON files:
//! `games/` with the comments left on a game page and `users/` with the
//! comments a user left across the site.

use std::fs;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::error::{GraphError, Result};
use crate::index::CommenterIndexBuilder;

static GAME_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"://([^./]*)\.itch\.io/([^/]*)").expect("valid game url regex"));

#[derive(Debug, Deserialize)]
struct GamePage {
    game_author: String,
    game_name: String,
    comments: Vec<GameComment>,
}

#[derive(Debug, Deserialize)]
struct GameComment {
    post_author_id: String,
}

#[derive(Debug, Deserialize)]
struct UserPage {
    user: String,
    comments: Vec<UserComment>,
}

#[derive(Debug, Deserialize)]
struct UserComment {
    comments_url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub game_files: usize,
    pub user_files: usize,
    /// Comments that contributed a (game, commenter) pair.
    pub comments: usize,
    /// User-page comments left somewhere other than a game page.
    pub skipped: usize,
}

/// Canonical `author/name` identifier of a game.
pub fn game_id(author: &str, name: &str) -> String {
    format!("{author}/{name}")
}

/// Extracts the canonical game identifier from a game page url.
pub fn parse_game_url(url: &str) -> Result<String> {
    let captures = GAME_URL
        .captures(url)
        .ok_or_else(|| GraphError::InvalidGameUrl(url.to_owned()))?;
    Ok(game_id(&captures[1], &captures[2]))
}

/// Reads every game page and then every user page under `root`.
pub fn load_commenters(root: &Path, builder: &mut CommenterIndexBuilder) -> Result<LoadStats> {
    let games_path = root.join("games");
    let users_path = root.join("users");

    if !users_path.is_dir() {
        return Err(GraphError::MissingDirectory(users_path));
    }
    if !games_path.is_dir() {
        return Err(GraphError::MissingDirectory(games_path));
    }

    let mut stats = LoadStats::default();

    info!("Loading comments from game pages");
    for_each_file(&games_path, |path| {
        stats.comments += load_game_page(path, builder)?;
        stats.game_files += 1;
        Ok(())
    })?;

    info!("Loading comments from user pages");
    for_each_file(&users_path, |path| {
        let (loaded, skipped) = load_user_page(path, builder)?;
        stats.comments += loaded;
        stats.skipped += skipped;
        stats.user_files += 1;
        Ok(())
    })?;

    info!(
        game_files = stats.game_files,
        user_files = stats.user_files,
        comments = stats.comments,
        skipped = stats.skipped,
        games = builder.game_count(),
        commenters = builder.interner().len(),
        "Comments loaded"
    );
    Ok(stats)
}

fn for_each_file<F>(dir: &Path, mut f: F) -> Result<()>
where
    F: FnMut(&Path) -> Result<()>,
{
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        f(entry.path())?;
    }
    Ok(())
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| GraphError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn load_game_page(path: &Path, builder: &mut CommenterIndexBuilder) -> Result<usize> {
    let page: GamePage = read_json(path)?;
    let game = game_id(&page.game_author, &page.game_name);

    for comment in &page.comments {
        builder.add_comment(&game, &comment.post_author_id)?;
    }

    debug!(path = %path.display(), game = %game, comments = page.comments.len(), "game page");
    Ok(page.comments.len())
}

/// Returns how many comments were loaded and how many were skipped.
fn load_user_page(
    path: &Path,
    builder: &mut CommenterIndexBuilder,
) -> Result<(usize, usize)> {
    let page: UserPage = read_json(path)?;
    let mut loaded = 0;
    let mut skipped = 0;

    for comment in &page.comments {
        // Only comments on game pages have urls ending with /comments
        if !comment.comments_url.ends_with("/comments") {
            debug!(user = %page.user, url = %comment.comments_url, "skipping non-game comment");
            skipped += 1;
            continue;
        }
        let game = parse_game_url(&comment.comments_url)?;
        builder.add_comment(&game, &page.user)?;
        loaded += 1;
    }

    debug!(
        path = %path.display(),
        user = %page.user,
        comments = loaded,
        skipped,
        "user page"
    );
    Ok((loaded, skipped))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn dump() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "games/chasefox_carrot.json",
            r#"{"game_author": "chasefox", "game_name": "carrot", "comments": [
                {"post_author_id": "alice", "body": "nice"},
                {"post_author_id": "bob"},
                {"post_author_id": "alice"}
            ]}"#,
        );
        write(
            dir.path(),
            "users/nested/alice.json",
            r#"{"user": "alice", "comments": [
                {"comments_url": "https://other.itch.io/potato/comments"},
                {"comments_url": "https://itch.io/t/12345/some-topic"},
                {"comments_url": "https://chasefox.itch.io/carrot/comments"}
            ]}"#,
        );
        dir
    }

    #[test]
    fn test_parse_game_url() {
        assert_eq!(
            parse_game_url("https://chasefox.itch.io/carrot-the-first-seed/comments").unwrap(),
            "chasefox/carrot-the-first-seed"
        );
        assert!(matches!(
            parse_game_url("https://example.com/comments"),
            Err(GraphError::InvalidGameUrl(_))
        ));
    }

    #[test]
    fn test_load_commenters() {
        let dir = dump();
        let mut builder = CommenterIndexBuilder::new();
        let stats = load_commenters(dir.path(), &mut builder).unwrap();

        assert_eq!(
            stats,
            LoadStats { game_files: 1, user_files: 1, comments: 5, skipped: 1 }
        );
        assert_eq!(builder.commenter_count("chasefox/carrot"), 2);
        assert_eq!(builder.commenter_count("other/potato"), 1);
        assert_eq!(builder.interner().len(), 2);
        // game pages are loaded first, so alice and bob keep their order
        assert_eq!(builder.interner().get("alice"), Some(0));
        assert_eq!(builder.interner().get("bob"), Some(1));
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("users")).unwrap();

        let mut builder = CommenterIndexBuilder::new();
        let err = load_commenters(dir.path(), &mut builder).unwrap_err();
        assert!(matches!(err, GraphError::MissingDirectory(p) if p.ends_with("games")));
    }

    #[test]
    fn test_malformed_json_reports_path() {
        let dir = dump();
        write(dir.path(), "games/broken.json", "{\"game_author\": 1}");

        let mut builder = CommenterIndexBuilder::new();
        match load_commenters(dir.path(), &mut builder) {
            Err(GraphError::Json { path, .. }) => assert!(path.ends_with("broken.json")),
            other => panic!("expected json error, got {other:?}"),
        }
    }
}
